use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;

/// Identity of the caller, taken from a HS256 bearer token. Tokens are issued
/// by the identity service; this crate only verifies them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Signs a token for `user_id`. Used by tests and local tooling.
    pub fn issue(
        user_id: Uuid,
        secret: &str,
        valid_for: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id,
            exp: (Utc::now() + valid_for).timestamp() as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        let (Some(token), Some(config)) = (token, req.app_data::<Data<Config>>()) else {
            return ready(Err(ErrorUnauthorized(
                "Missing or invalid authorization header",
            )));
        };

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        ) {
            Ok(token_data) => ready(Ok(token_data.claims)),
            Err(e) => {
                log::warn!("Rejected bearer token: {}", e);
                ready(Err(ErrorUnauthorized("Invalid token")))
            }
        }
    }
}
