use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use kickoff::database::{PgStore, init_database};
use kickoff::services::PgTeamDirectory;
use kickoff::{AppState, Config, ReadCache, routes};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Kickoff API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );

    let pool = init_database(&config.database_url, config.database_max_connections).await?;
    log::info!("Database initialized");

    let app_state = web::Data::new(AppState::new(
        PgStore::new(pool.clone()),
        PgTeamDirectory::new(pool),
        ReadCache::new(config.cache_max_capacity, config.cache_ttl_seconds),
    ));
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .app_data(app_state.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
                    .max_age(3600),
            )
            .wrap(Logger::new(r#"%a "%r" %s %b "%{User-Agent}i" %T"#))
            .service(hello)
            .service(health)
            .configure(routes::configure::<PgStore, PgTeamDirectory>)
    })
    .bind(&server_address)?
    .run()
    .await?;

    Ok(())
}
