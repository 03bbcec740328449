use actix_web::web;

use crate::database::Store;
use crate::services::TeamDirectory;

pub mod matches;
pub mod schedules;

pub fn configure<S, D>(cfg: &mut web::ServiceConfig)
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    cfg.service(
        web::scope("/api/v1")
            .configure(schedules::configure::<S, D>)
            .configure(matches::configure::<S, D>),
    );
}
