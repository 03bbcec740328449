use actix_web::web;

use crate::database::Store;
use crate::handlers::{attendance, matches, mvp};
use crate::services::TeamDirectory;

pub fn configure<S, D>(cfg: &mut web::ServiceConfig)
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    cfg.service(
        web::scope("/schedules")
            .route(
                "/{id}/attendances",
                web::get().to(attendance::list_attendance::<S, D>),
            )
            .route(
                "/{id}/attendances/sync",
                web::post().to(attendance::sync_attendance::<S, D>),
            )
            .route(
                "/{id}/attendances/status",
                web::put().to(attendance::bulk_set_attendance_status::<S, D>),
            )
            .route(
                "/{id}/mercenaries",
                web::put().to(attendance::set_mercenary_count::<S, D>),
            )
            .route(
                "/{id}/matches",
                web::post().to(matches::create_match::<S, D>),
            )
            .route("/{id}/mvp-votes", web::post().to(mvp::vote_mvp::<S, D>))
            .route("/{id}/mvp-stats", web::get().to(mvp::get_mvp_stats::<S, D>)),
    )
    .service(
        web::scope("/attendances")
            .route(
                "/{id}/status",
                web::put().to(attendance::set_attendance_status::<S, D>),
            )
            .route(
                "/{id}",
                web::delete().to(attendance::remove_attendance::<S, D>),
            ),
    );
}
