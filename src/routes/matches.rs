use actix_web::web;

use crate::database::Store;
use crate::handlers::matches;
use crate::services::TeamDirectory;

pub fn configure<S, D>(cfg: &mut web::ServiceConfig)
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    cfg.service(
        web::scope("/matches")
            .route("/{id}", web::get().to(matches::get_match_board::<S, D>))
            .route(
                "/{id}/lineup/assign",
                web::post().to(matches::assign_lineup::<S, D>),
            )
            .route(
                "/{id}/lineup/shuffle",
                web::post().to(matches::shuffle_lineup::<S, D>),
            )
            .route(
                "/{id}/toggle-sides",
                web::post().to(matches::toggle_sides::<S, D>),
            )
            .route("/{id}/goals", web::post().to(matches::record_goal::<S, D>))
            .route(
                "/{id}/goals",
                web::get().to(matches::list_goal_records::<S, D>),
            ),
    )
    .service(
        web::scope("/lineups")
            .route(
                "/{id}/side",
                web::put().to(matches::set_lineup_side::<S, D>),
            )
            .route(
                "/{id}",
                web::delete().to(matches::remove_from_lineup::<S, D>),
            ),
    )
    .service(
        web::scope("/goals").route(
            "/{id}",
            web::delete().to(matches::delete_goal_record::<S, D>),
        ),
    );
}
