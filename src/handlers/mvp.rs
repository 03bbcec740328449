use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::Store;
use crate::database::models::VoteMvpInput;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{Claims, TeamDirectory, mvp};

/// POST /schedules/{id}/mvp-votes
///
/// The voter is always the caller.
pub async fn vote_mvp<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<VoteMvpInput>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let result = mvp::vote_mvp(
        &state.store,
        path.into_inner(),
        claims.user_id(),
        input.target_user_id,
    )
    .await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success(result.value))
}

/// GET /schedules/{id}/mvp-stats
pub async fn get_mvp_stats<S, D>(
    state: web::Data<AppState<S, D>>,
    _claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let schedule_id = path.into_inner();
    if let Some(stats) = state.cache.mvp_stats(schedule_id).await {
        return Ok(ApiResponse::success(stats));
    }

    let stats = mvp::get_mvp_stats(&state.store, schedule_id).await?;
    state.cache.store_mvp_stats(stats.clone()).await;

    Ok(ApiResponse::success(stats))
}
