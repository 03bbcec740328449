use actix_web::{HttpResponse, web};
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

use crate::AppState;
use crate::database::Store;
use crate::database::models::{RecordGoalInput, SetLineupSideInput};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::matches::authorize_match_edit;
use crate::services::{Claims, TeamDirectory, lineup, matches, score};

fn request_rng() -> StdRng {
    StdRng::from_rng(&mut rand::rng())
}

/// POST /schedules/{id}/matches
pub async fn create_match<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let result = matches::create_match(
        &state.store,
        &state.directory,
        path.into_inner(),
        claims.user_id(),
    )
    .await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::created(result.value))
}

/// GET /matches/{id}
pub async fn get_match_board<S, D>(
    state: web::Data<AppState<S, D>>,
    _claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let match_id = path.into_inner();
    if let Some(board) = state.cache.board(match_id).await {
        return Ok(ApiResponse::success(board));
    }

    let board = matches::get_match_board(&state.store, match_id).await?;
    state.cache.store_board(board.clone()).await;

    Ok(ApiResponse::success(board))
}

/// POST /matches/{id}/lineup/assign
pub async fn assign_lineup<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let match_id = path.into_inner();
    authorize_match_edit(&state.store, &state.directory, match_id, claims.user_id()).await?;

    let result = lineup::assign_lineup(&state.store, match_id, &mut request_rng()).await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success(result.value))
}

/// POST /matches/{id}/lineup/shuffle
pub async fn shuffle_lineup<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let match_id = path.into_inner();
    authorize_match_edit(&state.store, &state.directory, match_id, claims.user_id()).await?;

    let result = lineup::shuffle_lineup(&state.store, match_id, &mut request_rng()).await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success(result.value))
}

/// POST /matches/{id}/toggle-sides
pub async fn toggle_sides<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let match_id = path.into_inner();
    authorize_match_edit(&state.store, &state.directory, match_id, claims.user_id()).await?;

    let result = lineup::toggle_sides(&state.store, match_id).await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success(result.value))
}

/// PUT /lineups/{id}/side
pub async fn set_lineup_side<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<SetLineupSideInput>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let result = lineup::set_lineup_side(
        &state.store,
        &state.directory,
        path.into_inner(),
        input.side,
        claims.user_id(),
    )
    .await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success(result.value))
}

/// DELETE /lineups/{id}
pub async fn remove_from_lineup<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let result = lineup::remove_from_lineup(
        &state.store,
        &state.directory,
        path.into_inner(),
        claims.user_id(),
    )
    .await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success_with_message(
        result.value,
        "Player removed from lineup",
    ))
}

/// POST /matches/{id}/goals
pub async fn record_goal<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<RecordGoalInput>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let match_id = path.into_inner();
    authorize_match_edit(&state.store, &state.directory, match_id, claims.user_id()).await?;

    // The path wins over whatever match id the body carries.
    let input = RecordGoalInput {
        match_id,
        ..input.into_inner()
    };
    let result = score::record_goal(&state.store, input).await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::created(result.value))
}

/// GET /matches/{id}/goals
pub async fn list_goal_records<S, D>(
    state: web::Data<AppState<S, D>>,
    _claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let goals = score::list_goal_records(&state.store, path.into_inner()).await?;
    Ok(ApiResponse::success(goals))
}

/// DELETE /goals/{id}
pub async fn delete_goal_record<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let goal_id = path.into_inner();
    let goal = score::find_goal_record(&state.store, goal_id).await?;
    authorize_match_edit(
        &state.store,
        &state.directory,
        goal.match_id,
        claims.user_id(),
    )
    .await?;

    let result = score::delete_goal_record(&state.store, goal_id).await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success_with_message(
        result.value,
        "Goal record deleted",
    ))
}
