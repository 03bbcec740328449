use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::Store;
use crate::database::models::{
    BulkAttendanceStatusInput, MercenaryCountInput, SetAttendanceStatusInput, SyncAttendanceInput,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::permissions::require_manager;
use crate::services::{Claims, TeamDirectory, attendance};

/// POST /schedules/{id}/attendances/sync
pub async fn sync_attendance<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<SyncAttendanceInput>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let schedule_id = path.into_inner();
    let input = input.into_inner();
    require_manager(&state.directory, claims.user_id(), input.team_id).await?;

    let result = attendance::sync_attendance(
        &state.store,
        &state.directory,
        schedule_id,
        input.team_id,
        input.team_type,
    )
    .await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success(result.value))
}

/// GET /schedules/{id}/attendances
pub async fn list_attendance<S, D>(
    state: web::Data<AppState<S, D>>,
    _claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let rows = attendance::list_attendance(&state.store, path.into_inner()).await?;
    Ok(ApiResponse::success(rows))
}

/// PUT /attendances/{id}/status
pub async fn set_attendance_status<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<SetAttendanceStatusInput>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let input = input.into_inner();
    let result = attendance::set_attendance_status(
        &state.store,
        &state.directory,
        path.into_inner(),
        input.team_id,
        input.status,
        claims.user_id(),
    )
    .await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success(result.value))
}

/// PUT /schedules/{id}/attendances/status
pub async fn bulk_set_attendance_status<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<BulkAttendanceStatusInput>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let input = input.into_inner();
    let result = attendance::bulk_set_attendance_status(
        &state.store,
        &state.directory,
        path.into_inner(),
        input.team_id,
        input.team_type,
        input.status,
        claims.user_id(),
    )
    .await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success(result.value))
}

/// DELETE /attendances/{id}
pub async fn remove_attendance<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let result = attendance::remove_attendance(
        &state.store,
        &state.directory,
        path.into_inner(),
        claims.user_id(),
    )
    .await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success_with_message(
        result.value,
        "Attendance removed",
    ))
}

/// PUT /schedules/{id}/mercenaries
pub async fn set_mercenary_count<S, D>(
    state: web::Data<AppState<S, D>>,
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<MercenaryCountInput>,
) -> Result<HttpResponse, AppError>
where
    S: Store + 'static,
    D: TeamDirectory + 'static,
{
    let input = input.into_inner();
    let result = attendance::set_mercenary_count(
        &state.store,
        &state.directory,
        path.into_inner(),
        input.team_id,
        input.team_type,
        input.count,
        claims.user_id(),
    )
    .await?;
    state.cache.apply(&result.changes).await;

    Ok(ApiResponse::success(result.value))
}
