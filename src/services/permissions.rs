use uuid::Uuid;

use crate::database::models::Schedule;
use crate::error::AppError;
use crate::services::directory::AuthorizationProvider;

/// Requires OWNER or MANAGER on `team_id`.
pub async fn require_manager<A: AuthorizationProvider + ?Sized>(
    auth: &A,
    requester_id: Uuid,
    team_id: Uuid,
) -> Result<(), AppError> {
    let role = auth.role_of(requester_id, team_id).await?;
    if role.is_manager() {
        Ok(())
    } else {
        log::warn!(
            "User {} ({}) is not a manager of team {}",
            requester_id,
            role,
            team_id
        );
        Err(AppError::forbidden("team owner or manager role required"))
    }
}

/// Requires OWNER or MANAGER on either team of the schedule.
pub async fn require_match_editor<A: AuthorizationProvider + ?Sized>(
    auth: &A,
    requester_id: Uuid,
    schedule: &Schedule,
) -> Result<(), AppError> {
    for team_id in schedule.team_ids() {
        if auth.role_of(requester_id, team_id).await?.is_manager() {
            return Ok(());
        }
    }
    log::warn!(
        "User {} may not edit matches of schedule {}",
        requester_id,
        schedule.id
    );
    Err(AppError::forbidden("match edit permission required"))
}
