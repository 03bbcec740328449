//! Attendance roster of a schedule: syncing team members in, status changes,
//! removal and per-side mercenary counts.

use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{
    Attendance, AttendanceStatus, BulkAttendanceResult, NewAttendance, Schedule,
    SyncAttendanceResult, TeamType,
};
use crate::database::{Store, UnitOfWork};
use crate::error::AppError;
use crate::services::changes::{ChangeSet, Mutation};
use crate::services::directory::{AuthorizationProvider, TeamRosterProvider};
use crate::services::permissions::require_manager;

pub(crate) async fn load_schedule<U: UnitOfWork>(
    unit: &mut U,
    schedule_id: Uuid,
) -> Result<Schedule, AppError> {
    unit.find_schedule(schedule_id)
        .await?
        .ok_or_else(|| AppError::not_found("Schedule not found"))
}

/// Checks that `team_id` really is the schedule's `team_type` team.
fn ensure_team_matches(
    schedule: &Schedule,
    team_id: Uuid,
    team_type: TeamType,
) -> Result<(), AppError> {
    if schedule.team_id_for(team_type) == Some(team_id) {
        Ok(())
    } else {
        log::warn!(
            "Team {} is not the {} team of schedule {}",
            team_id,
            team_type,
            schedule.id
        );
        Err(AppError::conflict(format!(
            "team is not the {} team of this schedule",
            team_type
        )))
    }
}

/// Inserts an UNDECIDED row for every approved member of `team_id` that is not
/// on the schedule yet. Existing rows are left untouched.
pub async fn sync_attendance<S, R>(
    store: &S,
    roster: &R,
    schedule_id: Uuid,
    team_id: Uuid,
    team_type: TeamType,
) -> Result<Mutation<SyncAttendanceResult>, AppError>
where
    S: Store,
    R: TeamRosterProvider + ?Sized,
{
    let members = roster.approved_members(team_id).await?;

    let mut unit = store.begin().await?;
    let schedule = load_schedule(&mut unit, schedule_id).await?;
    ensure_team_matches(&schedule, team_id, team_type)?;

    let mut added = 0;
    for user_id in members {
        let inserted = unit
            .insert_attendance(NewAttendance {
                schedule_id,
                user_id,
                team_type,
            })
            .await?;
        if inserted.is_some() {
            added += 1;
        }
    }
    unit.commit().await?;

    log::info!(
        "Synced {} new {} members into schedule {}",
        added,
        team_type,
        schedule_id
    );

    Ok(Mutation::new(
        SyncAttendanceResult { added },
        ChangeSet::schedule(schedule_id),
    ))
}

pub async fn list_attendance<S: Store>(
    store: &S,
    schedule_id: Uuid,
) -> Result<Vec<Attendance>, AppError> {
    let mut unit = store.begin().await?;
    load_schedule(&mut unit, schedule_id).await?;
    unit.list_attendance(schedule_id).await
}

/// Changes one member's status. Allowed for the member themself or for a
/// manager of the team the requester acts through.
pub async fn set_attendance_status<S, A>(
    store: &S,
    auth: &A,
    attendance_id: Uuid,
    team_id: Uuid,
    status: AttendanceStatus,
    requester_id: Uuid,
) -> Result<Mutation<Attendance>, AppError>
where
    S: Store,
    A: AuthorizationProvider + ?Sized,
{
    let mut unit = store.begin().await?;
    let row = unit
        .find_attendance(attendance_id)
        .await?
        .ok_or_else(|| AppError::not_found("Attendance not found"))?;

    let role = auth.role_of(requester_id, team_id).await?;
    let is_self = row.user_id == requester_id && role.is_approved();
    if !is_self && !role.is_manager() {
        log::warn!(
            "User {} may not change attendance {}",
            requester_id,
            attendance_id
        );
        return Err(AppError::forbidden(
            "only the member or a team manager may change attendance",
        ));
    }

    let schedule = load_schedule(&mut unit, row.schedule_id).await?;
    ensure_team_matches(&schedule, team_id, row.team_type)?;

    let updated = unit
        .update_attendance_status(attendance_id, status)
        .await?
        .ok_or_else(|| AppError::not_found("Attendance not found"))?;
    unit.commit().await?;

    log::info!(
        "Attendance {} of user {} set to {}",
        updated.id,
        updated.user_id,
        status
    );

    Ok(Mutation::new(updated, ChangeSet::schedule(row.schedule_id)))
}

/// Sets every row of one team on the schedule to `status` in one unit and
/// stamps `voted_at` on all of them.
pub async fn bulk_set_attendance_status<S, A>(
    store: &S,
    auth: &A,
    schedule_id: Uuid,
    team_id: Uuid,
    team_type: TeamType,
    status: AttendanceStatus,
    requester_id: Uuid,
) -> Result<Mutation<BulkAttendanceResult>, AppError>
where
    S: Store,
    A: AuthorizationProvider + ?Sized,
{
    require_manager(auth, requester_id, team_id).await?;

    let mut unit = store.begin().await?;
    let schedule = load_schedule(&mut unit, schedule_id).await?;
    ensure_team_matches(&schedule, team_id, team_type)?;

    let affected = unit
        .bulk_update_attendance_status(schedule_id, team_type, status, Utc::now())
        .await?;
    unit.commit().await?;

    log::info!(
        "Set {} {} attendance rows of schedule {} to {}",
        affected,
        team_type,
        schedule_id,
        status
    );

    Ok(Mutation::new(
        BulkAttendanceResult { affected },
        ChangeSet::schedule(schedule_id),
    ))
}

/// Drops a member from the schedule. Their own vote is withdrawn, votes cast
/// for them are cleared so vote counters stay consistent, and their lineup
/// rows in every match under the schedule go with them.
pub async fn remove_attendance<S, A>(
    store: &S,
    auth: &A,
    attendance_id: Uuid,
    requester_id: Uuid,
) -> Result<Mutation<Attendance>, AppError>
where
    S: Store,
    A: AuthorizationProvider + ?Sized,
{
    let mut unit = store.begin().await?;
    let row = unit
        .find_attendance_for_update(attendance_id)
        .await?
        .ok_or_else(|| AppError::not_found("Attendance not found"))?;
    let schedule = load_schedule(&mut unit, row.schedule_id).await?;
    let team_id = schedule
        .team_id_for(row.team_type)
        .ok_or_else(|| AppError::conflict("schedule has no invited team"))?;

    require_manager(auth, requester_id, team_id).await?;

    if let Some(target) = row.mvp_to_user_id {
        unit.adjust_mvp_received(row.schedule_id, target, -1).await?;
    }
    unit.clear_votes_for(row.schedule_id, row.user_id).await?;

    let mut benched_in = Vec::new();
    for game in unit.list_matches(row.schedule_id).await? {
        if let Some(slot) = unit.find_lineup_by_user(game.id, row.user_id).await? {
            unit.delete_lineup(slot.id).await?;
            benched_in.push(game.id);
        }
    }

    if !unit.delete_attendance(attendance_id).await? {
        return Err(AppError::not_found("Attendance not found"));
    }
    unit.commit().await?;

    log::info!(
        "Removed user {} from schedule {} and {} lineups",
        row.user_id,
        row.schedule_id,
        benched_in.len()
    );

    let schedule_id = row.schedule_id;
    Ok(Mutation::new(
        row,
        ChangeSet::schedule_with_games(schedule_id, benched_in),
    ))
}

pub async fn set_mercenary_count<S, A>(
    store: &S,
    auth: &A,
    schedule_id: Uuid,
    team_id: Uuid,
    team_type: TeamType,
    count: i32,
    requester_id: Uuid,
) -> Result<Mutation<Schedule>, AppError>
where
    S: Store,
    A: AuthorizationProvider + ?Sized,
{
    require_manager(auth, requester_id, team_id).await?;
    if count < 0 {
        return Err(AppError::invalid("mercenary count cannot be negative"));
    }

    let mut unit = store.begin().await?;
    let schedule = load_schedule(&mut unit, schedule_id).await?;
    ensure_team_matches(&schedule, team_id, team_type)?;

    let updated = unit
        .set_mercenary_count(schedule_id, team_type, count)
        .await?
        .ok_or_else(|| AppError::not_found("Schedule not found"))?;
    unit.commit().await?;

    log::info!(
        "Schedule {} now has {} {} mercenaries",
        schedule_id,
        count,
        team_type
    );

    Ok(Mutation::new(updated, ChangeSet::schedule(schedule_id)))
}
