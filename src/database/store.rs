use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::{
    Attendance, AttendanceStatus, GoalRecord, Lineup, LineupSide, Match, MvpCandidate,
    NewAttendance, NewGoalRecord, NewMatch, Schedule, Side, TeamType,
};
use crate::error::AppError;

/// Source of units of work. Each operation of the engine runs inside exactly
/// one unit, so either all of its rows change or none do.
#[async_trait]
pub trait Store: Send + Sync {
    type Unit: UnitOfWork;

    async fn begin(&self) -> Result<Self::Unit, AppError>;
}

/// Row-level access to the tables the engine owns, scoped to one transaction.
///
/// Dropping a unit without calling [`UnitOfWork::commit`] discards every
/// change made through it.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn commit(self) -> Result<(), AppError>;

    // Schedules
    async fn find_schedule(&mut self, id: Uuid) -> Result<Option<Schedule>, AppError>;
    async fn set_mercenary_count(
        &mut self,
        schedule_id: Uuid,
        team_type: TeamType,
        count: i32,
    ) -> Result<Option<Schedule>, AppError>;

    // Attendance
    async fn list_attendance(&mut self, schedule_id: Uuid) -> Result<Vec<Attendance>, AppError>;
    async fn find_attendance(&mut self, id: Uuid) -> Result<Option<Attendance>, AppError>;
    async fn find_attendance_by_user(
        &mut self,
        schedule_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Attendance>, AppError>;
    /// Reads a row and locks it against concurrent writers for the rest of
    /// the unit. Used before read-then-adjust sequences on vote counters.
    async fn find_attendance_for_update(
        &mut self,
        id: Uuid,
    ) -> Result<Option<Attendance>, AppError>;
    async fn find_attendance_by_user_for_update(
        &mut self,
        schedule_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Attendance>, AppError>;
    /// Inserts the row unless the member already has one for the schedule.
    async fn insert_attendance(
        &mut self,
        input: NewAttendance,
    ) -> Result<Option<Attendance>, AppError>;
    async fn update_attendance_status(
        &mut self,
        id: Uuid,
        status: AttendanceStatus,
    ) -> Result<Option<Attendance>, AppError>;
    async fn bulk_update_attendance_status(
        &mut self,
        schedule_id: Uuid,
        team_type: TeamType,
        status: AttendanceStatus,
        voted_at: DateTime<Utc>,
    ) -> Result<u64, AppError>;
    async fn delete_attendance(&mut self, id: Uuid) -> Result<bool, AppError>;
    async fn set_mvp_vote(
        &mut self,
        attendance_id: Uuid,
        target_user_id: Option<Uuid>,
        voted_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
    /// Moves `mvp_received` of the member by `delta`, never below zero.
    async fn adjust_mvp_received(
        &mut self,
        schedule_id: Uuid,
        user_id: Uuid,
        delta: i32,
    ) -> Result<u64, AppError>;
    async fn clear_votes_for(&mut self, schedule_id: Uuid, user_id: Uuid) -> Result<u64, AppError>;
    async fn list_mvp_candidates(&mut self, schedule_id: Uuid)
    -> Result<Vec<MvpCandidate>, AppError>;

    // Matches
    async fn find_match(&mut self, id: Uuid) -> Result<Option<Match>, AppError>;
    async fn list_matches(&mut self, schedule_id: Uuid) -> Result<Vec<Match>, AppError>;
    async fn insert_match(&mut self, input: NewMatch) -> Result<Match, AppError>;
    /// Applies a relative change to one side's score.
    async fn adjust_score(&mut self, match_id: Uuid, side: Side, delta: i32)
    -> Result<Match, AppError>;
    /// Swaps every home/away pair on the match row: teams, scores and mercenaries.
    async fn swap_match_sides(&mut self, match_id: Uuid) -> Result<Match, AppError>;

    // Lineups
    async fn list_lineup(&mut self, match_id: Uuid) -> Result<Vec<Lineup>, AppError>;
    async fn find_lineup(&mut self, id: Uuid) -> Result<Option<Lineup>, AppError>;
    async fn find_lineup_by_user(
        &mut self,
        match_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Lineup>, AppError>;
    async fn insert_lineup(
        &mut self,
        match_id: Uuid,
        user_id: Uuid,
        side: LineupSide,
    ) -> Result<Lineup, AppError>;
    async fn update_lineup_side(
        &mut self,
        id: Uuid,
        side: LineupSide,
    ) -> Result<Option<Lineup>, AppError>;
    async fn delete_lineup(&mut self, id: Uuid) -> Result<bool, AppError>;
    async fn delete_lineups_for_match(&mut self, match_id: Uuid) -> Result<u64, AppError>;
    async fn flip_lineup_sides(&mut self, match_id: Uuid) -> Result<u64, AppError>;

    // Goal records
    async fn insert_goal(&mut self, input: NewGoalRecord) -> Result<GoalRecord, AppError>;
    async fn find_goal(&mut self, id: Uuid) -> Result<Option<GoalRecord>, AppError>;
    async fn list_goals(&mut self, match_id: Uuid) -> Result<Vec<GoalRecord>, AppError>;
    async fn delete_goal(&mut self, id: Uuid) -> Result<bool, AppError>;
    async fn flip_goal_sides(&mut self, match_id: Uuid) -> Result<u64, AppError>;
}
