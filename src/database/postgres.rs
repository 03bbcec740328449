use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    models::{
        Attendance, AttendanceStatus, GoalRecord, Lineup, LineupSide, Match, MvpCandidate,
        NewAttendance, NewGoalRecord, NewMatch, Schedule, Side, TeamType,
    },
    repositories,
    store::{Store, UnitOfWork},
};
use crate::error::AppError;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    type Unit = PgUnit;

    async fn begin(&self) -> Result<PgUnit, AppError> {
        let tx = self.pool.begin().await?;
        Ok(PgUnit { tx })
    }
}

/// A Postgres transaction. Rolled back by sqlx when dropped uncommitted.
pub struct PgUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnit {
    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn find_schedule(&mut self, id: Uuid) -> Result<Option<Schedule>, AppError> {
        repositories::schedule::find_by_id(&mut *self.tx, id).await
    }

    async fn set_mercenary_count(
        &mut self,
        schedule_id: Uuid,
        team_type: TeamType,
        count: i32,
    ) -> Result<Option<Schedule>, AppError> {
        repositories::schedule::set_mercenary_count(
            &mut *self.tx,
            schedule_id,
            team_type,
            count,
        )
        .await
    }

    async fn list_attendance(&mut self, schedule_id: Uuid) -> Result<Vec<Attendance>, AppError> {
        repositories::attendance::list_for_schedule(&mut *self.tx, schedule_id).await
    }

    async fn find_attendance(&mut self, id: Uuid) -> Result<Option<Attendance>, AppError> {
        repositories::attendance::find_by_id(&mut *self.tx, id).await
    }

    async fn find_attendance_by_user(
        &mut self,
        schedule_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Attendance>, AppError> {
        repositories::attendance::find_by_user(&mut *self.tx, schedule_id, user_id).await
    }

    async fn find_attendance_for_update(
        &mut self,
        id: Uuid,
    ) -> Result<Option<Attendance>, AppError> {
        repositories::attendance::find_by_id_for_update(&mut *self.tx, id).await
    }

    async fn find_attendance_by_user_for_update(
        &mut self,
        schedule_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Attendance>, AppError> {
        repositories::attendance::find_by_user_for_update(&mut *self.tx, schedule_id, user_id)
            .await
    }

    async fn insert_attendance(
        &mut self,
        input: NewAttendance,
    ) -> Result<Option<Attendance>, AppError> {
        repositories::attendance::insert(&mut *self.tx, input).await
    }

    async fn update_attendance_status(
        &mut self,
        id: Uuid,
        status: AttendanceStatus,
    ) -> Result<Option<Attendance>, AppError> {
        repositories::attendance::update_status(&mut *self.tx, id, status).await
    }

    async fn bulk_update_attendance_status(
        &mut self,
        schedule_id: Uuid,
        team_type: TeamType,
        status: AttendanceStatus,
        voted_at: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        repositories::attendance::bulk_update_status(
            &mut *self.tx,
            schedule_id,
            team_type,
            status,
            voted_at,
        )
        .await
    }

    async fn delete_attendance(&mut self, id: Uuid) -> Result<bool, AppError> {
        repositories::attendance::delete(&mut *self.tx, id).await
    }

    async fn set_mvp_vote(
        &mut self,
        attendance_id: Uuid,
        target_user_id: Option<Uuid>,
        voted_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        repositories::attendance::set_mvp_vote(
            &mut *self.tx,
            attendance_id,
            target_user_id,
            voted_at,
        )
        .await
    }

    async fn adjust_mvp_received(
        &mut self,
        schedule_id: Uuid,
        user_id: Uuid,
        delta: i32,
    ) -> Result<u64, AppError> {
        repositories::attendance::adjust_mvp_received(
            &mut *self.tx,
            schedule_id,
            user_id,
            delta,
        )
        .await
    }

    async fn clear_votes_for(&mut self, schedule_id: Uuid, user_id: Uuid) -> Result<u64, AppError> {
        repositories::attendance::clear_votes_for(&mut *self.tx, schedule_id, user_id).await
    }

    async fn list_mvp_candidates(
        &mut self,
        schedule_id: Uuid,
    ) -> Result<Vec<MvpCandidate>, AppError> {
        repositories::attendance::list_mvp_candidates(&mut *self.tx, schedule_id).await
    }

    async fn find_match(&mut self, id: Uuid) -> Result<Option<Match>, AppError> {
        repositories::matches::find_by_id(&mut *self.tx, id).await
    }

    async fn list_matches(&mut self, schedule_id: Uuid) -> Result<Vec<Match>, AppError> {
        repositories::matches::list_for_schedule(&mut *self.tx, schedule_id).await
    }

    async fn insert_match(&mut self, input: NewMatch) -> Result<Match, AppError> {
        repositories::matches::insert(&mut *self.tx, input).await
    }

    async fn adjust_score(
        &mut self,
        match_id: Uuid,
        side: Side,
        delta: i32,
    ) -> Result<Match, AppError> {
        repositories::matches::adjust_score(&mut *self.tx, match_id, side, delta).await
    }

    async fn swap_match_sides(&mut self, match_id: Uuid) -> Result<Match, AppError> {
        repositories::matches::swap_sides(&mut *self.tx, match_id).await
    }

    async fn list_lineup(&mut self, match_id: Uuid) -> Result<Vec<Lineup>, AppError> {
        repositories::lineup::list_for_match(&mut *self.tx, match_id).await
    }

    async fn find_lineup(&mut self, id: Uuid) -> Result<Option<Lineup>, AppError> {
        repositories::lineup::find_by_id(&mut *self.tx, id).await
    }

    async fn find_lineup_by_user(
        &mut self,
        match_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Lineup>, AppError> {
        repositories::lineup::find_by_user(&mut *self.tx, match_id, user_id).await
    }

    async fn insert_lineup(
        &mut self,
        match_id: Uuid,
        user_id: Uuid,
        side: LineupSide,
    ) -> Result<Lineup, AppError> {
        repositories::lineup::insert(&mut *self.tx, match_id, user_id, side).await
    }

    async fn update_lineup_side(
        &mut self,
        id: Uuid,
        side: LineupSide,
    ) -> Result<Option<Lineup>, AppError> {
        repositories::lineup::update_side(&mut *self.tx, id, side).await
    }

    async fn delete_lineup(&mut self, id: Uuid) -> Result<bool, AppError> {
        repositories::lineup::delete(&mut *self.tx, id).await
    }

    async fn delete_lineups_for_match(&mut self, match_id: Uuid) -> Result<u64, AppError> {
        repositories::lineup::delete_for_match(&mut *self.tx, match_id).await
    }

    async fn flip_lineup_sides(&mut self, match_id: Uuid) -> Result<u64, AppError> {
        repositories::lineup::flip_sides(&mut *self.tx, match_id).await
    }

    async fn insert_goal(&mut self, input: NewGoalRecord) -> Result<GoalRecord, AppError> {
        repositories::goal::insert(&mut *self.tx, input).await
    }

    async fn find_goal(&mut self, id: Uuid) -> Result<Option<GoalRecord>, AppError> {
        repositories::goal::find_by_id(&mut *self.tx, id).await
    }

    async fn list_goals(&mut self, match_id: Uuid) -> Result<Vec<GoalRecord>, AppError> {
        repositories::goal::list_for_match(&mut *self.tx, match_id).await
    }

    async fn delete_goal(&mut self, id: Uuid) -> Result<bool, AppError> {
        repositories::goal::delete(&mut *self.tx, id).await
    }

    async fn flip_goal_sides(&mut self, match_id: Uuid) -> Result<u64, AppError> {
        repositories::goal::flip_sides(&mut *self.tx, match_id).await
    }
}
