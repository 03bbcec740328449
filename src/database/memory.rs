use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::database::{
    models::{
        Attendance, AttendanceStatus, GoalRecord, Lineup, LineupSide, Match, MvpCandidate,
        NewAttendance, NewGoalRecord, NewMatch, Schedule, Side, TeamType,
    },
    store::{Store, UnitOfWork},
};
use crate::error::AppError;

/// All tables of the in-process store. Rows keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub schedules: Vec<Schedule>,
    pub nicknames: HashMap<Uuid, String>,
    pub attendances: Vec<Attendance>,
    pub matches: Vec<Match>,
    pub lineups: Vec<Lineup>,
    pub goals: Vec<GoalRecord>,
}

/// In-process store. Units are serialized by a single lock and see a private
/// copy of the tables until they commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fixture owned by the scheduling subsystem.
    pub async fn insert_schedule(&self, schedule: Schedule) {
        self.state.lock().await.schedules.push(schedule);
    }

    pub async fn insert_user(&self, user_id: Uuid, nickname: impl Into<String>) {
        self.state
            .lock()
            .await
            .nicknames
            .insert(user_id, nickname.into());
    }

    /// Copy of the committed tables.
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Unit = MemoryUnit;

    async fn begin(&self) -> Result<MemoryUnit, AppError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryUnit { guard, working })
    }
}

pub struct MemoryUnit {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

impl MemoryUnit {
    fn match_mut(&mut self, match_id: Uuid) -> Result<&mut Match, AppError> {
        self.working
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or_else(|| AppError::not_found("Match not found"))
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnit {
    async fn commit(self) -> Result<(), AppError> {
        let MemoryUnit { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn find_schedule(&mut self, id: Uuid) -> Result<Option<Schedule>, AppError> {
        Ok(self.working.schedules.iter().find(|s| s.id == id).cloned())
    }

    async fn set_mercenary_count(
        &mut self,
        schedule_id: Uuid,
        team_type: TeamType,
        count: i32,
    ) -> Result<Option<Schedule>, AppError> {
        let Some(schedule) = self
            .working
            .schedules
            .iter_mut()
            .find(|s| s.id == schedule_id)
        else {
            return Ok(None);
        };
        match team_type {
            TeamType::Host => schedule.host_mercenary_count = count,
            TeamType::Invited => schedule.invited_mercenary_count = count,
        }
        schedule.updated_at = Utc::now();
        Ok(Some(schedule.clone()))
    }

    async fn list_attendance(&mut self, schedule_id: Uuid) -> Result<Vec<Attendance>, AppError> {
        Ok(self
            .working
            .attendances
            .iter()
            .filter(|a| a.schedule_id == schedule_id)
            .cloned()
            .collect())
    }

    async fn find_attendance(&mut self, id: Uuid) -> Result<Option<Attendance>, AppError> {
        Ok(self.working.attendances.iter().find(|a| a.id == id).cloned())
    }

    async fn find_attendance_by_user(
        &mut self,
        schedule_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Attendance>, AppError> {
        Ok(self
            .working
            .attendances
            .iter()
            .find(|a| a.schedule_id == schedule_id && a.user_id == user_id)
            .cloned())
    }

    // A unit already holds the store lock, so plain reads are exclusive.
    async fn find_attendance_for_update(
        &mut self,
        id: Uuid,
    ) -> Result<Option<Attendance>, AppError> {
        self.find_attendance(id).await
    }

    async fn find_attendance_by_user_for_update(
        &mut self,
        schedule_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Attendance>, AppError> {
        self.find_attendance_by_user(schedule_id, user_id).await
    }

    async fn insert_attendance(
        &mut self,
        input: NewAttendance,
    ) -> Result<Option<Attendance>, AppError> {
        let exists = self
            .working
            .attendances
            .iter()
            .any(|a| a.schedule_id == input.schedule_id && a.user_id == input.user_id);
        if exists {
            return Ok(None);
        }

        let now = Utc::now();
        let row = Attendance {
            id: Uuid::new_v4(),
            schedule_id: input.schedule_id,
            user_id: input.user_id,
            team_type: input.team_type,
            attendance_status: AttendanceStatus::Undecided,
            mvp_to_user_id: None,
            mvp_received: 0,
            voted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.working.attendances.push(row.clone());
        Ok(Some(row))
    }

    async fn update_attendance_status(
        &mut self,
        id: Uuid,
        status: AttendanceStatus,
    ) -> Result<Option<Attendance>, AppError> {
        let Some(row) = self.working.attendances.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        row.attendance_status = status;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn bulk_update_attendance_status(
        &mut self,
        schedule_id: Uuid,
        team_type: TeamType,
        status: AttendanceStatus,
        voted_at: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let mut affected = 0;
        for row in self
            .working
            .attendances
            .iter_mut()
            .filter(|a| a.schedule_id == schedule_id && a.team_type == team_type)
        {
            row.attendance_status = status;
            row.voted_at = Some(voted_at);
            row.updated_at = voted_at;
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete_attendance(&mut self, id: Uuid) -> Result<bool, AppError> {
        let before = self.working.attendances.len();
        self.working.attendances.retain(|a| a.id != id);
        Ok(self.working.attendances.len() < before)
    }

    async fn set_mvp_vote(
        &mut self,
        attendance_id: Uuid,
        target_user_id: Option<Uuid>,
        voted_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if let Some(row) = self
            .working
            .attendances
            .iter_mut()
            .find(|a| a.id == attendance_id)
        {
            row.mvp_to_user_id = target_user_id;
            row.voted_at = Some(voted_at);
            row.updated_at = voted_at;
        }
        Ok(())
    }

    async fn adjust_mvp_received(
        &mut self,
        schedule_id: Uuid,
        user_id: Uuid,
        delta: i32,
    ) -> Result<u64, AppError> {
        let mut affected = 0;
        for row in self
            .working
            .attendances
            .iter_mut()
            .filter(|a| a.schedule_id == schedule_id && a.user_id == user_id)
        {
            row.mvp_received = (row.mvp_received + delta).max(0);
            row.updated_at = Utc::now();
            affected += 1;
        }
        Ok(affected)
    }

    async fn clear_votes_for(&mut self, schedule_id: Uuid, user_id: Uuid) -> Result<u64, AppError> {
        let mut affected = 0;
        for row in self.working.attendances.iter_mut().filter(|a| {
            a.schedule_id == schedule_id && a.mvp_to_user_id == Some(user_id)
        }) {
            row.mvp_to_user_id = None;
            row.updated_at = Utc::now();
            affected += 1;
        }
        Ok(affected)
    }

    async fn list_mvp_candidates(
        &mut self,
        schedule_id: Uuid,
    ) -> Result<Vec<MvpCandidate>, AppError> {
        // Members without a profile are left out, like the inner join in Postgres.
        let nicknames = &self.working.nicknames;
        Ok(self
            .working
            .attendances
            .iter()
            .filter(|a| a.schedule_id == schedule_id)
            .filter_map(|a| {
                nicknames.get(&a.user_id).map(|nickname| MvpCandidate {
                    user_id: a.user_id,
                    nickname: nickname.clone(),
                    team_type: a.team_type,
                    mvp_to_user_id: a.mvp_to_user_id,
                    mvp_received: a.mvp_received,
                })
            })
            .collect())
    }

    async fn find_match(&mut self, id: Uuid) -> Result<Option<Match>, AppError> {
        Ok(self.working.matches.iter().find(|m| m.id == id).cloned())
    }

    async fn list_matches(&mut self, schedule_id: Uuid) -> Result<Vec<Match>, AppError> {
        Ok(self
            .working
            .matches
            .iter()
            .filter(|m| m.schedule_id == schedule_id)
            .cloned()
            .collect())
    }

    async fn insert_match(&mut self, input: NewMatch) -> Result<Match, AppError> {
        let now = Utc::now();
        let game = Match {
            id: Uuid::new_v4(),
            schedule_id: input.schedule_id,
            home_team_id: input.home_team_id,
            away_team_id: input.away_team_id,
            home_score: 0,
            away_score: 0,
            home_mercenary_count: input.home_mercenary_count,
            away_mercenary_count: input.away_mercenary_count,
            created_at: now,
            updated_at: now,
        };
        self.working.matches.push(game.clone());
        Ok(game)
    }

    async fn adjust_score(
        &mut self,
        match_id: Uuid,
        side: Side,
        delta: i32,
    ) -> Result<Match, AppError> {
        let game = self.match_mut(match_id)?;
        let score = match side {
            Side::Home => &mut game.home_score,
            Side::Away => &mut game.away_score,
        };
        let next = *score + delta;
        if next < 0 {
            return Err(AppError::Storage(format!(
                "{}_score of match {} would become negative",
                side, match_id
            )));
        }
        *score = next;
        game.updated_at = Utc::now();
        Ok(game.clone())
    }

    async fn swap_match_sides(&mut self, match_id: Uuid) -> Result<Match, AppError> {
        let game = self.match_mut(match_id)?;
        std::mem::swap(&mut game.home_team_id, &mut game.away_team_id);
        std::mem::swap(&mut game.home_score, &mut game.away_score);
        std::mem::swap(
            &mut game.home_mercenary_count,
            &mut game.away_mercenary_count,
        );
        game.updated_at = Utc::now();
        Ok(game.clone())
    }

    async fn list_lineup(&mut self, match_id: Uuid) -> Result<Vec<Lineup>, AppError> {
        Ok(self
            .working
            .lineups
            .iter()
            .filter(|l| l.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn find_lineup(&mut self, id: Uuid) -> Result<Option<Lineup>, AppError> {
        Ok(self.working.lineups.iter().find(|l| l.id == id).cloned())
    }

    async fn find_lineup_by_user(
        &mut self,
        match_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Lineup>, AppError> {
        Ok(self
            .working
            .lineups
            .iter()
            .find(|l| l.match_id == match_id && l.user_id == user_id)
            .cloned())
    }

    async fn insert_lineup(
        &mut self,
        match_id: Uuid,
        user_id: Uuid,
        side: LineupSide,
    ) -> Result<Lineup, AppError> {
        if self
            .working
            .lineups
            .iter()
            .any(|l| l.match_id == match_id && l.user_id == user_id)
        {
            return Err(AppError::Storage(format!(
                "duplicate lineup row for user {} in match {}",
                user_id, match_id
            )));
        }

        let now = Utc::now();
        let row = Lineup {
            id: Uuid::new_v4(),
            match_id,
            user_id,
            side,
            created_at: now,
            updated_at: now,
        };
        self.working.lineups.push(row.clone());
        Ok(row)
    }

    async fn update_lineup_side(
        &mut self,
        id: Uuid,
        side: LineupSide,
    ) -> Result<Option<Lineup>, AppError> {
        let Some(row) = self.working.lineups.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        row.side = side;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_lineup(&mut self, id: Uuid) -> Result<bool, AppError> {
        let before = self.working.lineups.len();
        self.working.lineups.retain(|l| l.id != id);
        Ok(self.working.lineups.len() < before)
    }

    async fn delete_lineups_for_match(&mut self, match_id: Uuid) -> Result<u64, AppError> {
        let before = self.working.lineups.len();
        self.working.lineups.retain(|l| l.match_id != match_id);
        Ok((before - self.working.lineups.len()) as u64)
    }

    async fn flip_lineup_sides(&mut self, match_id: Uuid) -> Result<u64, AppError> {
        let mut affected = 0;
        for row in self
            .working
            .lineups
            .iter_mut()
            .filter(|l| l.match_id == match_id && l.side != LineupSide::Undecided)
        {
            row.side = row.side.flipped();
            row.updated_at = Utc::now();
            affected += 1;
        }
        Ok(affected)
    }

    async fn insert_goal(&mut self, input: NewGoalRecord) -> Result<GoalRecord, AppError> {
        let goal = GoalRecord {
            id: Uuid::new_v4(),
            match_id: input.match_id,
            scorer_side: input.scorer_side,
            scorer_id: input.scorer_id,
            assist_id: input.assist_id,
            is_own_goal: input.is_own_goal,
            is_scored_by_mercenary: input.is_scored_by_mercenary,
            is_assisted_by_mercenary: input.is_assisted_by_mercenary,
            created_at: Utc::now(),
        };
        self.working.goals.push(goal.clone());
        Ok(goal)
    }

    async fn find_goal(&mut self, id: Uuid) -> Result<Option<GoalRecord>, AppError> {
        Ok(self.working.goals.iter().find(|g| g.id == id).cloned())
    }

    async fn list_goals(&mut self, match_id: Uuid) -> Result<Vec<GoalRecord>, AppError> {
        Ok(self
            .working
            .goals
            .iter()
            .filter(|g| g.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn delete_goal(&mut self, id: Uuid) -> Result<bool, AppError> {
        let before = self.working.goals.len();
        self.working.goals.retain(|g| g.id != id);
        Ok(self.working.goals.len() < before)
    }

    async fn flip_goal_sides(&mut self, match_id: Uuid) -> Result<u64, AppError> {
        let mut affected = 0;
        for goal in self
            .working
            .goals
            .iter_mut()
            .filter(|g| g.match_id == match_id)
        {
            goal.scorer_side = goal.scorer_side.opposite();
            affected += 1;
        }
        Ok(affected)
    }
}
