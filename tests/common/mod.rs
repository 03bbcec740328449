#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime, Utc};
use fake::Fake;
use fake::faker::name::en::FirstName;
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

use kickoff::database::MemoryStore;
use kickoff::database::models::{AttendanceStatus, MatchType, Schedule, TeamRole, TeamType};
use kickoff::services::{InMemoryTeamDirectory, attendance, matches};

pub fn setup_test_env() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn schedule(match_type: MatchType, host_team_id: Uuid, invited_team_id: Option<Uuid>) -> Schedule {
    let now = Utc::now();
    Schedule {
        id: Uuid::new_v4(),
        host_team_id,
        invited_team_id,
        match_type,
        date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        status: "scheduled".to_string(),
        host_mercenary_count: 0,
        invited_mercenary_count: 0,
        created_at: now,
        updated_at: now,
    }
}

/// Two teams with one manager each, backed by the in-memory store and
/// directory.
pub struct TestContext {
    pub store: MemoryStore,
    pub directory: InMemoryTeamDirectory,
    pub host_team: Uuid,
    pub invited_team: Uuid,
    pub host_manager: Uuid,
    pub invited_manager: Uuid,
}

impl TestContext {
    pub async fn new() -> Self {
        setup_test_env();
        let mut ctx = TestContext {
            store: MemoryStore::new(),
            directory: InMemoryTeamDirectory::new(),
            host_team: Uuid::new_v4(),
            invited_team: Uuid::new_v4(),
            host_manager: Uuid::nil(),
            invited_manager: Uuid::nil(),
        };
        ctx.host_manager = ctx.add_member(ctx.host_team, TeamRole::Manager).await;
        ctx.invited_manager = ctx.add_member(ctx.invited_team, TeamRole::Owner).await;
        ctx
    }

    /// Registers a user with a random nickname on `team_id`.
    pub async fn add_member(&self, team_id: Uuid, role: TeamRole) -> Uuid {
        let user_id = Uuid::new_v4();
        let nickname: String = FirstName().fake();
        self.store.insert_user(user_id, nickname).await;
        self.directory.add_member(team_id, user_id, role);
        user_id
    }

    pub async fn add_members(&self, team_id: Uuid, count: usize) -> Vec<Uuid> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.add_member(team_id, TeamRole::Member).await);
        }
        ids
    }

    pub async fn squad_schedule(&self) -> Uuid {
        let schedule = schedule(MatchType::Squad, self.host_team, None);
        let id = schedule.id;
        self.store.insert_schedule(schedule).await;
        id
    }

    pub async fn team_schedule(&self) -> Uuid {
        let schedule = schedule(MatchType::Team, self.host_team, Some(self.invited_team));
        let id = schedule.id;
        self.store.insert_schedule(schedule).await;
        id
    }

    pub fn team_for(&self, team_type: TeamType) -> (Uuid, Uuid) {
        match team_type {
            TeamType::Host => (self.host_team, self.host_manager),
            TeamType::Invited => (self.invited_team, self.invited_manager),
        }
    }

    /// Syncs the team's roster into the schedule and marks everyone attending.
    pub async fn attend_all(&self, schedule_id: Uuid, team_type: TeamType) {
        let (team_id, manager) = self.team_for(team_type);
        attendance::sync_attendance(&self.store, &self.directory, schedule_id, team_id, team_type)
            .await
            .unwrap();
        attendance::bulk_set_attendance_status(
            &self.store,
            &self.directory,
            schedule_id,
            team_id,
            team_type,
            AttendanceStatus::Attending,
            manager,
        )
        .await
        .unwrap();
    }

    pub async fn create_match(&self, schedule_id: Uuid) -> Uuid {
        matches::create_match(&self.store, &self.directory, schedule_id, self.host_manager)
            .await
            .unwrap()
            .value
            .id
    }
}
