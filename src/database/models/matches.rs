use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::goal::{GoalRecord, Side};
use super::lineup::Lineup;

/// One played instance under a schedule. Scores are only ever moved by goal
/// records being added or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
    pub home_mercenary_count: i32,
    pub away_mercenary_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn score(&self, side: Side) -> i32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewMatch {
    pub schedule_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub home_mercenary_count: i32,
    pub away_mercenary_count: i32,
}

/// Everything a scoreboard needs to render one match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBoard {
    #[serde(rename = "match")]
    pub game: Match,
    pub lineup: Vec<Lineup>,
    pub goals: Vec<GoalRecord>,
}
