use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    /// An active side of a match.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Side {
        Home => "home",
        Away => "away",
    }
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// A scored goal. `scorer_side` is the side of the player who put the ball in,
/// which differs from the side credited with the goal on an own goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub id: Uuid,
    pub match_id: Uuid,
    pub scorer_side: Side,
    pub scorer_id: Option<Uuid>,
    pub assist_id: Option<Uuid>,
    pub is_own_goal: bool,
    pub is_scored_by_mercenary: bool,
    pub is_assisted_by_mercenary: bool,
    pub created_at: DateTime<Utc>,
}

impl GoalRecord {
    pub fn benefiting_side(&self) -> Side {
        benefiting_side(self.scorer_side, self.is_own_goal)
    }
}

pub fn benefiting_side(actual_side: Side, is_own_goal: bool) -> Side {
    if is_own_goal {
        actual_side.opposite()
    } else {
        actual_side
    }
}

#[derive(Debug, Clone)]
pub struct NewGoalRecord {
    pub match_id: Uuid,
    pub scorer_side: Side,
    pub scorer_id: Option<Uuid>,
    pub assist_id: Option<Uuid>,
    pub is_own_goal: bool,
    pub is_scored_by_mercenary: bool,
    pub is_assisted_by_mercenary: bool,
}

/// Raw goal attribution as submitted by the match admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordGoalInput {
    pub match_id: Uuid,
    /// Only consulted for mercenary goals; roster scorers take their lineup side.
    pub scorer_side: Option<Side>,
    pub scorer_id: Option<Uuid>,
    pub assist_id: Option<Uuid>,
    pub is_own_goal: bool,
    pub is_scored_by_mercenary: bool,
    pub is_assisted_by_mercenary: bool,
}
