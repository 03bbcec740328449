use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::goal::Side;
use super::macros::string_enum;

string_enum! {
    /// Placement of a participant in a match. `Undecided` is the benched state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LineupSide {
        Home => "home",
        Away => "away",
        Undecided => "undecided",
    }
}

impl LineupSide {
    /// The active side, if the participant is not benched.
    pub fn side(&self) -> Option<Side> {
        match self {
            LineupSide::Home => Some(Side::Home),
            LineupSide::Away => Some(Side::Away),
            LineupSide::Undecided => None,
        }
    }

    pub fn flipped(&self) -> LineupSide {
        match self {
            LineupSide::Home => LineupSide::Away,
            LineupSide::Away => LineupSide::Home,
            LineupSide::Undecided => LineupSide::Undecided,
        }
    }
}

impl From<Side> for LineupSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Home => LineupSide::Home,
            Side::Away => LineupSide::Away,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lineup {
    pub id: Uuid,
    pub match_id: Uuid,
    pub user_id: Uuid,
    pub side: LineupSide,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLineupSideInput {
    pub side: LineupSide,
}

/// Home/away head counts of a lineup. Benched rows are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideCounts {
    pub home: usize,
    pub away: usize,
}

impl SideCounts {
    pub fn of(lineup: &[Lineup]) -> Self {
        lineup.iter().fold(Self::default(), |mut counts, row| {
            match row.side {
                LineupSide::Home => counts.home += 1,
                LineupSide::Away => counts.away += 1,
                LineupSide::Undecided => {}
            }
            counts
        })
    }

    pub fn add(&mut self, side: Side) {
        match side {
            Side::Home => self.home += 1,
            Side::Away => self.away += 1,
        }
    }
}
