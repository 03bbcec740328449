use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::team::TeamType;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum MatchType {
        /// Intra-team scrimmage split into two ad-hoc sides.
        Squad => "squad",
        /// Friendly between the host team and an invited team.
        Team => "team",
    }
}

/// A single fixture. Owned by the scheduling subsystem; the engine reads the
/// team ids and match type and writes only the mercenary counts.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: Uuid,
    pub host_team_id: Uuid,
    pub invited_team_id: Option<Uuid>,
    pub match_type: MatchType,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub host_mercenary_count: i32,
    pub invited_mercenary_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    pub fn team_id_for(&self, team_type: TeamType) -> Option<Uuid> {
        match team_type {
            TeamType::Host => Some(self.host_team_id),
            TeamType::Invited => self.invited_team_id,
        }
    }

    /// Resolves which side of the fixture `team_id` plays on.
    pub fn team_type_of(&self, team_id: Uuid) -> Option<TeamType> {
        if team_id == self.host_team_id {
            Some(TeamType::Host)
        } else if self.invited_team_id == Some(team_id) {
            Some(TeamType::Invited)
        } else {
            None
        }
    }

    pub fn mercenary_count(&self, team_type: TeamType) -> i32 {
        match team_type {
            TeamType::Host => self.host_mercenary_count,
            TeamType::Invited => self.invited_mercenary_count,
        }
    }

    /// Teams whose managers may edit matches played under this schedule.
    pub fn team_ids(&self) -> Vec<Uuid> {
        let mut ids = vec![self.host_team_id];
        ids.extend(self.invited_team_id);
        ids
    }
}
