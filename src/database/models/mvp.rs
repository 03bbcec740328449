use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::team::TeamType;

/// Attendance row joined with the member's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MvpCandidate {
    pub user_id: Uuid,
    pub nickname: String,
    pub team_type: TeamType,
    pub mvp_to_user_id: Option<Uuid>,
    pub mvp_received: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteMvpInput {
    pub target_user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvpRanking {
    pub user_id: Uuid,
    pub nickname: String,
    pub mvp_received: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamVoteStats {
    pub team_type: TeamType,
    pub total: usize,
    pub voted: usize,
    pub not_voted: usize,
    /// Percentage of the roster that has voted, rounded to a whole number.
    pub vote_rate: u32,
    pub ranking: Vec<MvpRanking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvpStats {
    pub schedule_id: Uuid,
    pub teams: Vec<TeamVoteStats>,
}

impl MvpStats {
    pub fn team(&self, team_type: TeamType) -> Option<&TeamVoteStats> {
        self.teams.iter().find(|t| t.team_type == team_type)
    }
}
