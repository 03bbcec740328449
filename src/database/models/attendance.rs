use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::team::TeamType;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AttendanceStatus {
        Attending => "attending",
        NotAttending => "not_attending",
        Undecided => "undecided",
    }
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        AttendanceStatus::Undecided
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub user_id: Uuid,
    pub team_type: TeamType,
    pub attendance_status: AttendanceStatus,
    pub mvp_to_user_id: Option<Uuid>,
    pub mvp_received: i32,
    pub voted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attendance {
    pub fn is_attending(&self) -> bool {
        self.attendance_status == AttendanceStatus::Attending
    }
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub schedule_id: Uuid,
    pub user_id: Uuid,
    pub team_type: TeamType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncAttendanceInput {
    pub team_id: Uuid,
    pub team_type: TeamType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAttendanceStatusInput {
    /// The team the requester is acting through.
    pub team_id: Uuid,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAttendanceStatusInput {
    pub team_id: Uuid,
    pub team_type: TeamType,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MercenaryCountInput {
    pub team_id: Uuid,
    pub team_type: TeamType,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncAttendanceResult {
    pub added: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAttendanceResult {
    pub affected: u64,
}
