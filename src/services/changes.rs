use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Views made stale by a mutation. Callers use it to refresh caches or push
/// updates; the engine never invalidates anything itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub schedules: Vec<Uuid>,
    pub matches: Vec<Uuid>,
}

impl ChangeSet {
    pub fn schedule(schedule_id: Uuid) -> Self {
        Self {
            schedules: vec![schedule_id],
            matches: Vec::new(),
        }
    }

    pub fn game(schedule_id: Uuid, match_id: Uuid) -> Self {
        Self {
            schedules: vec![schedule_id],
            matches: vec![match_id],
        }
    }

    /// The schedule plus every match under it that changed along with it.
    pub fn schedule_with_games(schedule_id: Uuid, match_ids: Vec<Uuid>) -> Self {
        Self {
            schedules: vec![schedule_id],
            matches: match_ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty() && self.matches.is_empty()
    }
}

/// Result of a mutating operation together with what it touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutation<T> {
    pub value: T,
    pub changes: ChangeSet,
}

impl<T> Mutation<T> {
    pub fn new(value: T, changes: ChangeSet) -> Self {
        Self { value, changes }
    }
}
