use moka::future::Cache;
use std::time::Duration;
use uuid::Uuid;

use crate::database::models::{MatchBoard, MvpStats};
use crate::services::changes::ChangeSet;

/// Read-through cache for the two derived views the HTTP layer serves most.
/// Entries are dropped by [`ReadCache::apply`] when a mutation reports them
/// stale, and expire after the configured TTL otherwise.
#[derive(Clone)]
pub struct ReadCache {
    mvp_stats: Cache<Uuid, MvpStats>,
    boards: Cache<Uuid, MatchBoard>,
}

impl ReadCache {
    pub fn new(max_capacity: u64, ttl_seconds: u64) -> Self {
        let ttl = Duration::from_secs(ttl_seconds);
        Self {
            mvp_stats: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            boards: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn mvp_stats(&self, schedule_id: Uuid) -> Option<MvpStats> {
        self.mvp_stats.get(&schedule_id).await
    }

    pub async fn store_mvp_stats(&self, stats: MvpStats) {
        self.mvp_stats.insert(stats.schedule_id, stats).await;
    }

    pub async fn board(&self, match_id: Uuid) -> Option<MatchBoard> {
        self.boards.get(&match_id).await
    }

    pub async fn store_board(&self, board: MatchBoard) {
        self.boards.insert(board.game.id, board).await;
    }

    pub async fn apply(&self, changes: &ChangeSet) {
        for schedule_id in &changes.schedules {
            self.mvp_stats.invalidate(schedule_id).await;
        }
        for match_id in &changes.matches {
            self.boards.invalidate(match_id).await;
        }
        if !changes.is_empty() {
            log::debug!(
                "Invalidated {} schedule and {} match views",
                changes.schedules.len(),
                changes.matches.len()
            );
        }
    }
}
