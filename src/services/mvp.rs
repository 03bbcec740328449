//! MVP voting and per-team vote statistics.

use chrono::Utc;
use std::cmp::Ordering;
use uuid::Uuid;

use crate::database::models::{
    Attendance, MvpCandidate, MvpRanking, MvpStats, TeamType, TeamVoteStats,
};
use crate::database::{Store, UnitOfWork};
use crate::error::AppError;
use crate::services::attendance::load_schedule;
use crate::services::changes::{ChangeSet, Mutation};

/// Casts or moves the voter's MVP vote. Counters on the previous and new
/// target change in the same unit as the vote itself.
pub async fn vote_mvp<S: Store>(
    store: &S,
    schedule_id: Uuid,
    voter_id: Uuid,
    target_user_id: Uuid,
) -> Result<Mutation<Attendance>, AppError> {
    if voter_id == target_user_id {
        return Err(AppError::invalid("you cannot vote for yourself"));
    }

    let mut unit = store.begin().await?;
    load_schedule(&mut unit, schedule_id).await?;

    // Both rows stay locked until commit, so a concurrent vote by the same
    // voter sees this one's result instead of the stale previous target.
    let voter = unit
        .find_attendance_by_user_for_update(schedule_id, voter_id)
        .await?
        .ok_or_else(|| AppError::forbidden("only members on this schedule can vote"))?;
    unit.find_attendance_by_user_for_update(schedule_id, target_user_id)
        .await?
        .ok_or_else(|| AppError::not_found("MVP candidate is not on this schedule"))?;

    let previous = voter.mvp_to_user_id;
    if previous != Some(target_user_id) {
        if let Some(previous) = previous {
            unit.adjust_mvp_received(schedule_id, previous, -1).await?;
        }
        unit.adjust_mvp_received(schedule_id, target_user_id, 1)
            .await?;
    }
    unit.set_mvp_vote(voter.id, Some(target_user_id), Utc::now())
        .await?;
    let updated = unit
        .find_attendance(voter.id)
        .await?
        .ok_or_else(|| AppError::not_found("Attendance not found"))?;
    unit.commit().await?;

    log::info!(
        "User {} voted {} as MVP of schedule {}",
        voter_id,
        target_user_id,
        schedule_id
    );

    Ok(Mutation::new(updated, ChangeSet::schedule(schedule_id)))
}

/// Case-insensitive ordering with the raw text as tie-breaker, so the result
/// is total and stable across calls.
pub fn compare_nicknames(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn vote_rate(voted: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (voted as f64 / total as f64 * 100.0).round() as u32
    }
}

/// Vote statistics for one team of the schedule.
pub fn team_vote_stats(team_type: TeamType, candidates: &[MvpCandidate]) -> TeamVoteStats {
    let members: Vec<&MvpCandidate> = candidates
        .iter()
        .filter(|c| c.team_type == team_type)
        .collect();
    let total = members.len();
    let voted = members
        .iter()
        .filter(|c| c.mvp_to_user_id.is_some())
        .count();

    let mut ranking: Vec<MvpRanking> = members
        .iter()
        .map(|c| MvpRanking {
            user_id: c.user_id,
            nickname: c.nickname.clone(),
            mvp_received: c.mvp_received,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.mvp_received
            .cmp(&a.mvp_received)
            .then_with(|| compare_nicknames(&a.nickname, &b.nickname))
    });

    TeamVoteStats {
        team_type,
        total,
        voted,
        not_voted: total - voted,
        vote_rate: vote_rate(voted, total),
        ranking,
    }
}

pub async fn get_mvp_stats<S: Store>(store: &S, schedule_id: Uuid) -> Result<MvpStats, AppError> {
    let mut unit = store.begin().await?;
    let schedule = load_schedule(&mut unit, schedule_id).await?;
    let candidates = unit.list_mvp_candidates(schedule_id).await?;

    let mut teams = vec![team_vote_stats(TeamType::Host, &candidates)];
    if schedule.invited_team_id.is_some() {
        teams.push(team_vote_stats(TeamType::Invited, &candidates));
    }

    Ok(MvpStats { schedule_id, teams })
}
