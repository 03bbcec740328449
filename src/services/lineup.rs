//! Side assignment of match participants.
//!
//! Lineup membership is derived from attendance: squad matches are balanced
//! incrementally, team matches put each team on the side holding its id. Every
//! multi-row change happens inside a single unit of work.

use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::database::models::{Lineup, LineupSide, Match, MatchType, Schedule, Side, SideCounts};
use crate::database::{Store, UnitOfWork};
use crate::error::AppError;
use crate::services::attendance::load_schedule;
use crate::services::changes::{ChangeSet, Mutation};
use crate::services::directory::AuthorizationProvider;
use crate::services::permissions::require_match_editor;

pub(crate) async fn load_match<U: UnitOfWork>(
    unit: &mut U,
    match_id: Uuid,
) -> Result<(Match, Schedule), AppError> {
    let game = unit
        .find_match(match_id)
        .await?
        .ok_or_else(|| AppError::not_found("Match not found"))?;
    let schedule = load_schedule(unit, game.schedule_id).await?;
    Ok((game, schedule))
}

fn ensure_match_type(schedule: &Schedule, expected: MatchType) -> Result<(), AppError> {
    if schedule.match_type == expected {
        Ok(())
    } else {
        Err(AppError::conflict(format!(
            "schedule {} is a {} match, not a {} match",
            schedule.id, schedule.match_type, expected
        )))
    }
}

/// Side for the next squad player: the smaller side, or a coin flip on a tie.
pub fn balanced_side<R: Rng>(counts: SideCounts, rng: &mut R) -> Side {
    if counts.home == counts.away {
        if rng.random_bool(0.5) {
            Side::Home
        } else {
            Side::Away
        }
    } else if counts.home < counts.away {
        Side::Home
    } else {
        Side::Away
    }
}

/// Fisher–Yates shuffle followed by a half/half split. With an odd count the
/// last player's side is an independent coin flip.
pub fn shuffled_split<T, R: Rng>(mut items: Vec<T>, rng: &mut R) -> Vec<(T, Side)> {
    items.shuffle(rng);
    let half = items.len() / 2;
    let odd = items.len() % 2 == 1;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let side = if index < half {
                Side::Home
            } else if index < half * 2 {
                Side::Away
            } else if odd && rng.random_bool(0.5) {
                Side::Home
            } else {
                Side::Away
            };
            (item, side)
        })
        .collect()
}

/// Adds every attending member that has no lineup row yet, keeping current
/// placements as they are.
pub async fn assign_squad_lineup<S: Store, R: Rng>(
    store: &S,
    match_id: Uuid,
    rng: &mut R,
) -> Result<Mutation<Vec<Lineup>>, AppError> {
    let mut unit = store.begin().await?;
    let (game, schedule) = load_match(&mut unit, match_id).await?;
    ensure_match_type(&schedule, MatchType::Squad)?;

    let existing = unit.list_lineup(match_id).await?;
    let mut counts = SideCounts::of(&existing);
    let attending: Vec<_> = unit
        .list_attendance(schedule.id)
        .await?
        .into_iter()
        .filter(|a| a.is_attending())
        .filter(|a| !existing.iter().any(|l| l.user_id == a.user_id))
        .collect();

    let mut added = Vec::with_capacity(attending.len());
    for attendee in attending {
        let side = balanced_side(counts, rng);
        counts.add(side);
        added.push(
            unit.insert_lineup(match_id, attendee.user_id, side.into())
                .await?,
        );
    }
    unit.commit().await?;

    log::info!(
        "Added {} players to squad match {} ({} home / {} away)",
        added.len(),
        match_id,
        counts.home,
        counts.away
    );

    Ok(Mutation::new(added, ChangeSet::game(game.schedule_id, match_id)))
}

/// Rebuilds the whole lineup from the current attendance snapshot. Each
/// attendee joins the side that currently carries their team's id.
pub async fn assign_team_lineup<S: Store>(
    store: &S,
    match_id: Uuid,
) -> Result<Mutation<Vec<Lineup>>, AppError> {
    let mut unit = store.begin().await?;
    let (game, schedule) = load_match(&mut unit, match_id).await?;
    ensure_match_type(&schedule, MatchType::Team)?;

    let removed = unit.delete_lineups_for_match(match_id).await?;
    let attending: Vec<_> = unit
        .list_attendance(schedule.id)
        .await?
        .into_iter()
        .filter(|a| a.is_attending())
        .collect();

    // Sides follow the match's current team ids, which toggleSides may have
    // swapped since the match was created.
    let mut lineup = Vec::with_capacity(attending.len());
    for attendee in attending {
        let side = if schedule.team_id_for(attendee.team_type) == Some(game.home_team_id) {
            LineupSide::Home
        } else {
            LineupSide::Away
        };
        lineup.push(unit.insert_lineup(match_id, attendee.user_id, side).await?);
    }
    unit.commit().await?;

    log::info!(
        "Rebuilt lineup of team match {}: {} rows replaced by {}",
        match_id,
        removed,
        lineup.len()
    );

    Ok(Mutation::new(lineup, ChangeSet::game(game.schedule_id, match_id)))
}

/// Runs the assignment that fits the schedule's match type.
pub async fn assign_lineup<S: Store, R: Rng>(
    store: &S,
    match_id: Uuid,
    rng: &mut R,
) -> Result<Mutation<Vec<Lineup>>, AppError> {
    let match_type = {
        let mut unit = store.begin().await?;
        let (_, schedule) = load_match(&mut unit, match_id).await?;
        schedule.match_type
    };

    match match_type {
        MatchType::Squad => assign_squad_lineup(store, match_id, rng).await,
        MatchType::Team => assign_team_lineup(store, match_id).await,
    }
}

/// Reshuffles every lineup row into two random halves. Scores are untouched.
pub async fn shuffle_lineup<S: Store, R: Rng>(
    store: &S,
    match_id: Uuid,
    rng: &mut R,
) -> Result<Mutation<Vec<Lineup>>, AppError> {
    let mut unit = store.begin().await?;
    let (game, _) = load_match(&mut unit, match_id).await?;
    let rows = unit.list_lineup(match_id).await?;

    let mut shuffled = Vec::with_capacity(rows.len());
    for (row, side) in shuffled_split(rows, rng) {
        let updated = unit
            .update_lineup_side(row.id, side.into())
            .await?
            .ok_or_else(|| AppError::not_found("Lineup not found"))?;
        shuffled.push(updated);
    }
    unit.commit().await?;

    let counts = SideCounts::of(&shuffled);
    log::info!(
        "Shuffled match {}: {} home / {} away",
        match_id,
        counts.home,
        counts.away
    );

    Ok(Mutation::new(
        shuffled,
        ChangeSet::game(game.schedule_id, match_id),
    ))
}

/// Swaps HOME and AWAY everywhere in the match: lineup rows, the score, team
/// ids, mercenary counts and the raw side of every recorded goal.
pub async fn toggle_sides<S: Store>(
    store: &S,
    match_id: Uuid,
) -> Result<Mutation<Match>, AppError> {
    let mut unit = store.begin().await?;
    load_match(&mut unit, match_id).await?;

    let flipped = unit.flip_lineup_sides(match_id).await?;
    unit.flip_goal_sides(match_id).await?;
    let game = unit.swap_match_sides(match_id).await?;
    unit.commit().await?;

    log::info!(
        "Toggled sides of match {} ({} players moved), score now {}-{}",
        match_id,
        flipped,
        game.home_score,
        game.away_score
    );

    let schedule_id = game.schedule_id;
    Ok(Mutation::new(game, ChangeSet::game(schedule_id, match_id)))
}

pub async fn set_lineup_side<S, A>(
    store: &S,
    auth: &A,
    lineup_id: Uuid,
    side: LineupSide,
    requester_id: Uuid,
) -> Result<Mutation<Lineup>, AppError>
where
    S: Store,
    A: AuthorizationProvider + ?Sized,
{
    let mut unit = store.begin().await?;
    let row = unit
        .find_lineup(lineup_id)
        .await?
        .ok_or_else(|| AppError::not_found("Lineup not found"))?;
    let (game, schedule) = load_match(&mut unit, row.match_id).await?;
    require_match_editor(auth, requester_id, &schedule).await?;

    let updated = unit
        .update_lineup_side(lineup_id, side)
        .await?
        .ok_or_else(|| AppError::not_found("Lineup not found"))?;
    unit.commit().await?;

    log::info!(
        "Moved user {} to {} in match {}",
        updated.user_id,
        side,
        game.id
    );

    Ok(Mutation::new(
        updated,
        ChangeSet::game(game.schedule_id, game.id),
    ))
}

pub async fn remove_from_lineup<S, A>(
    store: &S,
    auth: &A,
    lineup_id: Uuid,
    requester_id: Uuid,
) -> Result<Mutation<Lineup>, AppError>
where
    S: Store,
    A: AuthorizationProvider + ?Sized,
{
    let mut unit = store.begin().await?;
    let row = unit
        .find_lineup(lineup_id)
        .await?
        .ok_or_else(|| AppError::not_found("Lineup not found"))?;
    let (game, schedule) = load_match(&mut unit, row.match_id).await?;
    require_match_editor(auth, requester_id, &schedule).await?;

    if !unit.delete_lineup(lineup_id).await? {
        return Err(AppError::not_found("Lineup not found"));
    }
    unit.commit().await?;

    log::info!("Removed user {} from match {}", row.user_id, game.id);

    Ok(Mutation::new(row, ChangeSet::game(game.schedule_id, game.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn uneven_sides_fill_the_smaller_one() {
        let mut rng = StdRng::seed_from_u64(7);
        let counts = SideCounts { home: 3, away: 1 };
        for _ in 0..10 {
            assert_eq!(balanced_side(counts, &mut rng), Side::Away);
        }
        let counts = SideCounts { home: 0, away: 2 };
        assert_eq!(balanced_side(counts, &mut rng), Side::Home);
    }

    #[test]
    fn tied_sides_use_both_outcomes() {
        let mut rng = StdRng::seed_from_u64(42);
        let picks: Vec<Side> = (0..64)
            .map(|_| balanced_side(SideCounts::default(), &mut rng))
            .collect();
        assert!(picks.contains(&Side::Home));
        assert!(picks.contains(&Side::Away));
    }

    #[test]
    fn split_covers_every_player() {
        for n in 0..12usize {
            let mut rng = StdRng::seed_from_u64(n as u64);
            let split = shuffled_split((0..n).collect::<Vec<usize>>(), &mut rng);
            let home = split.iter().filter(|(_, s)| *s == Side::Home).count();
            let away = split.iter().filter(|(_, s)| *s == Side::Away).count();

            assert_eq!(home + away, n);
            assert!(home >= n / 2 && away >= n / 2);
            assert!(home.abs_diff(away) <= 1);

            let mut players: Vec<usize> = split.into_iter().map(|(p, _)| p).collect();
            players.sort_unstable();
            assert_eq!(players, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn same_seed_same_split() {
        let a = shuffled_split((0..9).collect::<Vec<u32>>(), &mut StdRng::seed_from_u64(3));
        let b = shuffled_split((0..9).collect::<Vec<u32>>(), &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
