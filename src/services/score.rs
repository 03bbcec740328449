//! Goal ledger. The running score of a match is only ever moved here, by the
//! same delta a goal record produced, so score and goal set never diverge.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{
    GoalRecord, LineupSide, NewGoalRecord, RecordGoalInput, Side, benefiting_side,
};
use crate::database::{Store, UnitOfWork};
use crate::error::AppError;
use crate::services::changes::{ChangeSet, Mutation};
use crate::services::lineup::load_match;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub home: i32,
    pub away: i32,
}

/// Score implied by a set of goal records.
pub fn tally(goals: &[GoalRecord]) -> Tally {
    goals.iter().fold(Tally::default(), |mut tally, goal| {
        match goal.benefiting_side() {
            Side::Home => tally.home += 1,
            Side::Away => tally.away += 1,
        }
        tally
    })
}

/// Shape checks that need no stored state.
fn validate_attribution(input: &RecordGoalInput) -> Result<(), AppError> {
    if input.scorer_id.is_some() == input.is_scored_by_mercenary {
        return Err(AppError::invalid(
            "a goal needs either a scorer or the mercenary flag, not both",
        ));
    }
    let has_assist = input.assist_id.is_some() || input.is_assisted_by_mercenary;
    if input.is_own_goal && has_assist {
        return Err(AppError::invalid("an own goal cannot have an assist"));
    }
    if input.assist_id.is_some() && input.is_assisted_by_mercenary {
        return Err(AppError::invalid(
            "an assist is either a roster player or a mercenary",
        ));
    }
    if input.assist_id.is_some() && input.assist_id == input.scorer_id {
        return Err(AppError::invalid("a scorer cannot assist their own goal"));
    }
    Ok(())
}

async fn lineup_side<U: UnitOfWork>(
    unit: &mut U,
    match_id: Uuid,
    user_id: Uuid,
) -> Result<Option<LineupSide>, AppError> {
    Ok(unit
        .find_lineup_by_user(match_id, user_id)
        .await?
        .map(|row| row.side))
}

/// Records a goal and credits the benefiting side.
///
/// The stored `scorer_side` is the side the scorer actually played on; on an
/// own goal the opposite side's score moves.
pub async fn record_goal<S: Store>(
    store: &S,
    input: RecordGoalInput,
) -> Result<Mutation<GoalRecord>, AppError> {
    validate_attribution(&input)?;

    let mut unit = store.begin().await?;
    let (game, _) = load_match(&mut unit, input.match_id).await?;

    let actual_side = match input.scorer_id {
        None => input
            .scorer_side
            .ok_or_else(|| AppError::invalid("a mercenary goal needs the scorer side"))?,
        Some(scorer_id) => lineup_side(&mut unit, game.id, scorer_id)
            .await?
            .ok_or_else(|| AppError::invalid("scorer not in lineup"))?
            .side()
            .ok_or_else(|| AppError::invalid("scorer is not assigned to a side"))?,
    };
    let credited = benefiting_side(actual_side, input.is_own_goal);

    if let Some(assist_id) = input.assist_id {
        let assist_side = lineup_side(&mut unit, game.id, assist_id)
            .await?
            .ok_or_else(|| AppError::invalid("assist not in lineup"))?;
        if assist_side.side() != Some(credited) {
            log::warn!(
                "Rejected goal in match {}: assist {} plays {}, goal goes to {}",
                game.id,
                assist_id,
                assist_side,
                credited
            );
            return Err(AppError::invalid("assist side mismatch"));
        }
    }

    let goal = unit
        .insert_goal(NewGoalRecord {
            match_id: game.id,
            scorer_side: actual_side,
            scorer_id: input.scorer_id,
            assist_id: input.assist_id,
            is_own_goal: input.is_own_goal,
            is_scored_by_mercenary: input.is_scored_by_mercenary,
            is_assisted_by_mercenary: input.is_assisted_by_mercenary,
        })
        .await?;
    let updated = unit.adjust_score(game.id, credited, 1).await?;
    unit.commit().await?;

    log::info!(
        "Goal {} for {} in match {}{}, score {}-{}",
        goal.id,
        credited,
        game.id,
        if goal.is_own_goal { " (own goal)" } else { "" },
        updated.home_score,
        updated.away_score
    );

    Ok(Mutation::new(
        goal,
        ChangeSet::game(game.schedule_id, game.id),
    ))
}

/// Removes a goal and takes back exactly the point it gave.
pub async fn delete_goal_record<S: Store>(
    store: &S,
    goal_id: Uuid,
) -> Result<Mutation<GoalRecord>, AppError> {
    let mut unit = store.begin().await?;
    let goal = unit
        .find_goal(goal_id)
        .await?
        .ok_or_else(|| AppError::not_found("Goal record not found"))?;
    let (game, _) = load_match(&mut unit, goal.match_id).await?;

    let credited = goal.benefiting_side();
    let updated = unit.adjust_score(game.id, credited, -1).await?;
    if !unit.delete_goal(goal_id).await? {
        return Err(AppError::not_found("Goal record not found"));
    }
    unit.commit().await?;

    log::info!(
        "Deleted goal {} of match {}, score {}-{}",
        goal_id,
        game.id,
        updated.home_score,
        updated.away_score
    );

    Ok(Mutation::new(
        goal,
        ChangeSet::game(game.schedule_id, game.id),
    ))
}

pub async fn find_goal_record<S: Store>(
    store: &S,
    goal_id: Uuid,
) -> Result<GoalRecord, AppError> {
    let mut unit = store.begin().await?;
    unit.find_goal(goal_id)
        .await?
        .ok_or_else(|| AppError::not_found("Goal record not found"))
}

pub async fn list_goal_records<S: Store>(
    store: &S,
    match_id: Uuid,
) -> Result<Vec<GoalRecord>, AppError> {
    let mut unit = store.begin().await?;
    load_match(&mut unit, match_id).await?;
    unit.list_goals(match_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RecordGoalInput {
        RecordGoalInput {
            match_id: Uuid::new_v4(),
            scorer_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
    }

    #[test]
    fn scorer_and_mercenary_flag_are_exclusive() {
        let both = RecordGoalInput {
            is_scored_by_mercenary: true,
            ..input()
        };
        assert!(matches!(
            validate_attribution(&both),
            Err(AppError::Validation(_))
        ));

        let neither = RecordGoalInput {
            scorer_id: None,
            ..input()
        };
        assert!(matches!(
            validate_attribution(&neither),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn own_goal_rejects_any_assist() {
        let with_player = RecordGoalInput {
            is_own_goal: true,
            assist_id: Some(Uuid::new_v4()),
            ..input()
        };
        let with_mercenary = RecordGoalInput {
            is_own_goal: true,
            is_assisted_by_mercenary: true,
            ..input()
        };
        assert!(validate_attribution(&with_player).is_err());
        assert!(validate_attribution(&with_mercenary).is_err());
    }

    #[test]
    fn self_assist_is_rejected() {
        let goal = input();
        let self_assist = RecordGoalInput {
            assist_id: goal.scorer_id,
            ..goal
        };
        assert!(validate_attribution(&self_assist).is_err());
    }

    #[test]
    fn plain_goal_passes() {
        assert!(validate_attribution(&input()).is_ok());
    }
}
