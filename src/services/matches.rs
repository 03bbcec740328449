use uuid::Uuid;

use crate::database::models::{Match, MatchBoard, MatchType, NewMatch};
use crate::database::{Store, UnitOfWork};
use crate::error::AppError;
use crate::services::attendance::load_schedule;
use crate::services::changes::{ChangeSet, Mutation};
use crate::services::directory::AuthorizationProvider;
use crate::services::lineup::load_match;
use crate::services::permissions::{require_manager, require_match_editor};

/// Opens a new match under a schedule. Only the host team's managers may do so.
pub async fn create_match<S, A>(
    store: &S,
    auth: &A,
    schedule_id: Uuid,
    requester_id: Uuid,
) -> Result<Mutation<Match>, AppError>
where
    S: Store,
    A: AuthorizationProvider + ?Sized,
{
    let mut unit = store.begin().await?;
    let schedule = load_schedule(&mut unit, schedule_id).await?;
    require_manager(auth, requester_id, schedule.host_team_id).await?;

    let away_team_id = match (schedule.match_type, schedule.invited_team_id) {
        (MatchType::Squad, _) => schedule.host_team_id,
        (MatchType::Team, Some(invited)) => invited,
        (MatchType::Team, None) => {
            return Err(AppError::conflict("team match has no invited team"));
        }
    };

    let game = unit
        .insert_match(NewMatch {
            schedule_id,
            home_team_id: schedule.host_team_id,
            away_team_id,
            home_mercenary_count: schedule.host_mercenary_count,
            away_mercenary_count: schedule.invited_mercenary_count,
        })
        .await?;
    unit.commit().await?;

    log::info!(
        "Created {} match {} under schedule {}",
        schedule.match_type,
        game.id,
        schedule_id
    );

    let match_id = game.id;
    Ok(Mutation::new(game, ChangeSet::game(schedule_id, match_id)))
}

pub async fn get_match_board<S: Store>(store: &S, match_id: Uuid) -> Result<MatchBoard, AppError> {
    let mut unit = store.begin().await?;
    let (game, _) = load_match(&mut unit, match_id).await?;
    let lineup = unit.list_lineup(match_id).await?;
    let goals = unit.list_goals(match_id).await?;

    Ok(MatchBoard {
        game,
        lineup,
        goals,
    })
}

/// Checks match-edit permission for `requester_id` on the match's schedule.
pub async fn authorize_match_edit<S, A>(
    store: &S,
    auth: &A,
    match_id: Uuid,
    requester_id: Uuid,
) -> Result<(), AppError>
where
    S: Store,
    A: AuthorizationProvider + ?Sized,
{
    let schedule = {
        let mut unit = store.begin().await?;
        let (_, schedule) = load_match(&mut unit, match_id).await?;
        schedule
    };
    require_match_editor(auth, requester_id, &schedule).await
}
