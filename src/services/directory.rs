use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::database::{models::TeamRole, utils::sql};
use crate::error::AppError;

/// Approved membership of teams, owned by the roster subsystem.
#[async_trait]
pub trait TeamRosterProvider: Send + Sync {
    async fn approved_members(&self, team_id: Uuid) -> Result<Vec<Uuid>, AppError>;
}

/// Role lookup, owned by the identity subsystem. Failures surface as
/// [`AppError::Authorization`].
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    async fn role_of(&self, user_id: Uuid, team_id: Uuid) -> Result<TeamRole, AppError>;
}

/// Both collaborators the engine needs from the team subsystem.
pub trait TeamDirectory: TeamRosterProvider + AuthorizationProvider {}

impl<T: TeamRosterProvider + AuthorizationProvider> TeamDirectory for T {}

/// Reads memberships from the `team_members` table.
#[derive(Clone)]
pub struct PgTeamDirectory {
    pool: PgPool,
}

impl PgTeamDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRosterProvider for PgTeamDirectory {
    async fn approved_members(&self, team_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let members = sqlx::query_scalar::<_, Uuid>(&sql(r#"
            SELECT
                user_id
            FROM
                team_members
            WHERE
                team_id = ?
                AND status = 'approved'
            ORDER BY
                created_at,
                user_id
        "#))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}

#[async_trait]
impl AuthorizationProvider for PgTeamDirectory {
    async fn role_of(&self, user_id: Uuid, team_id: Uuid) -> Result<TeamRole, AppError> {
        let role = sqlx::query_scalar::<_, TeamRole>(&sql(r#"
            SELECT
                role
            FROM
                team_members
            WHERE
                team_id = ?
                AND user_id = ?
                AND status = 'approved'
        "#))
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Role lookup for user {} on team {} failed: {}", user_id, team_id, e);
            AppError::forbidden("unable to verify team role")
        })?;

        Ok(role.unwrap_or(TeamRole::None))
    }
}

/// Directory kept in memory, for local runs and tests.
#[derive(Clone, Default)]
pub struct InMemoryTeamDirectory {
    teams: Arc<RwLock<HashMap<Uuid, Vec<(Uuid, TeamRole)>>>>,
}

impl InMemoryTeamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an approved member, or changes the role of an existing one.
    pub fn add_member(&self, team_id: Uuid, user_id: Uuid, role: TeamRole) {
        let mut teams = self.teams.write().unwrap_or_else(|e| e.into_inner());
        let members = teams.entry(team_id).or_default();
        match members.iter_mut().find(|(id, _)| *id == user_id) {
            Some(member) => member.1 = role,
            None => members.push((user_id, role)),
        }
    }

    pub fn remove_member(&self, team_id: Uuid, user_id: Uuid) {
        let mut teams = self.teams.write().unwrap_or_else(|e| e.into_inner());
        if let Some(members) = teams.get_mut(&team_id) {
            members.retain(|(id, _)| *id != user_id);
        }
    }
}

#[async_trait]
impl TeamRosterProvider for InMemoryTeamDirectory {
    async fn approved_members(&self, team_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let teams = self.teams.read().unwrap_or_else(|e| e.into_inner());
        Ok(teams
            .get(&team_id)
            .map(|members| {
                members
                    .iter()
                    .filter(|(_, role)| role.is_approved())
                    .map(|(id, _)| *id)
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl AuthorizationProvider for InMemoryTeamDirectory {
    async fn role_of(&self, user_id: Uuid, team_id: Uuid) -> Result<TeamRole, AppError> {
        let teams = self.teams.read().unwrap_or_else(|e| e.into_inner());
        Ok(teams
            .get(&team_id)
            .and_then(|members| members.iter().find(|(id, _)| *id == user_id))
            .map(|(_, role)| *role)
            .unwrap_or_default())
    }
}
