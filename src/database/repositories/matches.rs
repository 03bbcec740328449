use chrono::Utc;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::database::{models::{Match, NewMatch, Side}, utils::sql};
use crate::error::AppError;

const MATCH_COLUMNS: &str = r#"
    id,
    schedule_id,
    home_team_id,
    away_team_id,
    home_score,
    away_score,
    home_mercenary_count,
    away_mercenary_count,
    created_at,
    updated_at
"#;

pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Match>, AppError> {
    let game = sqlx::query_as::<_, Match>(&sql(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?"
    )))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(game)
}

pub async fn list_for_schedule(
    conn: &mut PgConnection,
    schedule_id: Uuid,
) -> Result<Vec<Match>, AppError> {
    let games = sqlx::query_as::<_, Match>(&sql(&format!(
        r#"
        SELECT
            {MATCH_COLUMNS}
        FROM
            matches
        WHERE
            schedule_id = ?
        ORDER BY
            created_at,
            id
        "#
    )))
    .bind(schedule_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(games)
}

pub async fn insert(conn: &mut PgConnection, input: NewMatch) -> Result<Match, AppError> {
    let now = Utc::now();
    let game = sqlx::query_as::<_, Match>(&sql(&format!(
        r#"
        INSERT INTO
            matches (
                id,
                schedule_id,
                home_team_id,
                away_team_id,
                home_score,
                away_score,
                home_mercenary_count,
                away_mercenary_count,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, 0, 0, ?, ?, ?, ?)
        RETURNING
            {MATCH_COLUMNS}
        "#
    )))
    .bind(Uuid::new_v4())
    .bind(input.schedule_id)
    .bind(input.home_team_id)
    .bind(input.away_team_id)
    .bind(input.home_mercenary_count)
    .bind(input.away_mercenary_count)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(game)
}

pub async fn adjust_score(
    conn: &mut PgConnection,
    match_id: Uuid,
    side: Side,
    delta: i32,
) -> Result<Match, AppError> {
    let column = match side {
        Side::Home => "home_score",
        Side::Away => "away_score",
    };
    // The non-negative CHECK on the column rejects a decrement past zero.
    let game = sqlx::query_as::<_, Match>(&sql(&format!(
        r#"
        UPDATE
            matches
        SET
            {column} = {column} + ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            {MATCH_COLUMNS}
        "#
    )))
    .bind(delta)
    .bind(Utc::now())
    .bind(match_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::not_found("Match not found"))?;

    Ok(game)
}

pub async fn swap_sides(conn: &mut PgConnection, match_id: Uuid) -> Result<Match, AppError> {
    // Postgres evaluates every right-hand side against the old row.
    let game = sqlx::query_as::<_, Match>(&sql(&format!(
        r#"
        UPDATE
            matches
        SET
            home_team_id = away_team_id,
            away_team_id = home_team_id,
            home_score = away_score,
            away_score = home_score,
            home_mercenary_count = away_mercenary_count,
            away_mercenary_count = home_mercenary_count,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            {MATCH_COLUMNS}
        "#
    )))
    .bind(Utc::now())
    .bind(match_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::not_found("Match not found"))?;

    Ok(game)
}
