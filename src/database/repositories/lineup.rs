use chrono::Utc;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::database::{models::{Lineup, LineupSide}, utils::sql};
use crate::error::AppError;

const LINEUP_COLUMNS: &str = r#"
    id,
    match_id,
    user_id,
    side,
    created_at,
    updated_at
"#;

pub async fn list_for_match(
    conn: &mut PgConnection,
    match_id: Uuid,
) -> Result<Vec<Lineup>, AppError> {
    let rows = sqlx::query_as::<_, Lineup>(&sql(&format!(
        r#"
        SELECT
            {LINEUP_COLUMNS}
        FROM
            lineups
        WHERE
            match_id = ?
        ORDER BY
            created_at,
            id
        "#
    )))
    .bind(match_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Lineup>, AppError> {
    let row = sqlx::query_as::<_, Lineup>(&sql(&format!(
        "SELECT {LINEUP_COLUMNS} FROM lineups WHERE id = ?"
    )))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn find_by_user(
    conn: &mut PgConnection,
    match_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Lineup>, AppError> {
    let row = sqlx::query_as::<_, Lineup>(&sql(&format!(
        "SELECT {LINEUP_COLUMNS} FROM lineups WHERE match_id = ? AND user_id = ?"
    )))
    .bind(match_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn insert(
    conn: &mut PgConnection,
    match_id: Uuid,
    user_id: Uuid,
    side: LineupSide,
) -> Result<Lineup, AppError> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, Lineup>(&sql(&format!(
        r#"
        INSERT INTO
            lineups (
                id,
                match_id,
                user_id,
                side,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?)
        RETURNING
            {LINEUP_COLUMNS}
        "#
    )))
    .bind(Uuid::new_v4())
    .bind(match_id)
    .bind(user_id)
    .bind(side)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn update_side(
    conn: &mut PgConnection,
    id: Uuid,
    side: LineupSide,
) -> Result<Option<Lineup>, AppError> {
    let row = sqlx::query_as::<_, Lineup>(&sql(&format!(
        r#"
        UPDATE
            lineups
        SET
            side = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            {LINEUP_COLUMNS}
        "#
    )))
    .bind(side)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query(&sql("DELETE FROM lineups WHERE id = ?"))
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_for_match(conn: &mut PgConnection, match_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query(&sql("DELETE FROM lineups WHERE match_id = ?"))
        .bind(match_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn flip_sides(conn: &mut PgConnection, match_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query(&sql(r#"
        UPDATE
            lineups
        SET
            side = CASE side
                WHEN 'home' THEN 'away'
                WHEN 'away' THEN 'home'
                ELSE side
            END,
            updated_at = ?
        WHERE
            match_id = ?
            AND side <> 'undecided'
        "#))
    .bind(Utc::now())
    .bind(match_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
