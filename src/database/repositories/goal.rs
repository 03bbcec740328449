//! Goal records. Score bookkeeping lives in `matches::adjust_score`.

use chrono::Utc;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::database::{models::{GoalRecord, NewGoalRecord}, utils::sql};
use crate::error::AppError;

const GOAL_COLUMNS: &str = r#"
    id,
    match_id,
    scorer_side,
    scorer_id,
    assist_id,
    is_own_goal,
    is_scored_by_mercenary,
    is_assisted_by_mercenary,
    created_at
"#;

pub async fn insert(conn: &mut PgConnection, input: NewGoalRecord) -> Result<GoalRecord, AppError> {
    let goal = sqlx::query_as::<_, GoalRecord>(&sql(&format!(
        r#"
        INSERT INTO
            goal_records (
                id,
                match_id,
                scorer_side,
                scorer_id,
                assist_id,
                is_own_goal,
                is_scored_by_mercenary,
                is_assisted_by_mercenary,
                created_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            {GOAL_COLUMNS}
        "#
    )))
    .bind(Uuid::new_v4())
    .bind(input.match_id)
    .bind(input.scorer_side)
    .bind(input.scorer_id)
    .bind(input.assist_id)
    .bind(input.is_own_goal)
    .bind(input.is_scored_by_mercenary)
    .bind(input.is_assisted_by_mercenary)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Ok(goal)
}

pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<GoalRecord>, AppError> {
    let goal = sqlx::query_as::<_, GoalRecord>(&sql(&format!(
        "SELECT {GOAL_COLUMNS} FROM goal_records WHERE id = ?"
    )))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(goal)
}

pub async fn list_for_match(
    conn: &mut PgConnection,
    match_id: Uuid,
) -> Result<Vec<GoalRecord>, AppError> {
    let goals = sqlx::query_as::<_, GoalRecord>(&sql(&format!(
        r#"
        SELECT
            {GOAL_COLUMNS}
        FROM
            goal_records
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

    Ok(goals)
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query(&sql("DELETE FROM goal_records WHERE id = ?"))
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn flip_sides(conn: &mut PgConnection, match_id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query(&sql(r#"
        UPDATE
            goal_records
        SET
            scorer_side = CASE scorer_side
                WHEN 'home' THEN 'away'
                ELSE 'home'
            END
        WHERE
            match_id = ?
        "#))
    .bind(match_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
