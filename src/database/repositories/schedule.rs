//! Queries against `schedules`. The table belongs to the scheduling
//! subsystem; only the mercenary counts are written here.

use chrono::Utc;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::database::{models::{Schedule, TeamType}, utils::sql};
use crate::error::AppError;

const SCHEDULE_COLUMNS: &str = r#"
    id,
    host_team_id,
    invited_team_id,
    match_type,
    date,
    start_time,
    end_time,
    status,
    host_mercenary_count,
    invited_mercenary_count,
    created_at,
    updated_at
"#;

pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Schedule>, AppError> {
    let schedule = sqlx::query_as::<_, Schedule>(&sql(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = ?"
    )))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(schedule)
}

pub async fn set_mercenary_count(
    conn: &mut PgConnection,
    schedule_id: Uuid,
    team_type: TeamType,
    count: i32,
) -> Result<Option<Schedule>, AppError> {
    let column = match team_type {
        TeamType::Host => "host_mercenary_count",
        TeamType::Invited => "invited_mercenary_count",
    };
    let schedule = sqlx::query_as::<_, Schedule>(&sql(&format!(
        r#"
        UPDATE
            schedules
        SET
            {column} = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            {SCHEDULE_COLUMNS}
        "#
    )))
    .bind(count)
    .bind(Utc::now())
    .bind(schedule_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(schedule)
}
