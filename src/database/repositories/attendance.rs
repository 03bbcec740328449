use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::database::{
    models::{Attendance, AttendanceStatus, MvpCandidate, NewAttendance, TeamType},
    utils::sql,
};
use crate::error::AppError;

const ATTENDANCE_COLUMNS: &str = r#"
    id,
    schedule_id,
    user_id,
    team_type,
    attendance_status,
    mvp_to_user_id,
    mvp_received,
    voted_at,
    created_at,
    updated_at
"#;

pub async fn list_for_schedule(
    conn: &mut PgConnection,
    schedule_id: Uuid,
) -> Result<Vec<Attendance>, AppError> {
    let rows = sqlx::query_as::<_, Attendance>(&sql(&format!(
        r#"
        SELECT
            {ATTENDANCE_COLUMNS}
        FROM
            attendances
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

    Ok(rows)
}

pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Attendance>, AppError> {
    let row = sqlx::query_as::<_, Attendance>(&sql(&format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendances WHERE id = ?"
    )))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn find_by_user(
    conn: &mut PgConnection,
    schedule_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Attendance>, AppError> {
    let row = sqlx::query_as::<_, Attendance>(&sql(&format!(
        r#"
        SELECT
            {ATTENDANCE_COLUMNS}
        FROM
            attendances
        WHERE
            schedule_id = ?
            AND user_id = ?
        "#
    )))
    .bind(schedule_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

/// Same as [`find_by_id`], but holds a row lock until the transaction ends.
pub async fn find_by_id_for_update(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<Attendance>, AppError> {
    let row = sqlx::query_as::<_, Attendance>(&sql(&format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendances WHERE id = ? FOR UPDATE"
    )))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

/// Same as [`find_by_user`], but holds a row lock until the transaction ends.
pub async fn find_by_user_for_update(
    conn: &mut PgConnection,
    schedule_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Attendance>, AppError> {
    let row = sqlx::query_as::<_, Attendance>(&sql(&format!(
        r#"
        SELECT
            {ATTENDANCE_COLUMNS}
        FROM
            attendances
        WHERE
            schedule_id = ?
            AND user_id = ?
        FOR UPDATE
        "#
    )))
    .bind(schedule_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn insert(
    conn: &mut PgConnection,
    input: NewAttendance,
) -> Result<Option<Attendance>, AppError> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, Attendance>(&sql(&format!(
        r#"
        INSERT INTO
            attendances (
                id,
                schedule_id,
                user_id,
                team_type,
                attendance_status,
                mvp_received,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, 0, ?, ?)
        ON CONFLICT (schedule_id, user_id) DO NOTHING
        RETURNING
            {ATTENDANCE_COLUMNS}
        "#
    )))
    .bind(Uuid::new_v4())
    .bind(input.schedule_id)
    .bind(input.user_id)
    .bind(input.team_type)
    .bind(AttendanceStatus::Undecided)
    .bind(now)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn update_status(
    conn: &mut PgConnection,
    id: Uuid,
    status: AttendanceStatus,
) -> Result<Option<Attendance>, AppError> {
    let row = sqlx::query_as::<_, Attendance>(&sql(&format!(
        r#"
        UPDATE
            attendances
        SET
            attendance_status = ?,
            updated_at = ?
        WHERE
            id = ?
        RETURNING
            {ATTENDANCE_COLUMNS}
        "#
    )))
    .bind(status)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn bulk_update_status(
    conn: &mut PgConnection,
    schedule_id: Uuid,
    team_type: TeamType,
    status: AttendanceStatus,
    voted_at: DateTime<Utc>,
) -> Result<u64, AppError> {
    let result = sqlx::query(&sql(r#"
        UPDATE
            attendances
        SET
            attendance_status = ?,
            voted_at = ?,
            updated_at = ?
        WHERE
            schedule_id = ?
            AND team_type = ?
        "#))
    .bind(status)
    .bind(voted_at)
    .bind(voted_at)
    .bind(schedule_id)
    .bind(team_type)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query(&sql("DELETE FROM attendances WHERE id = ?"))
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_mvp_vote(
    conn: &mut PgConnection,
    attendance_id: Uuid,
    target_user_id: Option<Uuid>,
    voted_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(&sql(r#"
        UPDATE
            attendances
        SET
            mvp_to_user_id = ?,
            voted_at = ?,
            updated_at = ?
        WHERE
            id = ?
        "#))
    .bind(target_user_id)
    .bind(voted_at)
    .bind(voted_at)
    .bind(attendance_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn adjust_mvp_received(
    conn: &mut PgConnection,
    schedule_id: Uuid,
    user_id: Uuid,
    delta: i32,
) -> Result<u64, AppError> {
    let result = sqlx::query(&sql(r#"
        UPDATE
            attendances
        SET
            mvp_received = GREATEST(mvp_received + ?, 0),
            updated_at = ?
        WHERE
            schedule_id = ?
            AND user_id = ?
        "#))
    .bind(delta)
    .bind(Utc::now())
    .bind(schedule_id)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn clear_votes_for(
    conn: &mut PgConnection,
    schedule_id: Uuid,
    user_id: Uuid,
) -> Result<u64, AppError> {
    let result = sqlx::query(&sql(r#"
        UPDATE
            attendances
        SET
            mvp_to_user_id = NULL,
            updated_at = ?
        WHERE
            schedule_id = ?
            AND mvp_to_user_id = ?
        "#))
    .bind(Utc::now())
    .bind(schedule_id)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn list_mvp_candidates(
    conn: &mut PgConnection,
    schedule_id: Uuid,
) -> Result<Vec<MvpCandidate>, AppError> {
    let rows = sqlx::query_as::<_, MvpCandidate>(&sql(r#"
        SELECT
            a.user_id,
            u.nickname,
            a.team_type,
            a.mvp_to_user_id,
            a.mvp_received
        FROM
            attendances a
            INNER JOIN users u ON u.id = a.user_id
        WHERE
            a.schedule_id = ?
        ORDER BY
            a.created_at,
            a.id
        "#))
    .bind(schedule_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}
