use kickoff::database::models::{AttendanceStatus, RecordGoalInput, TeamRole, TeamType};
use kickoff::error::AppError;
use kickoff::services::{attendance, lineup, matches, mvp, score};
use pretty_assertions::assert_eq;
use uuid::Uuid;

mod common;

use common::{TestContext, seeded_rng};

#[tokio::test]
async fn sync_adds_only_approved_members_once() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    ctx.add_members(ctx.host_team, 3).await;
    let outsider = ctx.add_member(ctx.host_team, TeamRole::None).await;

    let first = attendance::sync_attendance(
        &ctx.store,
        &ctx.directory,
        schedule_id,
        ctx.host_team,
        TeamType::Host,
    )
    .await
    .unwrap();
    // three members plus the manager
    assert_eq!(first.value.added, 4);
    assert_eq!(first.changes.schedules, vec![schedule_id]);

    let second = attendance::sync_attendance(
        &ctx.store,
        &ctx.directory,
        schedule_id,
        ctx.host_team,
        TeamType::Host,
    )
    .await
    .unwrap();
    assert_eq!(second.value.added, 0);

    let rows = attendance::list_attendance(&ctx.store, schedule_id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.user_id != outsider));
    assert!(
        rows.iter()
            .all(|r| r.attendance_status == AttendanceStatus::Undecided)
    );
}

#[tokio::test]
async fn sync_keeps_existing_rows_untouched() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    ctx.add_members(ctx.host_team, 2).await;
    ctx.attend_all(schedule_id, TeamType::Host).await;

    let late = ctx.add_member(ctx.host_team, TeamRole::Member).await;
    let result = attendance::sync_attendance(
        &ctx.store,
        &ctx.directory,
        schedule_id,
        ctx.host_team,
        TeamType::Host,
    )
    .await
    .unwrap();
    assert_eq!(result.value.added, 1);

    let rows = attendance::list_attendance(&ctx.store, schedule_id)
        .await
        .unwrap();
    for row in rows {
        let expected = if row.user_id == late {
            AttendanceStatus::Undecided
        } else {
            AttendanceStatus::Attending
        };
        assert_eq!(row.attendance_status, expected);
    }
}

#[tokio::test]
async fn sync_rejects_team_that_is_not_on_the_schedule() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;

    let err = attendance::sync_attendance(
        &ctx.store,
        &ctx.directory,
        schedule_id,
        ctx.invited_team,
        TeamType::Invited,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let missing = attendance::sync_attendance(
        &ctx.store,
        &ctx.directory,
        Uuid::new_v4(),
        ctx.host_team,
        TeamType::Host,
    )
    .await
    .unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));
}

#[tokio::test]
async fn members_change_their_own_status_but_not_others() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    let members = ctx.add_members(ctx.host_team, 2).await;
    attendance::sync_attendance(
        &ctx.store,
        &ctx.directory,
        schedule_id,
        ctx.host_team,
        TeamType::Host,
    )
    .await
    .unwrap();

    let rows = attendance::list_attendance(&ctx.store, schedule_id)
        .await
        .unwrap();
    let own = rows.iter().find(|r| r.user_id == members[0]).unwrap();
    let other = rows.iter().find(|r| r.user_id == members[1]).unwrap();

    let updated = attendance::set_attendance_status(
        &ctx.store,
        &ctx.directory,
        own.id,
        ctx.host_team,
        AttendanceStatus::Attending,
        members[0],
    )
    .await
    .unwrap();
    assert_eq!(updated.value.attendance_status, AttendanceStatus::Attending);

    let err = attendance::set_attendance_status(
        &ctx.store,
        &ctx.directory,
        other.id,
        ctx.host_team,
        AttendanceStatus::NotAttending,
        members[0],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    let by_manager = attendance::set_attendance_status(
        &ctx.store,
        &ctx.directory,
        other.id,
        ctx.host_team,
        AttendanceStatus::NotAttending,
        ctx.host_manager,
    )
    .await
    .unwrap();
    assert_eq!(
        by_manager.value.attendance_status,
        AttendanceStatus::NotAttending
    );
}

#[tokio::test]
async fn bulk_update_touches_one_team_and_stamps_voted_at() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.team_schedule().await;
    ctx.add_members(ctx.host_team, 3).await;
    ctx.add_members(ctx.invited_team, 2).await;
    for team_type in [TeamType::Host, TeamType::Invited] {
        let (team_id, _) = ctx.team_for(team_type);
        attendance::sync_attendance(&ctx.store, &ctx.directory, schedule_id, team_id, team_type)
            .await
            .unwrap();
    }

    let result = attendance::bulk_set_attendance_status(
        &ctx.store,
        &ctx.directory,
        schedule_id,
        ctx.invited_team,
        TeamType::Invited,
        AttendanceStatus::Attending,
        ctx.invited_manager,
    )
    .await
    .unwrap();
    assert_eq!(result.value.affected, 3);

    let rows = attendance::list_attendance(&ctx.store, schedule_id)
        .await
        .unwrap();
    for row in rows {
        match row.team_type {
            TeamType::Invited => {
                assert_eq!(row.attendance_status, AttendanceStatus::Attending);
                assert!(row.voted_at.is_some());
            }
            TeamType::Host => {
                assert_eq!(row.attendance_status, AttendanceStatus::Undecided);
                assert!(row.voted_at.is_none());
            }
        }
    }
}

#[tokio::test]
async fn bulk_update_requires_a_manager() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    let member = ctx.add_member(ctx.host_team, TeamRole::Member).await;

    let err = attendance::bulk_set_attendance_status(
        &ctx.store,
        &ctx.directory,
        schedule_id,
        ctx.host_team,
        TeamType::Host,
        AttendanceStatus::Attending,
        member,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));
}

#[tokio::test]
async fn removing_a_member_withdraws_votes_both_ways() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    let members = ctx.add_members(ctx.host_team, 3).await;
    ctx.attend_all(schedule_id, TeamType::Host).await;

    // members[0] votes members[1]; members[1] and members[2] vote members[0]
    mvp::vote_mvp(&ctx.store, schedule_id, members[0], members[1])
        .await
        .unwrap();
    mvp::vote_mvp(&ctx.store, schedule_id, members[1], members[0])
        .await
        .unwrap();
    mvp::vote_mvp(&ctx.store, schedule_id, members[2], members[0])
        .await
        .unwrap();

    let rows = attendance::list_attendance(&ctx.store, schedule_id)
        .await
        .unwrap();
    let removed = rows.iter().find(|r| r.user_id == members[0]).unwrap();
    attendance::remove_attendance(&ctx.store, &ctx.directory, removed.id, ctx.host_manager)
        .await
        .unwrap();

    let rows = attendance::list_attendance(&ctx.store, schedule_id)
        .await
        .unwrap();
    assert!(rows.iter().all(|r| r.user_id != members[0]));
    assert!(rows.iter().all(|r| r.mvp_to_user_id != Some(members[0])));
    let target = rows.iter().find(|r| r.user_id == members[1]).unwrap();
    assert_eq!(target.mvp_received, 0);
}

#[tokio::test]
async fn remove_attendance_requires_a_manager() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    let member = ctx.add_member(ctx.host_team, TeamRole::Member).await;
    ctx.attend_all(schedule_id, TeamType::Host).await;

    let rows = attendance::list_attendance(&ctx.store, schedule_id)
        .await
        .unwrap();
    let err = attendance::remove_attendance(&ctx.store, &ctx.directory, rows[0].id, member)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));
    assert_eq!(
        attendance::list_attendance(&ctx.store, schedule_id)
            .await
            .unwrap()
            .len(),
        rows.len()
    );
}

#[tokio::test]
async fn mercenary_count_is_validated_and_stored_per_side() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.team_schedule().await;

    let updated = attendance::set_mercenary_count(
        &ctx.store,
        &ctx.directory,
        schedule_id,
        ctx.invited_team,
        TeamType::Invited,
        2,
        ctx.invited_manager,
    )
    .await
    .unwrap();
    assert_eq!(updated.value.invited_mercenary_count, 2);
    assert_eq!(updated.value.host_mercenary_count, 0);

    let negative = attendance::set_mercenary_count(
        &ctx.store,
        &ctx.directory,
        schedule_id,
        ctx.host_team,
        TeamType::Host,
        -1,
        ctx.host_manager,
    )
    .await
    .unwrap_err();
    assert!(matches!(negative, AppError::Validation(_)));

    let wrong_team = attendance::set_mercenary_count(
        &ctx.store,
        &ctx.directory,
        schedule_id,
        ctx.invited_team,
        TeamType::Host,
        1,
        ctx.invited_manager,
    )
    .await
    .unwrap_err();
    assert!(matches!(wrong_team, AppError::Conflict(_)));
}

#[tokio::test]
async fn removing_a_member_drops_their_lineup_rows() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    let members = ctx.add_members(ctx.host_team, 3).await;
    ctx.attend_all(schedule_id, TeamType::Host).await;
    let first_match = ctx.create_match(schedule_id).await;
    let second_match = ctx.create_match(schedule_id).await;
    for match_id in [first_match, second_match] {
        lineup::assign_lineup(&ctx.store, match_id, &mut seeded_rng(8))
            .await
            .unwrap();
    }

    let rows = attendance::list_attendance(&ctx.store, schedule_id)
        .await
        .unwrap();
    let leaving = rows.iter().find(|r| r.user_id == members[0]).unwrap();
    let removed =
        attendance::remove_attendance(&ctx.store, &ctx.directory, leaving.id, ctx.host_manager)
            .await
            .unwrap();

    let mut touched = removed.changes.matches.clone();
    touched.sort();
    let mut expected = vec![first_match, second_match];
    expected.sort();
    assert_eq!(touched, expected);

    for match_id in [first_match, second_match] {
        let board = matches::get_match_board(&ctx.store, match_id).await.unwrap();
        assert_eq!(board.lineup.len(), 3);
        assert!(board.lineup.iter().all(|l| l.user_id != members[0]));
    }

    let err = score::record_goal(
        &ctx.store,
        RecordGoalInput {
            match_id: first_match,
            scorer_id: Some(members[0]),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
