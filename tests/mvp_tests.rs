use kickoff::database::models::{TeamRole, TeamType};
use kickoff::error::AppError;
use kickoff::services::{attendance, mvp};
use pretty_assertions::assert_eq;
use uuid::Uuid;

mod common;

use common::TestContext;

async fn received(ctx: &TestContext, schedule_id: Uuid, user_id: Uuid) -> i32 {
    attendance::list_attendance(&ctx.store, schedule_id)
        .await
        .unwrap()
        .into_iter()
        .find(|row| row.user_id == user_id)
        .map(|row| row.mvp_received)
        .unwrap()
}

#[tokio::test]
async fn changing_a_vote_moves_the_counter() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    let members = ctx.add_members(ctx.host_team, 3).await;
    ctx.attend_all(schedule_id, TeamType::Host).await;

    let vote = mvp::vote_mvp(&ctx.store, schedule_id, members[0], members[1])
        .await
        .unwrap();
    assert_eq!(vote.value.mvp_to_user_id, Some(members[1]));
    assert!(vote.value.voted_at.is_some());
    assert_eq!(received(&ctx, schedule_id, members[1]).await, 1);

    // voting the same target twice counts once
    mvp::vote_mvp(&ctx.store, schedule_id, members[0], members[1])
        .await
        .unwrap();
    assert_eq!(received(&ctx, schedule_id, members[1]).await, 1);

    mvp::vote_mvp(&ctx.store, schedule_id, members[0], members[2])
        .await
        .unwrap();
    assert_eq!(received(&ctx, schedule_id, members[1]).await, 0);
    assert_eq!(received(&ctx, schedule_id, members[2]).await, 1);
}

#[tokio::test]
async fn invalid_votes_are_rejected() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    let members = ctx.add_members(ctx.host_team, 2).await;
    ctx.attend_all(schedule_id, TeamType::Host).await;
    let outsider = ctx.add_member(ctx.invited_team, TeamRole::Member).await;

    let own = mvp::vote_mvp(&ctx.store, schedule_id, members[0], members[0])
        .await
        .unwrap_err();
    assert!(matches!(own, AppError::Validation(_)));

    let not_on_schedule = mvp::vote_mvp(&ctx.store, schedule_id, outsider, members[0])
        .await
        .unwrap_err();
    assert!(matches!(not_on_schedule, AppError::Authorization(_)));

    let unknown_target = mvp::vote_mvp(&ctx.store, schedule_id, members[0], outsider)
        .await
        .unwrap_err();
    assert!(matches!(unknown_target, AppError::NotFound(_)));

    assert_eq!(received(&ctx, schedule_id, members[0]).await, 0);
}

#[tokio::test]
async fn stats_report_both_teams_of_a_team_match() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.team_schedule().await;
    let host = ctx.add_members(ctx.host_team, 3).await;
    let invited = ctx.add_members(ctx.invited_team, 1).await;
    ctx.attend_all(schedule_id, TeamType::Host).await;
    ctx.attend_all(schedule_id, TeamType::Invited).await;

    mvp::vote_mvp(&ctx.store, schedule_id, host[0], host[1])
        .await
        .unwrap();
    mvp::vote_mvp(&ctx.store, schedule_id, host[2], host[1])
        .await
        .unwrap();
    mvp::vote_mvp(&ctx.store, schedule_id, invited[0], host[0])
        .await
        .unwrap();

    let stats = mvp::get_mvp_stats(&ctx.store, schedule_id).await.unwrap();
    assert_eq!(stats.teams.len(), 2);

    let host_stats = stats.team(TeamType::Host).unwrap();
    assert_eq!(host_stats.total, 4);
    assert_eq!(host_stats.voted, 2);
    assert_eq!(host_stats.not_voted, 2);
    assert_eq!(host_stats.vote_rate, 50);
    assert_eq!(host_stats.ranking[0].user_id, host[1]);
    assert_eq!(host_stats.ranking[0].mvp_received, 2);
    assert_eq!(host_stats.ranking[1].user_id, host[0]);

    let invited_stats = stats.team(TeamType::Invited).unwrap();
    assert_eq!(invited_stats.total, 2);
    assert_eq!(invited_stats.voted, 1);
    assert_eq!(invited_stats.vote_rate, 50);
}

#[tokio::test]
async fn squad_stats_have_only_the_host_team() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    ctx.add_members(ctx.host_team, 2).await;
    ctx.attend_all(schedule_id, TeamType::Host).await;

    let stats = mvp::get_mvp_stats(&ctx.store, schedule_id).await.unwrap();
    assert_eq!(stats.teams.len(), 1);
    assert_eq!(stats.teams[0].team_type, TeamType::Host);
    assert_eq!(stats.teams[0].vote_rate, 0);
}

#[tokio::test]
async fn simultaneous_votes_by_one_voter_count_once() {
    let ctx = TestContext::new().await;
    let schedule_id = ctx.squad_schedule().await;
    let members = ctx.add_members(ctx.host_team, 3).await;
    ctx.attend_all(schedule_id, TeamType::Host).await;

    let (first, second) = tokio::join!(
        mvp::vote_mvp(&ctx.store, schedule_id, members[0], members[1]),
        mvp::vote_mvp(&ctx.store, schedule_id, members[0], members[2]),
    );
    first.unwrap();
    second.unwrap();

    let rows = attendance::list_attendance(&ctx.store, schedule_id)
        .await
        .unwrap();
    let voter = rows.iter().find(|r| r.user_id == members[0]).unwrap();
    let held = voter.mvp_to_user_id.unwrap();
    let total: i32 = rows.iter().map(|r| r.mvp_received).sum();

    assert_eq!(total, 1);
    assert_eq!(received(&ctx, schedule_id, held).await, 1);
}
