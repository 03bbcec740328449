use actix_web::{App, http::StatusCode, test, web};
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use kickoff::database::MemoryStore;
use kickoff::database::models::{TeamRole, TeamType};
use kickoff::services::{Claims, InMemoryTeamDirectory};
use kickoff::{AppState, Config, ReadCache, routes};

mod common;

use common::TestContext;

fn bearer(config: &Config, user_id: Uuid) -> (&'static str, String) {
    let token = Claims::issue(user_id, &config.jwt_secret, Duration::hours(1)).unwrap();
    ("Authorization", format!("Bearer {}", token))
}

macro_rules! init_app {
    ($ctx:expr, $config:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($config.clone()))
                .app_data(web::Data::new(AppState::new(
                    $ctx.store.clone(),
                    $ctx.directory.clone(),
                    ReadCache::new(100, 60),
                )))
                .configure(routes::configure::<MemoryStore, InMemoryTeamDirectory>),
        )
        .await
    };
}

#[actix_web::test]
async fn requests_without_a_token_are_unauthorized() {
    let ctx = TestContext::new().await;
    let config = Config::test_config();
    let app = init_app!(ctx, config);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/schedules/{}/mvp-stats", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/matches/{}", Uuid::new_v4()))
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn errors_map_to_status_codes() {
    let ctx = TestContext::new().await;
    let config = Config::test_config();
    let schedule_id = ctx.squad_schedule().await;
    let member = ctx.add_member(ctx.host_team, TeamRole::Member).await;
    let app = init_app!(ctx, config);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/matches/{}", Uuid::new_v4()))
        .insert_header(bearer(&config, member))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/schedules/{}/matches", schedule_id))
        .insert_header(bearer(&config, member))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/schedules/{}/mercenaries", schedule_id))
        .insert_header(bearer(&config, ctx.host_manager))
        .set_json(json!({ "teamId": ctx.host_team, "teamType": "host", "count": -2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/schedules/{}/attendances/sync", schedule_id))
        .insert_header(bearer(&config, ctx.host_manager))
        .set_json(json!({ "teamId": ctx.host_team, "teamType": "invited" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn match_day_flow_over_http() {
    let ctx = TestContext::new().await;
    let config = Config::test_config();
    let schedule_id = ctx.squad_schedule().await;
    let members = ctx.add_members(ctx.host_team, 3).await;
    let app = init_app!(ctx, config);
    let manager = bearer(&config, ctx.host_manager);

    // roster
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/schedules/{}/attendances/sync", schedule_id))
        .insert_header(manager.clone())
        .set_json(json!({ "teamId": ctx.host_team, "teamType": "host" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["added"], json!(4));

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/schedules/{}/attendances/status", schedule_id))
        .insert_header(manager.clone())
        .set_json(json!({
            "teamId": ctx.host_team,
            "teamType": "host",
            "status": "attending"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["affected"], json!(4));

    // match and lineup
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/schedules/{}/matches", schedule_id))
        .insert_header(manager.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let match_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/matches/{}/lineup/assign", match_id))
        .insert_header(manager.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let lineup = body["data"].as_array().unwrap();
    assert_eq!(lineup.len(), 4);
    let scorer = lineup[0]["userId"].clone();

    // prime the board cache, then make sure a goal invalidates it
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/matches/{}", match_id))
        .insert_header(manager.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["goals"], json!([]));

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/matches/{}/goals", match_id))
        .insert_header(manager.clone())
        .set_json(json!({ "scorerId": scorer }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/matches/{}", match_id))
        .insert_header(manager.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let game = &body["data"]["match"];
    assert_eq!(
        game["homeScore"].as_i64().unwrap() + game["awayScore"].as_i64().unwrap(),
        1
    );
    assert_eq!(body["data"]["goals"].as_array().unwrap().len(), 1);

    // votes
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/schedules/{}/mvp-votes", schedule_id))
        .insert_header(bearer(&config, members[0]))
        .set_json(json!({ "targetUserId": members[1] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/schedules/{}/mvp-stats", schedule_id))
        .insert_header(bearer(&config, members[2]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let host = &body["data"]["teams"][0];
    assert_eq!(host["teamType"], json!(TeamType::Host.as_str()));
    assert_eq!(host["voted"], json!(1));
    assert_eq!(host["ranking"][0]["userId"], json!(members[1]));
}

#[actix_web::test]
async fn members_cannot_edit_matches() {
    let ctx = TestContext::new().await;
    let config = Config::test_config();
    let schedule_id = ctx.squad_schedule().await;
    let member = ctx.add_member(ctx.host_team, TeamRole::Member).await;
    let match_id = ctx.create_match(schedule_id).await;
    let app = init_app!(ctx, config);

    for uri in [
        format!("/api/v1/matches/{}/lineup/assign", match_id),
        format!("/api/v1/matches/{}/lineup/shuffle", match_id),
        format!("/api/v1/matches/{}/toggle-sides", match_id),
    ] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&config, member))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{}", uri);
    }
}
