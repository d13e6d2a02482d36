mod common;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn index_renders_player_counts() {
    let app = common::app::TestApp::new(&[("GROUP_IDS", "1"), ("GROUP_NAMES", "1:Alpha")]).await;

    Mock::given(method("GET"))
        .and(path("/v2/groups/1/games"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 10, "name": "G1", "placeId": 100},
                {"id": 20, "name": "G2", "placeId": 200}
            ]
        })))
        .expect(1)
        .mount(&app.mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/games"))
        .and(query_param("universeIds", "10,20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 10, "playing": 1500}]
        })))
        .expect(1)
        .mount(&app.mock)
        .await;

    let (status, body) = app.get("/").await;

    assert_eq!(status, 200);
    assert!(body.contains("Alpha"));
    assert!(body.contains("G1"));
    assert!(body.contains("G2"));
    assert!(body.contains("1,500"));
    assert!(body.contains("\"current_players\":0"));
}

#[tokio::test]
async fn index_without_group_ids_renders_error_with_200() {
    let app = common::app::TestApp::new(&[]).await;

    let (status, body) = app.get("/").await;

    assert_eq!(status, 200);
    assert!(body.contains("group error"));
    assert!(body.contains("GROUP_IDS"));
    assert!(body.contains("\"group_id\":0"));
    assert!(body.contains("\"error\":true"));
}

#[tokio::test]
async fn index_in_revenue_mode_without_cookie_renders_error() {
    let app =
        common::app::TestApp::new(&[("GROUP_IDS", "1"), ("DASHBOARD_MODE", "revenue")]).await;

    let (status, body) = app.get("/").await;

    assert_eq!(status, 200);
    assert!(body.contains("ROBLOX_COOKIE"));
}

#[tokio::test]
async fn index_survives_every_upstream_failing() {
    let app = common::app::TestApp::new(&[("GROUP_IDS", "1,2")]).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.mock)
        .await;

    let (status, body) = app.get("/").await;

    assert_eq!(status, 200);
    assert!(body.contains("Group 1"));
    assert!(body.contains("Group 2"));
    assert_eq!(body.matches("No games found.").count(), 2);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = common::app::TestApp::new(&[("GROUP_IDS", "1")]).await;

    let (status, _) = app.get("/health").await;

    assert_eq!(status, 404);
}
