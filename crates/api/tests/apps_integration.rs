//! Integration tests for application management and event queries

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use beacon_api::{AppState, build_router};
use beacon_auth::{LocalHsProvider, test_utils};
use beacon_registry::AppRegistry;
use beacon_store::EventStore;

struct TestServer {
    app: Router,
    state: AppState,
    _registry_dir: TempDir,
    _data_dir: TempDir,
}

fn test_server() -> TestServer {
    let registry_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();

    let state = AppState::new(
        AppRegistry::open(registry_dir.path().join("app-metadata.json")).unwrap(),
        EventStore::new(data_dir.path()),
        Arc::new(LocalHsProvider::new(test_utils::TEST_SECRET)),
    );

    let app = build_router(state.clone())
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4444))));

    TestServer {
        app,
        state,
        _registry_dir: registry_dir,
        _data_dir: data_dir,
    }
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(json!({}))
}

fn admin_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let token = test_utils::admin_token("admin-1");
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json");
    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

// ============================================================================
// Auth gating
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_bearer_token() {
    let server = test_server();

    for (method, uri) in [
        (Method::GET, "/analytics/api/v1/apps"),
        (Method::POST, "/analytics/api/v1/apps"),
        (Method::PUT, "/analytics/api/v1/apps/deadbeef"),
        (Method::DELETE, "/analytics/api/v1/apps/deadbeef"),
        (Method::GET, "/analytics/api/v1/apps/deadbeef/events"),
    ] {
        let request = Request::builder()
            .method(method.clone())
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = server.app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} must be gated"
        );
    }
}

#[tokio::test]
async fn test_invalid_bearer_token_is_rejected() {
    let server = test_server();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/analytics/api/v1/apps")
        .header(header::AUTHORIZATION, "Bearer nonsense")
        .body(Body::empty())
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_create_list_update_delete_app() {
    let server = test_server();

    // Create
    let response = server
        .app
        .clone()
        .oneshot(admin_request(
            Method::POST,
            "/analytics/api/v1/apps",
            Some(json!({"name": "Site", "allowed_origins": ["https://example.com"]})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Site");
    assert_eq!(created["allowed_origins"][0], "https://example.com");
    assert!(created["api_key"].as_str().is_some());

    // List
    let response = server
        .app
        .clone()
        .oneshot(admin_request(Method::GET, "/analytics/api/v1/apps", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = response_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Update
    let response = server
        .app
        .clone()
        .oneshot(admin_request(
            Method::PUT,
            &format!("/analytics/api/v1/apps/{id}"),
            Some(json!({"name": "Renamed", "allowed_origins": []})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;
    assert_eq!(updated["name"], "Renamed");
    assert_eq!(updated["id"], id.as_str());

    // Delete
    let response = server
        .app
        .clone()
        .oneshot(admin_request(
            Method::DELETE,
            &format!("/analytics/api/v1/apps/{id}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(server.state.registry.get(&id).is_none());
}

#[tokio::test]
async fn test_create_with_trailing_slash_path() {
    let server = test_server();

    let response = server
        .app
        .oneshot(admin_request(
            Method::POST,
            "/analytics/api/v1/apps/",
            Some(json!({"name": "Site"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_without_name_is_400() {
    let server = test_server();

    let response = server
        .app
        .oneshot(admin_request(
            Method::POST,
            "/analytics/api/v1/apps",
            Some(json!({"allowed_origins": []})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_duplicate_name_is_409() {
    let server = test_server();
    server.state.registry.create("Site", Vec::new()).unwrap();

    let response = server
        .app
        .oneshot(admin_request(
            Method::POST,
            "/analytics/api/v1/apps",
            Some(json!({"name": "Site"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_and_delete_unknown_app_is_404() {
    let server = test_server();

    let response = server
        .app
        .clone()
        .oneshot(admin_request(
            Method::PUT,
            "/analytics/api/v1/apps/deadbeef",
            Some(json!({"name": "x"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server
        .app
        .oneshot(admin_request(
            Method::DELETE,
            "/analytics/api/v1/apps/deadbeef",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Events query
// ============================================================================

#[tokio::test]
async fn test_events_for_unknown_app_is_404() {
    let server = test_server();

    let response = server
        .app
        .oneshot(admin_request(
            Method::GET,
            "/analytics/api/v1/apps/deadbeef/events",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_events_bad_start_minutes_is_400() {
    let server = test_server();
    let app_rec = server.state.registry.create("Site", Vec::new()).unwrap();

    let response = server
        .app
        .oneshot(admin_request(
            Method::GET,
            &format!(
                "/analytics/api/v1/apps/{}/events?start-minutes-since-epoch=abc",
                app_rec.id
            ),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_events_empty_result_is_json_array() {
    let server = test_server();
    let app_rec = server.state.registry.create("Site", Vec::new()).unwrap();

    let response = server
        .app
        .oneshot(admin_request(
            Method::GET,
            &format!("/analytics/api/v1/apps/{}/events", app_rec.id),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"[]", "empty result must encode as [], not null");
}

#[tokio::test]
async fn test_events_explicit_start_minute_hits_store() {
    let server = test_server();
    let app_rec = server.state.registry.create("Site", Vec::new()).unwrap();

    // Write straight to the store: no cache exists, so the query scans disk
    let now = chrono::Utc::now();
    let event: beacon_model::Event = serde_json::from_value(json!({
        "event_id": "disk-1",
        "timestamp": (now - chrono::Duration::minutes(40)).to_rfc3339(),
        "app_id": app_rec.id,
        "event_type": "click",
        "event_name": "old",
        "user": {"session_id": "s"},
        "device": {"platform": "web"}
    }))
    .unwrap();
    server.state.store.write(&event).unwrap();

    let start = beacon_model::to_minutes_since_epoch(now - chrono::Duration::minutes(45));
    let response = server
        .app
        .oneshot(admin_request(
            Method::GET,
            &format!(
                "/analytics/api/v1/apps/{}/events?start-minutes-since-epoch={start}",
                app_rec.id
            ),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let events = response_json(response).await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_id"], "disk-1");
}
