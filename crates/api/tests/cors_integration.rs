//! Integration tests for the per-application CORS layer

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Method, Request, StatusCode, header},
};
use tempfile::TempDir;
use tower::ServiceExt;

use beacon_api::{AppState, build_router};
use beacon_auth::{LocalHsProvider, test_utils};
use beacon_registry::{App, AppRegistry};
use beacon_store::EventStore;

struct TestServer {
    app: Router,
    app_rec: App,
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

    let app_rec = state
        .registry
        .create("Site", vec!["https://site.example".to_string()])
        .unwrap();

    let app = build_router(state)
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4444))));

    TestServer {
        app,
        app_rec,
        _registry_dir: registry_dir,
        _data_dir: data_dir,
    }
}

#[tokio::test]
async fn test_preflight_with_allowed_origin_succeeds() {
    let server = test_server();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/analytics/api/v1/track")
        .header(header::ORIGIN, "https://site.example")
        .header("x-api-key", &server.app_rec.api_key)
        .body(Body::empty())
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://site.example"
    );
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, OPTIONS"
    );
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, X-API-Key"
    );
}

#[tokio::test]
async fn test_preflight_without_key_is_unauthorized() {
    let server = test_server();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/analytics/api/v1/track")
        .header(header::ORIGIN, "https://site.example")
        .body(Body::empty())
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_preflight_with_foreign_origin_is_forbidden() {
    let server = test_server();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/analytics/api/v1/track")
        .header(header::ORIGIN, "https://evil.example")
        .header("x-api-key", &server.app_rec.api_key)
        .body(Body::empty())
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cross_origin_track_gets_allow_origin_header() {
    let server = test_server();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/analytics/api/v1/track")
        .header(header::ORIGIN, "https://site.example")
        .header("x-api-key", &server.app_rec.api_key)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"event_type":"click"}"#))
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://site.example"
    );
}

#[tokio::test]
async fn test_cross_origin_with_bad_key_is_unauthorized() {
    let server = test_server();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/analytics/api/v1/track")
        .header(header::ORIGIN, "https://site.example")
        .header("x-api-key", "bogus")
        .body(Body::from(r#"{"event_type":"click"}"#))
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_requests_without_origin_bypass_cors() {
    let server = test_server();

    // No Origin, no API key: the health endpoint is reachable untouched
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
