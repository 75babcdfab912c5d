//! Per-application CORS
//!
//! Browser access is scoped per application: a request carrying an
//! `Origin` header must also carry an `X-API-Key` resolving to an
//! application whose `allowed_origins` contains that origin. Preflight
//! `OPTIONS` requests are answered here directly; other requests pass
//! through with the allow-origin header stamped onto the response.
//! Requests without an `Origin` (curl, server-to-server) bypass the check
//! entirely.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, X-API-Key";

/// CORS middleware applied to the whole router.
pub async fn cors_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(origin) = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        return next.run(request).await;
    };

    // Resolve the application from the API key before trusting the origin
    let app = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .and_then(|key| state.registry.get_by_api_key(key));

    let Some(app) = app else {
        debug!(%origin, "cross-origin request without valid API key");
        return ApiError::Unauthorized.into_response();
    };

    if !app.allows_origin(&origin) {
        debug!(app_id = %app.id, %origin, "origin not in application allow list");
        return ApiError::Forbidden(format!("origin '{origin}' not allowed")).into_response();
    }

    if request.method() == Method::OPTIONS {
        return preflight_response(&origin);
    }

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&origin) {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    response
}

fn preflight_response(origin: &str) -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );

    response
}
