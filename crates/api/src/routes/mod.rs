//! Route registration

pub mod apps;
pub mod track;

use axum::{
    Json, Router, middleware,
    routing::{get, post, put},
};

use crate::cors;
use crate::state::AppState;

/// Build the full router with the per-application CORS layer applied.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/track", post(track::track_event))
        .route("/apps", get(apps::list_apps).post(apps::create_app))
        .route("/apps/", post(apps::create_app))
        .route(
            "/apps/{id}",
            put(apps::update_app).delete(apps::delete_app),
        )
        .route("/apps/{id}/events", get(apps::get_events));

    Router::new()
        .nest("/analytics/api/v1", api)
        .route("/health", get(health_check))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            cors::cors_middleware,
        ))
        .with_state(state)
}

/// GET /health - health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
