//! Application management and recent-event query endpoints
//!
//! All routes here require a validated admin bearer token; the `AdminUser`
//! extractor rejects the request before the handler runs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use beacon_cache::CACHE_WINDOW_MINUTES;
use beacon_model::{Event, to_minutes_since_epoch};
use beacon_registry::App;

use crate::auth::AdminUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Create/update request body
#[derive(Debug, Deserialize)]
pub struct AppRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// GET /apps - list all applications
pub async fn list_apps(_admin: AdminUser, State(state): State<AppState>) -> Json<Vec<App>> {
    Json(state.registry.list())
}

/// POST /apps - create an application
///
/// The id is derived from the name; a duplicate name is a 409, not an
/// overwrite.
pub async fn create_app(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(req): Json<AppRequest>,
) -> Result<(StatusCode, Json<App>)> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let app = state.registry.create(&req.name, req.allowed_origins)?;
    Ok((StatusCode::CREATED, Json(app)))
}

/// PUT /apps/{id} - update name and allowed origins
pub async fn update_app(
    _admin: AdminUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<AppRequest>,
) -> Result<Json<App>> {
    if req.name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let app = state.registry.update(&id, &req.name, req.allowed_origins)?;
    Ok(Json(app))
}

/// DELETE /apps/{id} - delete an application and its cache
pub async fn delete_app(
    _admin: AdminUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    state.registry.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(rename = "start-minutes-since-epoch")]
    pub start_minutes_since_epoch: Option<String>,
}

/// GET /apps/{id}/events - recent events at or after a start minute
///
/// Served from the application's cache when the start minute lies inside
/// the live window, from a store scan otherwise. An absent parameter
/// defaults to the last cache-window's worth of minutes. The response is
/// always a JSON array, `[]` when nothing matches.
pub async fn get_events(
    _admin: AdminUser,
    Path(id): Path<String>,
    Query(query): Query<EventsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Event>>> {
    let start_minutes = match query.start_minutes_since_epoch {
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            ApiError::bad_request("invalid start-minutes-since-epoch format")
        })?,
        None => to_minutes_since_epoch(Utc::now()) - CACHE_WINDOW_MINUTES as i64,
    };

    if state.registry.get(&id).is_none() {
        return Err(ApiError::not_found("application", &id));
    }

    let events = state.registry.events_since(&state.store, &id, start_minutes)?;

    debug!(app_id = %id, start_minutes, count = events.len(), "events query served");
    Ok(Json(events))
}
