//! Event ingestion endpoint

use std::net::SocketAddr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use serde::Serialize;
use tracing::debug;

use beacon_model::Event;

use crate::enrich::enrich_event;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Acknowledgement returned for an ingested event
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub status: &'static str,
    pub event_id: String,
}

/// POST /track - ingest one event
///
/// Authenticates the `X-API-Key` header against the registry, enriches the
/// decoded event, persists it, then admits it to the application's cache.
/// Persistence comes first: the cache must never hold an event whose
/// durable copy is missing, so a failed write is a 500 with no admission.
pub async fn track_event(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TrackResponse>> {
    let api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .filter(|key| !key.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let app = state
        .registry
        .get_by_api_key(api_key)
        .ok_or(ApiError::Unauthorized)?;

    let mut event: Event = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("invalid event body: {e}")))?;

    enrich_event(&mut event, &app.id, &headers, addr);

    debug!(
        app_id = %app.id,
        event_id = %event.event_id,
        event_type = %event.event_type,
        event_name = %event.event_name,
        "event received"
    );

    state.store.write(&event)?;
    state.registry.admit(&event);

    Ok(Json(TrackResponse {
        status: "success",
        event_id: event.event_id,
    }))
}
