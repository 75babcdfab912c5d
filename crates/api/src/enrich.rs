//! Event enricher
//!
//! Normalizes an incoming event before it is persisted or cached: stamps
//! the authenticated application id, fills in a missing event id, clamps
//! wild timestamps to server time, and backfills location and web fields
//! from the request. The enricher never fails; every branch has a sane
//! default.
//!
//! The ±5 minute drift tolerance here is deliberately wider than the
//! cache's admission band: the enricher corrects outright-broken clocks,
//! the cache filters the rest.

use std::net::SocketAddr;

use axum::http::{HeaderMap, header};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use beacon_model::{Event, LocationInfo};

/// Maximum tolerated difference between the client timestamp and server
/// time, in seconds. Beyond this the timestamp is replaced.
pub const MAX_TIMESTAMP_DRIFT_SECS: i64 = 5 * 60;

/// Apply all enrichment steps in order.
pub fn enrich_event(event: &mut Event, app_id: &str, headers: &HeaderMap, peer: SocketAddr) {
    event.app_id = app_id.to_string();

    if event.event_id.is_empty() {
        event.event_id = Uuid::now_v7().to_string();
    }

    clamp_timestamp(event);

    let client_ip = client_ip(headers, peer);
    if event.location.is_none() {
        event.location = Some(LocationInfo {
            ip: client_ip,
            ..LocationInfo::default()
        });
    }

    backfill_web(event, headers);
}

/// Replace unset or out-of-drift timestamps with server time.
fn clamp_timestamp(event: &mut Event) {
    let server_now = Utc::now();

    if event.timestamp_is_unset() {
        event.timestamp = server_now;
        return;
    }

    let drift = (event.timestamp - server_now).num_seconds();
    if drift.abs() > MAX_TIMESTAMP_DRIFT_SECS {
        info!(
            event_id = %event.event_id,
            drift_secs = drift,
            original = %event.timestamp,
            "event timestamp outside drift tolerance, correcting to server time"
        );
        event.timestamp = server_now;
    }
}

/// Resolve the client IP: first `X-Forwarded-For` entry, then `X-Real-IP`,
/// then the connection peer with the port stripped.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(xff) = headers.get("x-forwarded-for")
        && let Ok(value) = xff.to_str()
        && let Some(first) = value.split(',').next()
    {
        let first = first.trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    if let Some(xri) = headers.get("x-real-ip")
        && let Ok(value) = xri.to_str()
        && !value.trim().is_empty()
    {
        return value.trim().to_string();
    }

    peer.ip().to_string()
}

/// Fill user agent and referrer from request headers for web events.
fn backfill_web(event: &mut Event, headers: &HeaderMap) {
    if event.device.platform != "web" {
        return;
    }

    let Some(web) = event.web.as_mut() else {
        return;
    };

    if web.user_agent.is_empty()
        && let Some(ua) = header_str(headers, header::USER_AGENT)
    {
        web.user_agent = ua;
    }
    if web.referrer.is_empty()
        && let Some(referer) = header_str(headers, header::REFERER)
    {
        web.referrer = referer;
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "enrich_test.rs"]
mod tests;
