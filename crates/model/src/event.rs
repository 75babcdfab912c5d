//! Event record
//!
//! The canonical analytics event as it travels through the service: decoded
//! from the ingestion request, enriched, persisted to disk and admitted to
//! the per-application cache. The JSON field names are the wire contract for
//! both the ingestion body and the on-disk files.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Well-known event type values. `event_type` is a free string; these are
/// the ones client SDKs emit by convention.
pub const EVENT_TYPE_PAGE_VIEW: &str = "page_view";
pub const EVENT_TYPE_CLICK: &str = "click";
pub const EVENT_TYPE_SIGNUP: &str = "signup";
pub const EVENT_TYPE_PURCHASE: &str = "purchase";
pub const EVENT_TYPE_CUSTOM: &str = "custom";

/// One analytics event.
///
/// `timestamp` defaults to the Unix epoch when the client omits it; the
/// enricher treats that sentinel as "unset" and stamps server time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Opaque unique identifier; generated server-side when empty
    #[serde(default)]
    pub event_id: String,

    /// Event instant (UTC), subject to the enricher's drift clamp
    #[serde(default = "unix_epoch")]
    pub timestamp: DateTime<Utc>,

    /// Client wall-clock time with its local offset, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_time: Option<DateTime<FixedOffset>>,

    /// Owning application; always overwritten from the authenticated key
    #[serde(default)]
    pub app_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    #[serde(default)]
    pub event_type: String,

    #[serde(default)]
    pub event_name: String,

    #[serde(default)]
    pub user: UserInfo,

    #[serde(default)]
    pub device: DeviceInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationInfo>,

    #[serde(
        rename = "web_specific",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub web: Option<WebInfo>,

    /// Open bag of client-defined properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

impl Event {
    /// True when the client did not supply a timestamp.
    pub fn timestamp_is_unset(&self) -> bool {
        self.timestamp == DateTime::UNIX_EPOCH
    }
}

/// User identity attached to an event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfo {
    /// Authenticated user id, if the application knows one
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default)]
    pub session_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub anonymous_id: String,
}

/// Device and runtime environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// "web", "ios", "android", ...
    #[serde(default)]
    pub platform: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub os_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_model: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub screen_resolution: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub locale: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timezone: String,
}

/// Coarse location; synthesized from the client IP when absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip: String,
}

/// Browser-only fields, present when the event came from a web SDK
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_agent: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub referrer: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub utm_source: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub utm_medium: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub utm_campaign: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_title: String,
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
