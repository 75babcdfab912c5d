//! Tests for the event wire format

use super::*;
use chrono::TimeZone;

#[test]
fn test_minimal_body_decodes() {
    let event: Event = serde_json::from_str(r#"{"event_type":"click"}"#).unwrap();
    assert_eq!(event.event_type, "click");
    assert!(event.event_id.is_empty());
    assert!(event.timestamp_is_unset());
    assert!(event.location.is_none());
    assert!(event.web.is_none());
    assert!(event.properties.is_none());
}

#[test]
fn test_full_body_round_trip() {
    let body = r#"{
        "event_id": "0191e4a0-0000-7000-8000-000000000001",
        "timestamp": "2025-08-24T12:00:45Z",
        "app_id": "cafe0123",
        "app_version": "2.4.0",
        "event_type": "page_view",
        "event_name": "home",
        "user": {"id": "u-9", "session_id": "s-1", "anonymous_id": "a-7"},
        "device": {"platform": "web", "locale": "de-DE"},
        "location": {"country": "DE", "ip": "203.0.113.9"},
        "web_specific": {"user_agent": "Mozilla/5.0", "page_url": "https://example.com/"},
        "properties": {"plan": "pro", "count": 3}
    }"#;

    let event: Event = serde_json::from_str(body).unwrap();
    assert_eq!(
        event.timestamp,
        Utc.with_ymd_and_hms(2025, 8, 24, 12, 0, 45).unwrap()
    );
    assert_eq!(event.user.id, "u-9");
    assert_eq!(event.device.platform, "web");
    assert_eq!(event.web.as_ref().unwrap().page_url, "https://example.com/");
    assert_eq!(
        event.properties.as_ref().unwrap()["count"],
        serde_json::json!(3)
    );

    let encoded = serde_json::to_value(&event).unwrap();
    assert_eq!(encoded["web_specific"]["user_agent"], "Mozilla/5.0");
    assert_eq!(encoded["location"]["country"], "DE");
    assert_eq!(encoded["app_version"], "2.4.0");
}

#[test]
fn test_empty_optionals_are_omitted() {
    let event = Event {
        event_id: "e-1".into(),
        timestamp: Utc.with_ymd_and_hms(2025, 8, 24, 12, 0, 0).unwrap(),
        local_time: None,
        app_id: "cafe0123".into(),
        app_version: None,
        event_type: "custom".into(),
        event_name: "ping".into(),
        user: UserInfo::default(),
        device: DeviceInfo::default(),
        location: None,
        web: None,
        properties: None,
    };

    let encoded = serde_json::to_value(&event).unwrap();
    let obj = encoded.as_object().unwrap();
    assert!(!obj.contains_key("location"));
    assert!(!obj.contains_key("web_specific"));
    assert!(!obj.contains_key("properties"));
    assert!(!obj.contains_key("app_version"));
    assert!(!obj.contains_key("local_time"));
    // Empty substruct strings are dropped too
    assert!(!encoded["user"].as_object().unwrap().contains_key("id"));
}

#[test]
fn test_local_time_preserves_offset() {
    let event: Event = serde_json::from_str(
        r#"{"event_type":"click","local_time":"2025-08-24T14:00:45+02:00"}"#,
    )
    .unwrap();

    let local = event.local_time.unwrap();
    assert_eq!(local.offset().local_minus_utc(), 2 * 3600);

    let encoded = serde_json::to_value(&event).unwrap();
    assert_eq!(encoded["local_time"], "2025-08-24T14:00:45+02:00");
}
