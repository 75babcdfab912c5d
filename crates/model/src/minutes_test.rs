//! Tests for minute-since-epoch conversions

use super::*;
use chrono::TimeZone;

#[test]
fn test_epoch_is_minute_zero() {
    assert_eq!(to_minutes_since_epoch(DateTime::UNIX_EPOCH), 0);
}

#[test]
fn test_one_hour_is_sixty_minutes() {
    let t = DateTime::from_timestamp(3600, 0).unwrap();
    assert_eq!(to_minutes_since_epoch(t), 60);
}

#[test]
fn test_seconds_and_subseconds_floor() {
    // 1h 1m 5.123s floors to minute 61
    let t = DateTime::from_timestamp(3665, 123_000_000).unwrap();
    assert_eq!(to_minutes_since_epoch(t), 61);
}

#[test]
fn test_pre_epoch_floors_downward() {
    // 30s before the epoch belongs to minute -1, not minute 0
    let t = DateTime::from_timestamp(-30, 0).unwrap();
    assert_eq!(to_minutes_since_epoch(t), -1);
}

#[test]
fn test_from_minutes_round_trip() {
    for minutes in [0i64, 60, 100, 29_219_520] {
        let t = from_minutes_since_epoch(minutes);
        assert_eq!(to_minutes_since_epoch(t), minutes);
        assert_eq!(t.timestamp(), minutes * 60);
    }
}

#[test]
fn test_from_minutes_overflow_clamps() {
    assert_eq!(from_minutes_since_epoch(i64::MAX), DateTime::UNIX_EPOCH);
}

#[test]
fn test_truncate_to_minute() {
    let t = Utc.with_ymd_and_hms(2025, 8, 24, 12, 0, 45).unwrap();
    let expected = Utc.with_ymd_and_hms(2025, 8, 24, 12, 0, 0).unwrap();
    assert_eq!(truncate_to_minute(t), expected);

    // Already truncated values are unchanged
    assert_eq!(truncate_to_minute(expected), expected);
}
