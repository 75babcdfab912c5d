//! Minute-since-epoch conversions
//!
//! The cache, the store reader and the query API all index time as whole
//! minutes since the Unix epoch. Keeping the conversions in one place keeps
//! the flooring behavior consistent for pre-epoch timestamps.

use chrono::{DateTime, Utc};

/// Convert an instant to its minute-since-epoch index.
pub fn to_minutes_since_epoch(t: DateTime<Utc>) -> i64 {
    t.timestamp().div_euclid(60)
}

/// Convert a minute-since-epoch index back to the instant at that minute's
/// start. Out-of-range indices clamp to the epoch.
pub fn from_minutes_since_epoch(minutes: i64) -> DateTime<Utc> {
    minutes
        .checked_mul(60)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Truncate an instant to its minute boundary.
pub fn truncate_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    from_minutes_since_epoch(to_minutes_since_epoch(t))
}

#[cfg(test)]
#[path = "minutes_test.rs"]
mod tests;
