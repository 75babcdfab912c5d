//! Tiered retrieval and startup warm-up
//!
//! Queries prefer the in-memory ring and fall back to a disk scan when the
//! requested start minute is outside the live window. A cache hit is never
//! merged with the store: inside its window the cache is a strict superset
//! of what a scan would return.

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use beacon_model::{Event, to_minutes_since_epoch};
use beacon_store::EventStore;

use crate::registry::AppRegistry;

/// How far back the startup warm-up rehydrates. Slightly wider than the
/// cache window so boundary minutes are covered.
const WARM_UP_MINUTES: i64 = 35;

impl AppRegistry {
    /// All events for `app_id` with timestamp-minute at or after
    /// `start_minutes`, from the cache when the minute lies inside its
    /// window, otherwise from a store scan.
    pub fn events_since(
        &self,
        store: &EventStore,
        app_id: &str,
        start_minutes: i64,
    ) -> beacon_store::Result<Vec<Event>> {
        if let Some(cache) = self.cache_for(app_id)
            && let Some(events) = cache.try_events_since(start_minutes)
        {
            debug!(
                app_id,
                start_minutes,
                count = events.len(),
                "served events from cache"
            );
            return Ok(events);
        }

        let events = store.events_since(app_id, start_minutes)?;
        debug!(
            app_id,
            start_minutes,
            count = events.len(),
            "served events from store scan"
        );
        Ok(events)
    }

    /// Rehydrate each application's cache from the store at startup.
    ///
    /// Failures are logged and swallowed: a partially warm cache only means
    /// early queries fall back to disk, which must not block startup.
    pub fn warm_up(&self, store: &EventStore) {
        let cutoff = Utc::now() - Duration::minutes(WARM_UP_MINUTES);
        let start_minutes = to_minutes_since_epoch(cutoff);

        for app in self.list() {
            let events = match store.events_since(&app.id, start_minutes) {
                Ok(events) => events,
                Err(e) => {
                    warn!(app_id = %app.id, error = %e, "warm-up scan failed, continuing");
                    continue;
                }
            };

            let mut admitted = 0usize;
            for event in &events {
                if event.timestamp >= cutoff {
                    self.admit(event);
                    admitted += 1;
                }
            }

            debug!(app_id = %app.id, admitted, "warm-up complete for application");
        }
    }
}
