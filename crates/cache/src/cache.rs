//! Minute-bucketed event ring
//!
//! One `EventCache` per application. The ring state lives behind a single
//! readers-writer lock: admission and the advance task take the write side,
//! queries take the read side, so a query always observes a fully-advanced
//! ring.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use beacon_model::{Event, to_minutes_since_epoch, truncate_to_minute};

/// Width of the ring: one bucket per minute.
pub const CACHE_WINDOW_MINUTES: usize = 30;

/// Recent-event cache for a single application.
///
/// `new` anchors the window at the current wall-clock minute plus one and
/// spawns the advance task; `anchored` builds a frozen ring for tests and
/// for operating on a stopped window. Dropping the cache stops the task.
#[derive(Debug)]
pub struct EventCache {
    inner: Arc<RwLock<Ring>>,
    cancel: CancellationToken,
}

#[derive(Debug)]
struct Ring {
    buckets: [Vec<Event>; CACHE_WINDOW_MINUTES],
    current_index: usize,
    /// Newest minute the ring accepts; one minute ahead of the wall clock
    /// while the advance task is running.
    last_minute: DateTime<Utc>,
}

impl EventCache {
    /// Create a cache tracking the wall clock and start its advance task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let last_minute = truncate_to_minute(Utc::now()) + Duration::minutes(1);
        let cache = Self::anchored(last_minute);
        spawn_advance(Arc::clone(&cache.inner), cache.cancel.clone());
        cache
    }

    /// Create a cache with a fixed `last_minute` and no advance task.
    ///
    /// The window never moves; admission and queries behave exactly as they
    /// do after `stop`.
    pub fn anchored(last_minute: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Ring {
                buckets: std::array::from_fn(|_| Vec::new()),
                current_index: 0,
                last_minute,
            })),
            cancel: CancellationToken::new(),
        }
    }

    /// Admit an event into the bucket matching its minute.
    ///
    /// Events outside the window are discarded, not errors: the durable
    /// store already owns the event by the time it reaches the cache.
    pub fn add(&self, event: &Event) {
        let mut ring = self.inner.write();

        let event_minute = truncate_to_minute(event.timestamp);
        let oldest_allowed =
            ring.last_minute - Duration::minutes(CACHE_WINDOW_MINUTES as i64);

        if event_minute < oldest_allowed {
            info!(
                event_id = %event.event_id,
                event_minute = %event_minute,
                oldest_allowed = %oldest_allowed,
                "event older than cache window, discarding"
            );
            return;
        }
        if event_minute > ring.last_minute {
            info!(
                event_id = %event.event_id,
                event_minute = %event_minute,
                last_minute = %ring.last_minute,
                "event ahead of cache window, discarding"
            );
            return;
        }

        // diff is in [0, CACHE_WINDOW_MINUTES], so the subtraction below
        // cannot underflow.
        let diff = (ring.last_minute - event_minute).num_minutes() as usize;
        let index = (ring.current_index + CACHE_WINDOW_MINUTES - diff) % CACHE_WINDOW_MINUTES;
        ring.buckets[index].push(event.clone());

        debug!(
            event_id = %event.event_id,
            app_id = %event.app_id,
            bucket = index,
            event_minute = %event_minute,
            "event admitted to cache"
        );
    }

    /// Return every cached event whose timestamp-minute is at or after
    /// `start_minutes`, newest bucket first, insertion order within a bucket.
    ///
    /// Always an owned vector; empty results encode as `[]`.
    pub fn events_since(&self, start_minutes: i64) -> Vec<Event> {
        let ring = self.inner.read();
        collect_since(&ring, start_minutes)
    }

    /// Window-checked variant of [`events_since`](Self::events_since) for
    /// the tiered retrieval path.
    ///
    /// Returns `None` when `start_minutes` falls outside the live window —
    /// older than the oldest bucket, or newer than `last_minute` (the
    /// advance task may lag the wall clock) — so the caller falls back to
    /// the durable store. The bounds check and the scan happen under one
    /// read guard.
    pub fn try_events_since(&self, start_minutes: i64) -> Option<Vec<Event>> {
        let ring = self.inner.read();

        let cache_last = to_minutes_since_epoch(ring.last_minute);
        let window_start = cache_last - (CACHE_WINDOW_MINUTES as i64 - 1);

        if start_minutes < window_start {
            return None;
        }
        if start_minutes > cache_last {
            debug!(
                start_minutes,
                cache_last, "requested minute ahead of ring, deferring to store"
            );
            return None;
        }

        Some(collect_since(&ring, start_minutes))
    }

    /// Stop the advance task, freezing the window. Safe to call repeatedly;
    /// admission and queries keep working on the frozen ring.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Newest minute the ring currently accepts.
    pub fn last_minute(&self) -> DateTime<Utc> {
        self.inner.read().last_minute
    }

    /// Total events across all buckets.
    pub fn len(&self) -> usize {
        let ring = self.inner.read();
        ring.buckets.iter().map(Vec::len).sum()
    }

    /// Check if no events are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn bucket_len(&self, index: usize) -> usize {
        self.inner.read().buckets[index].len()
    }

    #[cfg(test)]
    fn force_advance(&self, steps: usize) {
        let mut ring = self.inner.write();
        for _ in 0..steps {
            ring.current_index = (ring.current_index + 1) % CACHE_WINDOW_MINUTES;
            let index = ring.current_index;
            ring.buckets[index].clear();
            ring.last_minute += Duration::minutes(1);
        }
    }
}

impl Drop for EventCache {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Scan buckets newest-minute to oldest, filtering per event.
///
/// The per-event minute check matters at the window edge: the bucket at
/// `current_index` can hold both `last_minute` events and events admitted
/// at the full-window offset, and stale entries survive in a bucket until
/// the ring wraps back onto it.
fn collect_since(ring: &Ring, start_minutes: i64) -> Vec<Event> {
    let mut events = Vec::new();
    let cache_last = to_minutes_since_epoch(ring.last_minute);

    for i in 0..CACHE_WINDOW_MINUTES {
        let bucket_minutes = cache_last - i as i64;
        if bucket_minutes < start_minutes {
            continue;
        }

        let index = (ring.current_index + CACHE_WINDOW_MINUTES - i) % CACHE_WINDOW_MINUTES;
        for event in &ring.buckets[index] {
            if to_minutes_since_epoch(event.timestamp) >= start_minutes {
                events.push(event.clone());
            }
        }
    }

    events
}

/// Step the ring forward until `last_minute` reaches the wall-clock minute
/// plus one, clearing each bucket stepped onto. The whole catch-up runs
/// under the write lock so queries never observe a half-advanced ring.
fn catch_up(inner: &RwLock<Ring>) {
    let target = truncate_to_minute(Utc::now()) + Duration::minutes(1);

    let mut ring = inner.write();
    while ring.last_minute < target {
        ring.current_index = (ring.current_index + 1) % CACHE_WINDOW_MINUTES;
        let index = ring.current_index;
        ring.buckets[index].clear();
        ring.last_minute += Duration::minutes(1);
    }
}

/// Advance task: align to the next minute boundary, then catch up once per
/// tick. The catch-up loop (rather than a single step) keeps the window
/// honest after suspends or long stalls.
fn spawn_advance(inner: Arc<RwLock<Ring>>, cancel: CancellationToken) {
    tokio::spawn(async move {
        let now = Utc::now();
        let boundary = truncate_to_minute(now) + Duration::minutes(1);
        let wait = (boundary - now).to_std().unwrap_or_default();

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(wait) => {}
        }

        catch_up(&inner);

        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a fresh interval completes immediately; consume
        // it so the loop fires on minute boundaries from here on.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => catch_up(&inner),
            }
        }
    });
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
