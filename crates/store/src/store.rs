//! Filesystem event store

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::warn;

use beacon_model::{Event, from_minutes_since_epoch, to_minutes_since_epoch};

use crate::error::{Result, StoreError};

/// Hard cap on entries a single day-directory scan will visit.
pub const MAX_DIR_ENTRIES: usize = 10_000;

/// Durable event store rooted at a data directory.
///
/// Writes are synchronous: a successful return means the event is on disk.
/// The ingest path relies on that ordering — an event is only admitted to
/// the cache after its durable copy exists.
#[derive(Debug, Clone)]
pub struct EventStore {
    root: PathBuf,
}

impl EventStore {
    /// Create a store rooted at `root`. The directory itself is created
    /// lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist one event as `<root>/<app-id>/<YYYYMMDD>/<event-id>.json`.
    ///
    /// The day directory is named for the server's UTC date right now, not
    /// the event's timestamp date.
    pub fn write(&self, event: &Event) -> Result<PathBuf> {
        let day = Utc::now().format("%Y%m%d").to_string();
        let dir = self.root.join(&event.app_id).join(day);

        fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let body = serde_json::to_vec(event).map_err(|source| StoreError::Encode {
            event_id: event.event_id.clone(),
            source,
        })?;

        let path = dir.join(format!("{}.json", event.event_id));
        fs::write(&path, body).map_err(|source| StoreError::WriteEvent {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Read every persisted event for `app_id` whose timestamp-minute is at
    /// or after `start_minutes`.
    ///
    /// Scans day directories from the date containing `start_minutes`
    /// through today (UTC), inclusive, so ranges spanning the midnight
    /// boundary see both sides. Missing days are skipped; malformed files
    /// are logged and skipped; a day with more than [`MAX_DIR_ENTRIES`]
    /// entries fails the whole call so the caller narrows its window.
    ///
    /// Always returns an owned vector; no matches is `Ok(vec![])`.
    pub fn events_since(&self, app_id: &str, start_minutes: i64) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        let start_date = from_minutes_since_epoch(start_minutes).date_naive();
        let today = Utc::now().date_naive();

        let mut date = start_date;
        while date <= today {
            self.collect_day(app_id, date, start_minutes, &mut events)?;
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(events)
    }

    fn collect_day(
        &self,
        app_id: &str,
        date: NaiveDate,
        start_minutes: i64,
        out: &mut Vec<Event>,
    ) -> Result<()> {
        let dir = self
            .root
            .join(app_id)
            .join(date.format("%Y%m%d").to_string());

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(StoreError::ReadDir {
                    path: dir.clone(),
                    source,
                });
            }
        };

        let entries: Vec<_> =
            entries
                .collect::<io::Result<Vec<_>>>()
                .map_err(|source| StoreError::ReadDir {
                    path: dir.clone(),
                    source,
                })?;

        if entries.len() > MAX_DIR_ENTRIES {
            return Err(StoreError::OverRange {
                path: dir,
                count: entries.len(),
            });
        }

        for entry in entries {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let event = match read_event_file(&path) {
                Ok(event) => event,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable event file");
                    continue;
                }
            };

            if to_minutes_since_epoch(event.timestamp) >= start_minutes {
                out.push(event);
            }
        }

        Ok(())
    }
}

fn read_event_file(path: &Path) -> std::result::Result<Event, Box<dyn std::error::Error>> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
