//! Beacon Store - durable event persistence
//!
//! Writes each event as one JSON file under
//! `<root>/<app-id>/<YYYYMMDD>/<event-id>.json` and reads ranges back by
//! scanning day directories. The layout is a contract: the query path and
//! the startup warm-up both depend on it.
//!
//! Day directories are named for the server's UTC date at persistence time,
//! not the event's timestamp date. The ingest path stamps server time into
//! out-of-drift events, so the two rarely differ by more than a minute
//! around midnight, and range reads iterate every day directory from the
//! start date through today to cover that boundary.

mod error;
mod store;

pub use error::{Result, StoreError};
pub use store::{EventStore, MAX_DIR_ENTRIES};
