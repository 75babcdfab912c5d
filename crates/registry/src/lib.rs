//! Beacon Registry - application registry and retrieval dispatch
//!
//! Owns the set of registered applications (persisted as one JSON document)
//! and the per-application recent-event caches. Also home to the tiered
//! retrieval path: a "events since minute M" request is answered from an
//! application's cache when M falls inside its live window and from a
//! durable-store scan otherwise.

mod app;
mod error;
mod registry;
mod retrieve;

pub use app::App;
pub use error::{RegistryError, Result};
pub use registry::{AppRegistry, app_id_for_name};
