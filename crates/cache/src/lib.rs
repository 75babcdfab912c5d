//! Beacon Cache - recent-event ring buffer
//!
//! Serves the last half hour of each application's events from memory.
//! Every application gets a fixed array of thirty one-minute buckets; a
//! background task steps the ring forward on wall-clock minute boundaries,
//! clearing the bucket it steps onto. Admission never moves the ring, so
//! client-supplied timestamps cannot distort the window.
//!
//! The window is deliberately anchored one minute *ahead* of the server
//! clock: events from clients whose clocks run slightly fast still land in
//! a real bucket instead of being remapped or dropped.
//!
//! Memory is bounded at `applications x 30 minutes x peak events/minute`.

mod cache;

pub use cache::{CACHE_WINDOW_MINUTES, EventCache};
