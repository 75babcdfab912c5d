//! Beacon Model - canonical event record
//!
//! Shared data types for the ingestion pipeline: the `Event` value with its
//! nested identity, device, location and web substructures, plus the
//! minute-since-epoch conversions every other crate indexes time with.

pub mod event;
pub mod minutes;

pub use event::{DeviceInfo, Event, LocationInfo, UserInfo, WebInfo};
pub use minutes::{from_minutes_since_epoch, to_minutes_since_epoch, truncate_to_minute};
