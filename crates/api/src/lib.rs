//! Beacon API - HTTP surface
//!
//! Axum router for the ingestion and query endpoints, all namespaced under
//! `/analytics/api/v1`:
//!
//! - `POST /track` - ingest one event, authenticated by `X-API-Key`
//! - `GET /apps` - list applications (admin)
//! - `POST /apps` - create an application (admin)
//! - `PUT /apps/{id}` - update name/origins (admin)
//! - `DELETE /apps/{id}` - delete an application and its cache (admin)
//! - `GET /apps/{id}/events?start-minutes-since-epoch=N` - recent events (admin)
//! - `GET /health` - health check
//!
//! Browser requests are gated by a per-application CORS layer: the
//! `Origin` header must appear in the key-matched application's
//! `allowed_origins`. Requests without an `Origin` bypass the check.

pub mod auth;
pub mod cors;
pub mod enrich;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
