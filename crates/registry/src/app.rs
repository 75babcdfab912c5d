//! Application record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One registered application.
///
/// The id is deterministic (a truncated hash of the name) so clients can
/// pre-compute it; the API key is the ingestion credential and the
/// `allowed_origins` set drives browser CORS decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl App {
    /// Check whether `origin` may make browser requests for this app.
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }
}
