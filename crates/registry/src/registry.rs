//! Application registry
//!
//! A small mapping from application id to application record, persisted as
//! one pretty-printed JSON document (`{ "apps": { "<id>": App } }`). Every
//! mutation rewrites the whole document; if the write fails, the in-memory
//! mutation is rolled back so memory and disk never diverge.
//!
//! The registry also owns the per-application event caches. The document
//! and the cache map sit behind separate readers-writer locks: API-key
//! lookups on the ingest path never contend with cache admission.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use beacon_cache::EventCache;
use beacon_model::Event;

use crate::app::App;
use crate::error::{RegistryError, Result};

/// Derive the deterministic application id for a name: the first 8 hex
/// characters of SHA-256(name). Stable across processes, URL-safe, and
/// collision-checked at create time.
pub fn app_id_for_name(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..8].to_string()
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    apps: HashMap<String, App>,
}

/// Registry of applications plus their recent-event caches.
#[derive(Debug)]
pub struct AppRegistry {
    path: PathBuf,
    data: RwLock<Document>,
    caches: RwLock<HashMap<String, Arc<EventCache>>>,
}

impl AppRegistry {
    /// Load the registry from `path`, creating an empty document if the
    /// file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let document = match fs::read(&path) {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| RegistryError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let document = Document::default();
                persist(&path, &document)?;
                document
            }
            Err(source) => {
                return Err(RegistryError::Load {
                    path: path.clone(),
                    source,
                });
            }
        };

        Ok(Self {
            path,
            data: RwLock::new(document),
            caches: RwLock::new(HashMap::new()),
        })
    }

    /// Register a new application.
    ///
    /// The id is derived from the name; a second application whose name
    /// hashes to an existing id is a conflict, never an overwrite.
    pub fn create(&self, name: &str, allowed_origins: Vec<String>) -> Result<App> {
        let id = app_id_for_name(name);

        let mut data = self.data.write();
        if data.apps.contains_key(&id) {
            return Err(RegistryError::Conflict {
                name: name.to_string(),
                id,
            });
        }

        let app = App {
            id: id.clone(),
            name: name.to_string(),
            api_key: Uuid::now_v7().to_string(),
            created_at: Utc::now(),
            allowed_origins,
        };

        data.apps.insert(id.clone(), app.clone());
        if let Err(e) = persist(&self.path, &data) {
            data.apps.remove(&id);
            return Err(e);
        }

        info!(app_id = %app.id, name = %app.name, "application created");
        Ok(app)
    }

    /// Update an application's name and allowed origins. The id and API
    /// key are immutable.
    pub fn update(&self, id: &str, name: &str, allowed_origins: Vec<String>) -> Result<App> {
        let mut data = self.data.write();

        let previous = data
            .apps
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        let mut updated = previous.clone();
        updated.name = name.to_string();
        updated.allowed_origins = allowed_origins;
        data.apps.insert(id.to_string(), updated.clone());

        if let Err(e) = persist(&self.path, &data) {
            data.apps.insert(id.to_string(), previous);
            return Err(e);
        }

        info!(app_id = %id, "application updated");
        Ok(updated)
    }

    /// Delete an application and its cache.
    ///
    /// The cache is only dropped after the document change is durable, so
    /// a failed save leaves both the registry entry and the cache intact.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut data = self.data.write();

        let removed = data
            .apps
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if let Err(e) = persist(&self.path, &data) {
            data.apps.insert(id.to_string(), removed);
            return Err(e);
        }
        drop(data);

        if let Some(cache) = self.caches.write().remove(id) {
            cache.stop();
        }

        info!(app_id = %id, "application deleted");
        Ok(())
    }

    /// All registered applications, in no particular order.
    pub fn list(&self) -> Vec<App> {
        self.data.read().apps.values().cloned().collect()
    }

    /// Look up an application by id.
    pub fn get(&self, id: &str) -> Option<App> {
        self.data.read().apps.get(id).cloned()
    }

    /// Look up an application by API key.
    ///
    /// Linear scan: the registry holds O(applications) entries, not
    /// O(events), and stays small.
    pub fn get_by_api_key(&self, api_key: &str) -> Option<App> {
        self.data
            .read()
            .apps
            .values()
            .find(|app| app.api_key == api_key)
            .cloned()
    }

    /// Admit an event into its application's cache, creating the cache on
    /// the application's first event.
    ///
    /// Must be called from within a tokio runtime (a new cache spawns its
    /// advance task).
    pub fn admit(&self, event: &Event) {
        if let Some(cache) = self.caches.read().get(&event.app_id) {
            cache.add(event);
            return;
        }

        let cache = {
            let mut caches = self.caches.write();
            Arc::clone(
                caches
                    .entry(event.app_id.clone())
                    .or_insert_with(|| Arc::new(EventCache::new())),
            )
        };
        cache.add(event);
    }

    /// The cache for an application, if it has received events.
    pub fn cache_for(&self, app_id: &str) -> Option<Arc<EventCache>> {
        self.caches.read().get(app_id).cloned()
    }

    /// Stop every advance task. Used at shutdown; caches stay queryable on
    /// their frozen windows.
    pub fn stop_caches(&self) {
        for cache in self.caches.read().values() {
            cache.stop();
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub(crate) fn insert_cache(&self, app_id: &str, cache: EventCache) {
        self.caches
            .write()
            .insert(app_id.to_string(), Arc::new(cache));
    }
}

fn persist(path: &Path, document: &Document) -> Result<()> {
    let body = serde_json::to_vec_pretty(document).map_err(RegistryError::Encode)?;
    fs::write(path, body).map_err(|source| RegistryError::Save {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
