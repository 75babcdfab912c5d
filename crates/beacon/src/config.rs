//! Server configuration
//!
//! Loaded from a TOML file; every field has a default so an empty (or
//! absent) file yields a runnable local setup.
//!
//! # Example
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"              # default
//! port = 8115                     # default
//! registry_path = "./app-metadata.json"
//! data_dir = "./data"
//! log_level = "info"
//!
//! [auth]
//! jwks_url = "https://issuer.example/jwks.json"
//! issuer = "https://issuer.example"
//! audience = "beacon-admin"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }
}

/// Listener and storage paths
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    /// Default: "127.0.0.1"
    pub host: String,

    /// Port to listen on
    /// Default: 8115
    pub port: u16,

    /// Path of the application registry document
    /// Default: "./app-metadata.json"
    pub registry_path: PathBuf,

    /// Root of the per-application event directories
    /// Default: "./data"
    pub data_dir: PathBuf,

    /// Log level when not overridden on the command line
    /// Default: "info"
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8115,
            registry_path: PathBuf::from("./app-metadata.json"),
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Admin authentication settings
///
/// With `jwks_url` set, admin tokens are validated against the remote JWKS
/// endpoint. Otherwise an HS256 provider is used with `local_secret`; when
/// that is missing too, a random secret is generated and admin endpoints
/// effectively reject everything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// URL of the JWKS document for admin token validation
    pub jwks_url: Option<String>,

    /// Required `iss` claim, if any
    pub issuer: Option<String>,

    /// Required `aud` claim, if any
    pub audience: Option<String>,

    /// Shared HS256 secret for local/dev deployments (min 32 bytes)
    pub local_secret: Option<String>,
}
