//! Admin auth provider trait

use async_trait::async_trait;

use crate::error::Result;

/// A validated admin identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    /// Subject claim of the validated token
    pub user_id: String,
}

/// Validates admin bearer tokens.
///
/// Implementations are the only place credentials are checked; downstream
/// handlers trust the [`AdminUser`] they are handed.
#[async_trait]
pub trait AdminAuth: Send + Sync {
    /// Validate a raw bearer token and return the admin it identifies.
    async fn validate(&self, token: &str) -> Result<AdminUser>;
}
