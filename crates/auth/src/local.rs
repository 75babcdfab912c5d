//! Shared-secret token validation
//!
//! HS256 provider for development and tests: no network, no key ids, just
//! a shared secret. The claims contract matches the JWKS provider so the
//! two are interchangeable behind [`AdminAuth`].

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::error::{AuthError, Result};
use crate::provider::{AdminAuth, AdminUser};

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: i64,
}

/// Admin auth provider validating HS256 tokens with a shared secret.
pub struct LocalHsProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl LocalHsProvider {
    /// Create a provider from a shared secret.
    ///
    /// # Panics
    ///
    /// Panics if the secret is shorter than 32 bytes.
    pub fn new(secret: &[u8]) -> Self {
        assert!(secret.len() >= 32, "JWT secret must be at least 32 bytes");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

#[async_trait]
impl AdminAuth for LocalHsProvider {
    async fn validate(&self, token: &str) -> Result<AdminUser> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
                |e| match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::InvalidClaims(e.to_string()),
                },
            )?;

        Ok(AdminUser {
            user_id: data.claims.sub,
        })
    }
}

#[cfg(test)]
#[path = "local_test.rs"]
mod tests;
