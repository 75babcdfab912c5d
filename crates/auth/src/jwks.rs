//! Remote-JWKS token validation
//!
//! Validates RS256 bearer tokens against the public keys published at a
//! JWKS endpoint. Successful validations land in a process-wide cache
//! keyed by the raw token string; a cached token skips both the JWKS fetch
//! and the signature check until its own `exp` passes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AuthError, Result};
use crate::provider::{AdminAuth, AdminUser};

/// Configuration for the JWKS provider
#[derive(Debug, Clone, Deserialize)]
pub struct JwksConfig {
    /// URL of the JWKS document
    pub jwks_url: String,

    /// Required `iss` claim, if any
    #[serde(default)]
    pub issuer: Option<String>,

    /// Required `aud` claim, if any
    #[serde(default)]
    pub audience: Option<String>,
}

/// JWKS document shape
#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    #[serde(default)]
    kid: String,
    #[serde(default)]
    kty: String,
    /// RSA modulus, base64url
    #[serde(default)]
    n: String,
    /// RSA exponent, base64url
    #[serde(default)]
    e: String,
}

/// Claims we require from admin tokens
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

struct CacheEntry {
    user_id: String,
    expires_at: DateTime<Utc>,
}

/// Admin auth provider backed by a remote JWKS endpoint.
pub struct JwksProvider {
    config: JwksConfig,
    client: reqwest::Client,
    validation: Validation,
    /// Validated tokens, keyed by the raw token string
    tokens: RwLock<HashMap<String, CacheEntry>>,
}

impl JwksProvider {
    pub fn new(config: JwksConfig) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        if let Some(ref issuer) = config.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(ref audience) = config.audience {
            validation.set_audience(&[audience]);
        }

        Self {
            config,
            client: reqwest::Client::new(),
            validation,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    fn cached(&self, token: &str) -> Option<AdminUser> {
        let tokens = self.tokens.read();
        let entry = tokens.get(token)?;
        if entry.expires_at <= Utc::now() {
            return None;
        }
        Some(AdminUser {
            user_id: entry.user_id.clone(),
        })
    }

    fn cache(&self, token: &str, user_id: &str, expires_at: DateTime<Utc>) {
        if expires_at <= Utc::now() {
            return;
        }

        let mut tokens = self.tokens.write();
        let now = Utc::now();
        tokens.retain(|_, entry| entry.expires_at > now);
        tokens.insert(
            token.to_string(),
            CacheEntry {
                user_id: user_id.to_string(),
                expires_at,
            },
        );
    }

    async fn fetch_key(&self, kid: &str) -> Result<DecodingKey> {
        debug!(url = %self.config.jwks_url, kid, "fetching JWKS document");

        let jwks: Jwks = self
            .client
            .get(&self.config.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::Jwks(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::Jwks(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::Jwks(e.to_string()))?;

        let key = jwks
            .keys
            .iter()
            .find(|key| key.kty == "RSA" && key.kid == kid)
            .ok_or_else(|| AuthError::UnknownKeyId(kid.to_string()))?;

        DecodingKey::from_rsa_components(&key.n, &key.e)
            .map_err(|e| AuthError::Jwks(format!("bad RSA components for kid {kid}: {e}")))
    }
}

#[async_trait]
impl AdminAuth for JwksProvider {
    async fn validate(&self, token: &str) -> Result<AdminUser> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        if let Some(user) = self.cached(token) {
            return Ok(user);
        }

        let header = decode_header(token)
            .map_err(|e| AuthError::InvalidClaims(e.to_string()))?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let key = self.fetch_key(&kid).await?;

        let data = decode::<Claims>(token, &key, &self.validation).map_err(|e| {
            debug!(error = %e, "admin token validation failed");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::InvalidClaims(e.to_string()),
            }
        })?;

        let expires_at = Utc
            .timestamp_opt(data.claims.exp, 0)
            .single()
            .unwrap_or_else(Utc::now);
        self.cache(token, &data.claims.sub, expires_at);

        debug!(user_id = %data.claims.sub, "admin token validated against JWKS");
        Ok(AdminUser {
            user_id: data.claims.sub,
        })
    }
}

#[cfg(test)]
#[path = "jwks_test.rs"]
mod tests;
