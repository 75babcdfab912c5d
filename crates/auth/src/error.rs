//! Authentication error types

use thiserror::Error;

/// Result type for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur validating admin credentials
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token is missing or empty
    #[error("missing token")]
    MissingToken,

    /// Token signature verification failed
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// Token claims are invalid
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    /// Token header is missing the key id
    #[error("token header has no key id")]
    MissingKeyId,

    /// The JWKS document has no key matching the token's key id
    #[error("no JWKS key for kid '{0}'")]
    UnknownKeyId(String),

    /// Failed to fetch or parse the JWKS document
    #[error("JWKS fetch failed: {0}")]
    Jwks(String),
}
