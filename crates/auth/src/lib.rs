//! Beacon Auth - admin authentication
//!
//! Admin endpoints are protected by bearer JWTs. This crate provides the
//! provider seam the API layer validates against:
//!
//! - [`JwksProvider`] - validates RS256 tokens against a remote JWKS
//!   endpoint, with a process-wide cache of validated tokens keyed by the
//!   raw token string (entries expire at the token's own `exp`)
//! - [`LocalHsProvider`] - validates HS256 tokens signed with a shared
//!   secret, for development and tests
//!
//! Handlers never re-check credentials; they receive the validated user
//! from the extractor in the API crate.

mod error;
mod jwks;
mod local;
mod provider;

pub mod test_utils;

pub use error::{AuthError, Result};
pub use jwks::{JwksConfig, JwksProvider};
pub use local::LocalHsProvider;
pub use provider::{AdminAuth, AdminUser};
