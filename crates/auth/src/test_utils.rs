//! Helpers for tests that need admin tokens
//!
//! Mints HS256 tokens that [`LocalHsProvider`](crate::LocalHsProvider)
//! accepts. Integration tests across the workspace build their app state
//! with `LocalHsProvider::new(TEST_SECRET)` and authenticate with
//! [`admin_token`].

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;

/// Shared secret used by test setups.
pub const TEST_SECRET: &[u8] = b"beacon-test-secret-0123456789abcdef";

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Mint a valid admin token for `user_id`, expiring in one hour.
pub fn admin_token(user_id: &str) -> String {
    token_expiring_at(user_id, (Utc::now() + Duration::hours(1)).timestamp())
}

/// Mint a token with an explicit `exp` claim (possibly in the past).
pub fn token_expiring_at(user_id: &str, exp: i64) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .expect("HS256 signing cannot fail")
}
