//! Admin authentication extractor
//!
//! Extracts and validates the admin bearer token from the `Authorization`
//! header. Handlers take an [`AdminUser`] argument and never re-check
//! credentials themselves.

use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use beacon_auth::{AdminAuth, AuthError as ProviderError};

/// Trait for app state that provides an admin auth provider
pub trait HasAdminAuth: Send + Sync {
    /// Get the admin auth provider
    fn admin_auth(&self) -> Arc<dyn AdminAuth>;
}

/// Error returned when admin authentication fails
#[derive(Debug)]
pub enum AuthRejection {
    /// No bearer token provided
    MissingToken,
    /// Token failed validation
    InvalidToken,
    /// Token has expired
    TokenExpired,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            Self::MissingToken => ("AUTH_REQUIRED", "Authentication required"),
            Self::InvalidToken => ("INVALID_TOKEN", "Invalid authentication token"),
            Self::TokenExpired => ("TOKEN_EXPIRED", "Authentication token has expired"),
        };

        let body = serde_json::json!({
            "error": code,
            "message": message,
        });

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Authenticated admin extractor
///
/// ```ignore
/// async fn handler(admin: AdminUser) -> impl IntoResponse {
///     format!("hello, {}", admin.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminUser(pub beacon_auth::AdminUser);

impl std::ops::Deref for AdminUser {
    type Target = beacon_auth::AdminUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: HasAdminAuth + Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let user = state
            .admin_auth()
            .validate(&token)
            .await
            .map_err(|e| match e {
                ProviderError::TokenExpired => AuthRejection::TokenExpired,
                ProviderError::MissingToken => AuthRejection::MissingToken,
                _ => AuthRejection::InvalidToken,
            })?;

        Ok(AdminUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
