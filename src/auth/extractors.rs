use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{credentials::bearer_token, jwt::JwtKeys},
    error::ApiError,
};

/// Identity of the caller, established from a valid bearer session token.
/// Taking it as a handler argument puts the handler behind authentication;
/// the handler body only runs once the token has verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).map_err(|e| {
            debug!(error = %e, "rejecting request without bearer token");
            ApiError::Unauthorized
        })?;

        // Every verification failure looks the same from outside.
        let user_id = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            debug!(error = %e, "rejecting request with invalid session token");
            ApiError::Unauthorized
        })?;

        Ok(AuthUser(user_id))
    }
}
