use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::RefreshToken;
use crate::db::StoreError;

/// What the session layer needs from storage for refresh tokens.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Fails with `Conflict` if the token string already exists.
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> Result<RefreshToken, StoreError>;

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken, StoreError>;

    /// Stamps `revoked_at` if it is still empty. Revoking twice succeeds and
    /// keeps the first timestamp. Unknown tokens fail with `NotFound`.
    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError>;
}
