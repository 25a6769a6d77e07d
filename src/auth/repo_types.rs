use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Persisted refresh token. The token string is the primary key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
    pub revoked_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl RefreshToken {
    /// A token can mint session tokens while unexpired and unrevoked.
    pub fn is_usable(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at && self.revoked_at.is_none()
    }
}
