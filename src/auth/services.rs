use std::sync::{Arc, OnceLock};

use axum::extract::FromRef;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::{
    auth::{
        credentials::{extract_credential, BEARER},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        refresh::make_refresh_token,
        repo::RefreshTokenStore,
    },
    db::StoreError,
    error::ApiError,
    state::AppState,
    users::{repo::UserStore, repo_types::User},
};

/// Hash checked against when the email is unknown, so both login failures
/// cost one Argon2 verification.
fn decoy_hash() -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| {
            let secret = make_refresh_token().ok()?;
            hash_password(&secret).ok()
        })
        .as_deref()
}

/// Result of a successful login.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// Login, refresh and revoke flows over the user and refresh-token stores.
#[derive(Clone)]
pub struct Sessions {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    keys: JwtKeys,
    refresh_ttl: Duration,
}

impl FromRef<AppState> for Sessions {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            state.users.clone(),
            state.refresh_tokens.clone(),
            state.keys.clone(),
            Duration::seconds(state.config.jwt.refresh_ttl_days.saturating_mul(86_400)),
        )
    }
}

impl Sessions {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        keys: JwtKeys,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            keys,
            refresh_ttl,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let user = match self.users.get_user_by_email(email).await {
            Ok(u) => u,
            Err(StoreError::NotFound) => {
                if let Some(hash) = decoy_hash() {
                    let _ = verify_password(password, hash);
                }
                info!("login for unknown email");
                return Err(ApiError::AuthFailed);
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = verify_password(password, &user.hashed_password) {
            info!(user_id = %user.id, reason = %e, "login rejected");
            return Err(ApiError::AuthFailed);
        }

        let token = self.keys.sign(user.id).map_err(ApiError::internal)?;
        let refresh_token = make_refresh_token().map_err(ApiError::internal)?;
        let expires_at = OffsetDateTime::now_utc()
            .checked_add(self.refresh_ttl)
            .ok_or_else(|| ApiError::internal(anyhow::anyhow!("refresh lifetime out of range")))?;
        self.refresh_tokens
            .create_refresh_token(&refresh_token, user.id, expires_at)
            .await?;

        info!(user_id = %user.id, "user logged in");
        Ok(Session {
            user,
            token,
            refresh_token,
        })
    }

    /// Mints a new session token. The refresh token itself is left as is.
    pub async fn refresh(&self, authorization: Option<&str>) -> Result<String, ApiError> {
        let presented =
            extract_credential(authorization, BEARER).map_err(|_| ApiError::Unauthorized)?;

        let record = match self.refresh_tokens.get_refresh_token(presented).await {
            Ok(r) => r,
            Err(StoreError::NotFound) => return Err(ApiError::Unauthorized),
            Err(e) => return Err(e.into()),
        };

        if !record.is_usable(OffsetDateTime::now_utc()) {
            warn!(
                user_id = %record.user_id,
                revoked = record.revoked_at.is_some(),
                "refresh with unusable token"
            );
            return Err(ApiError::Unauthorized);
        }

        self.keys.sign(record.user_id).map_err(ApiError::internal)
    }

    pub async fn revoke(&self, authorization: Option<&str>) -> Result<(), ApiError> {
        let presented =
            extract_credential(authorization, BEARER).map_err(|_| ApiError::Unauthorized)?;

        match self.refresh_tokens.revoke_refresh_token(presented).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(ApiError::Unauthorized),
            Err(e) => Err(e.into()),
        }
    }
}
