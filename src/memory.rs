use std::sync::Mutex;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    auth::{repo::RefreshTokenStore, repo_types::RefreshToken},
    chirps::{repo::ChirpStore, repo_types::Chirp},
    db::StoreError,
    users::{repo::UserStore, repo_types::User},
};

/// In-process store used by tests in place of Postgres.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    chirps: Vec<Chirp>,
    tokens: Vec<RefreshToken>,
    clock: i64,
}

impl Inner {
    /// Strictly increasing timestamps so insertion order is creation order.
    fn tick(&mut self) -> OffsetDateTime {
        self.clock += 1;
        OffsetDateTime::now_utc() + Duration::microseconds(self.clock)
    }
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict);
        }
        let now = inner.tick();
        let user = User {
            id: Uuid::new_v4(),
            email: email.into(),
            hashed_password: hashed_password.into(),
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.lock()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StoreError> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.email == email && u.id != id) {
            return Err(StoreError::Conflict);
        }
        let now = inner.tick();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        user.email = email.into();
        user.hashed_password = hashed_password.into();
        user.updated_at = now;
        Ok(user.clone())
    }

    async fn upgrade_user(&self, id: Uuid) -> Result<User, StoreError> {
        let mut inner = self.lock();
        let now = inner.tick();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        user.is_chirpy_red = true;
        user.updated_at = now;
        Ok(user.clone())
    }

    async fn delete_users(&self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.users.clear();
        inner.chirps.clear();
        inner.tokens.clear();
        Ok(())
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, StoreError> {
        let mut inner = self.lock();
        let now = inner.tick();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            body: body.into(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        inner.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Chirp, StoreError> {
        self.lock()
            .chirps
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError> {
        Ok(self
            .lock()
            .chirps
            .iter()
            .filter(|c| author.map_or(true, |a| c.user_id == a))
            .cloned()
            .collect())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let before = inner.chirps.len();
        inner.chirps.retain(|c| c.id != id);
        if inner.chirps.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> Result<RefreshToken, StoreError> {
        let mut inner = self.lock();
        if inner.tokens.iter().any(|t| t.token == token) {
            return Err(StoreError::Conflict);
        }
        let now = inner.tick();
        let record = RefreshToken {
            token: token.into(),
            user_id,
            expires_at,
            revoked_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.tokens.push(record.clone());
        Ok(record)
    }

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken, StoreError> {
        self.lock()
            .tokens
            .iter()
            .find(|t| t.token == token)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let now = inner.tick();
        let record = inner
            .tokens
            .iter_mut()
            .find(|t| t.token == token)
            .ok_or(StoreError::NotFound)?;
        record.revoked_at.get_or_insert(now);
        record.updated_at = now;
        Ok(())
    }
}

/// Refresh-token store whose every call fails with the given error.
pub struct FailingRefreshTokens(pub fn() -> StoreError);

#[async_trait]
impl RefreshTokenStore for FailingRefreshTokens {
    async fn create_refresh_token(
        &self,
        _token: &str,
        _user_id: Uuid,
        _expires_at: OffsetDateTime,
    ) -> Result<RefreshToken, StoreError> {
        Err((self.0)())
    }

    async fn get_refresh_token(&self, _token: &str) -> Result<RefreshToken, StoreError> {
        Err((self.0)())
    }

    async fn revoke_refresh_token(&self, _token: &str) -> Result<(), StoreError> {
        Err((self.0)())
    }
}
