use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{repo::RefreshTokenStore, repo_types::RefreshToken},
    chirps::{repo::ChirpStore, repo_types::Chirp},
    users::{repo::UserStore, repo_types::User},
};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated")]
    Conflict,
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db)
                if db.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                StoreError::Conflict
            }
            other => StoreError::Database(other),
        }
    }
}

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")
}

/// Postgres-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const USER_COLUMNS: &str = "id, email, hashed_password, is_chirpy_red, created_at, updated_at";
const CHIRP_COLUMNS: &str = "id, body, user_id, created_at, updated_at";
const TOKEN_COLUMNS: &str = "token, user_id, expires_at, revoked_at, created_at, updated_at";

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, hashed_password, created_at, updated_at)
            VALUES (gen_random_uuid(), $1, $2, NOW(), NOW())
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET email = $2, hashed_password = $3, updated_at = NOW()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn upgrade_user(&self, id: Uuid) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET is_chirpy_red = TRUE, updated_at = NOW()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn delete_users(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users").execute(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl ChirpStore for PgStore {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, StoreError> {
        let chirp = sqlx::query_as::<_, Chirp>(&format!(
            r#"
            INSERT INTO chirps (id, body, user_id, created_at, updated_at)
            VALUES (gen_random_uuid(), $1, $2, NOW(), NOW())
            RETURNING {CHIRP_COLUMNS}
            "#
        ))
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(chirp)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Chirp, StoreError> {
        let chirp = sqlx::query_as::<_, Chirp>(&format!(
            "SELECT {CHIRP_COLUMNS} FROM chirps WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(chirp)
    }

    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError> {
        let rows = sqlx::query_as::<_, Chirp>(&format!(
            r#"
            SELECT {CHIRP_COLUMNS}
              FROM chirps
             WHERE $1::uuid IS NULL OR user_id = $1
             ORDER BY created_at ASC
            "#
        ))
        .bind(author)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<(), StoreError> {
        let done = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for PgStore {
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> Result<RefreshToken, StoreError> {
        let record = sqlx::query_as::<_, RefreshToken>(&format!(
            r#"
            INSERT INTO refresh_tokens (token, user_id, expires_at, revoked_at, created_at, updated_at)
            VALUES ($1, $2, $3, NULL, NOW(), NOW())
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.db)
        .await?;
        Ok(record)
    }

    async fn get_refresh_token(&self, token: &str) -> Result<RefreshToken, StoreError> {
        let record = sqlx::query_as::<_, RefreshToken>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM refresh_tokens WHERE token = $1"
        ))
        .bind(token)
        .fetch_one(&self.db)
        .await?;
        Ok(record)
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let done = sqlx::query(
            r#"
            UPDATE refresh_tokens
               SET revoked_at = COALESCE(revoked_at, NOW()), updated_at = NOW()
             WHERE token = $1
            "#,
        )
        .bind(token)
        .execute(&self.db)
        .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound
        ));
    }

    #[test]
    fn other_errors_stay_database_errors() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Database(_)
        ));
    }
}
