use async_trait::async_trait;
use uuid::Uuid;

use crate::db::StoreError;
use crate::users::repo_types::User;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already taken.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError>;

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError>;

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StoreError>;

    /// Sets the entitlement flag.
    async fn upgrade_user(&self, id: Uuid) -> Result<User, StoreError>;

    /// Removes every user; chirps and refresh tokens go with them.
    async fn delete_users(&self) -> Result<(), StoreError>;
}
