use async_trait::async_trait;
use uuid::Uuid;

use crate::chirps::repo_types::Chirp;
use crate::db::StoreError;

#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, StoreError>;

    async fn get_chirp(&self, id: Uuid) -> Result<Chirp, StoreError>;

    /// Oldest first. `author` narrows the list to one user's chirps.
    async fn list_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError>;

    async fn delete_chirp(&self, id: Uuid) -> Result<(), StoreError>;
}
