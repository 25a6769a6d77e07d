use uuid::Uuid;

use crate::{
    auth::password::hash_password,
    db::StoreError,
    error::ApiError,
    users::{repo::UserStore, repo_types::User},
};

const DUPLICATE_EMAIL: &str = "A user with this email already exists";

pub(crate) fn require_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::BadRequest("Email cannot be empty".into()));
    }
    if password.is_empty() {
        return Err(ApiError::BadRequest("Password cannot be empty".into()));
    }
    Ok(())
}

pub async fn register(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    require_credentials(email, password)?;
    let hash = hash_password(password).map_err(ApiError::internal)?;
    users
        .create_user(email, &hash)
        .await
        .map_err(|e| match e {
            StoreError::Conflict => ApiError::Conflict(DUPLICATE_EMAIL.into()),
            other => other.into(),
        })
}

pub async fn update(
    users: &dyn UserStore,
    user_id: Uuid,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    require_credentials(email, password)?;
    let hash = hash_password(password).map_err(ApiError::internal)?;
    users
        .update_user(user_id, email, &hash)
        .await
        .map_err(|e| match e {
            StoreError::Conflict => ApiError::Conflict(DUPLICATE_EMAIL.into()),
            StoreError::NotFound => ApiError::NotFound("User with given id has not been found".into()),
            other => other.into(),
        })
}
