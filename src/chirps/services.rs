use uuid::Uuid;

use crate::{
    chirps::{repo::ChirpStore, repo_types::Chirp},
    db::StoreError,
    error::ApiError,
};

pub const MAX_CHIRP_LENGTH: usize = 140;

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

/// Masks profane words. Words are split on single spaces and compared
/// case-insensitively, so punctuation attached to a word prevents a match.
pub fn sanitize(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            if PROFANE_WORDS.contains(&lower.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate(body: &str) -> Result<String, ApiError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ApiError::BadRequest("Chirp is too long".into()));
    }
    Ok(sanitize(body))
}

pub async fn create(
    chirps: &dyn ChirpStore,
    user_id: Uuid,
    body: &str,
) -> Result<Chirp, ApiError> {
    let cleaned = validate(body)?;
    Ok(chirps.create_chirp(&cleaned, user_id).await?)
}

pub async fn get(chirps: &dyn ChirpStore, id: Uuid) -> Result<Chirp, ApiError> {
    chirps.get_chirp(id).await.map_err(not_found)
}

pub async fn list(
    chirps: &dyn ChirpStore,
    author: Option<Uuid>,
    descending: bool,
) -> Result<Vec<Chirp>, ApiError> {
    let mut rows = chirps.list_chirps(author).await?;
    if descending {
        rows.reverse();
    }
    Ok(rows)
}

/// Only the author may delete a chirp.
pub async fn delete(chirps: &dyn ChirpStore, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
    let chirp = chirps.get_chirp(id).await.map_err(not_found)?;
    if chirp.user_id != user_id {
        return Err(ApiError::Forbidden(
            "Deleting chirps of other users is not allowed".into(),
        ));
    }
    chirps.delete_chirp(id).await.map_err(not_found)
}

fn not_found(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => {
            ApiError::NotFound("Chirp with given id has not been found".into())
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn masks_profane_words_case_insensitively() {
        assert_eq!(
            sanitize("This is a kerfuffle opinion I need to share with the world"),
            "This is a **** opinion I need to share with the world"
        );
        assert_eq!(sanitize("Sharbert and FORNAX"), "**** and ****");
    }

    #[test]
    fn leaves_attached_punctuation_alone() {
        assert_eq!(sanitize("what a kerfuffle!"), "what a kerfuffle!");
    }

    #[test]
    fn keeps_spacing() {
        assert_eq!(sanitize("a  fornax  b"), "a  ****  b");
    }

    #[test]
    fn length_limit() {
        assert!(validate(&"a".repeat(MAX_CHIRP_LENGTH)).is_ok());
        let err = validate(&"a".repeat(MAX_CHIRP_LENGTH + 1)).unwrap_err();
        assert_eq!(err.to_string(), "Chirp is too long");
    }

    #[test]
    fn length_counts_characters() {
        assert!(validate(&"é".repeat(MAX_CHIRP_LENGTH)).is_ok());
    }

    #[tokio::test]
    async fn list_orders_and_filters() {
        let store = MemoryStore::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        create(&store, alice, "one").await.unwrap();
        create(&store, bob, "two").await.unwrap();
        create(&store, alice, "three").await.unwrap();

        let asc: Vec<_> = list(&store, None, false).await.unwrap().into_iter().map(|c| c.body).collect();
        assert_eq!(asc, ["one", "two", "three"]);

        let desc: Vec<_> = list(&store, Some(alice), true).await.unwrap().into_iter().map(|c| c.body).collect();
        assert_eq!(desc, ["three", "one"]);
    }

    #[tokio::test]
    async fn delete_checks_ownership() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let chirp = create(&store, owner, "mine").await.unwrap();

        let err = delete(&store, Uuid::new_v4(), chirp.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        delete(&store, owner, chirp.id).await.unwrap();
        let err = get(&store, chirp.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
