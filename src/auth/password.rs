use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("hashing failed: {0}")]
    Hashing(argon2::password_hash::Error),
    #[error("stored hash is malformed: {0}")]
    MalformedHash(argon2::password_hash::Error),
    #[error("password does not match")]
    Mismatch,
}

/// Argon2id with a fresh random salt, returned as a PHC string.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            PasswordError::Hashing(e)
        })?
        .to_string();
    Ok(hash)
}

/// Callers treat every error as an authentication failure; the variants
/// only exist for logging.
pub fn verify_password(plain: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(PasswordError::MalformedHash)?;
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn verify_fails_on_malformed_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-valid-hash"),
            Err(PasswordError::MalformedHash(_))
        ));
    }

    #[test]
    fn same_password_gets_a_new_salt_each_time() {
        let a = hash_password("pw123").unwrap();
        let b = hash_password("pw123").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("pw123", &a).is_ok());
        assert!(verify_password("pw123", &b).is_ok());
    }
}
