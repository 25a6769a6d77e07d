use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

const REFRESH_TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
#[error("secure random source unavailable: {0}")]
pub struct EntropyError(#[from] rand::Error);

/// 32 bytes from the OS RNG as 64 lowercase hex characters.
pub fn make_refresh_token() -> Result<String, EntropyError> {
    let mut key = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut key)?;
    Ok(hex::encode(key))
}
