use serde::{Deserialize, Serialize};

/// Fixed issuer of every session token this service signs.
pub const TOKEN_ISSUER: &str = "chirpy";

/// Session token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String, // issuer
    pub sub: String, // user ID
    pub iat: i64,    // issued at (unix timestamp)
    pub exp: i64,    // expires at (unix timestamp)
}
