//! Token and credential primitives.
//!
//! Tokens are HS256 JWTs carrying the user id. Issued tokens are also
//! persisted (see `users::store`), so a token is live only while its row
//! exists; logout deletes the row without touching other sessions.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config;
use crate::errors::Error;
use crate::ident::RecordId;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: &RecordId) -> Self {
        let now = Utc::now();
        let ttl_hours = config().token_ttl_hours;

        Self {
            sub: user_id.to_string(),
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours as i64)).timestamp(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,
    #[error("token generation: {0}")]
    TokenGeneration(String),
    #[error("password hash: {0}")]
    PasswordHash(String),
}

impl From<AuthError> for Error {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidToken => Error::Unauthorized,
            error => Error::Unexpected(error.to_string()),
        }
    }
}

pub fn issue_token(user_id: &RecordId) -> Result<String, AuthError> {
    let claims = Claims::new(user_id);
    let encoding_key = EncodingKey::from_secret(config().jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(config().jwt_secret.as_bytes());

    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        return Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok();
    }
    false
}
