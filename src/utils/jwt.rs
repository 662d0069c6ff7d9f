// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT Claims structure for application tokens.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the application id the token was issued to.
    pub sub: String,
    /// Issued-at time as Unix timestamp.
    pub iat: usize,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

fn now_secs() -> Result<usize, AppError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .as_secs() as usize)
}

/// Signs a new token for an application.
///
/// Arguments:
/// * `app_id`: Application the token is issued to.
/// * `expiration_seconds`: Lifetime of the token.
pub fn sign_jwt(app_id: &str, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    let issued_at = now_secs()?;
    let lifetime = usize::try_from(expiration_seconds).unwrap_or(usize::MAX);

    let claims = Claims {
        sub: app_id.to_owned(),
        iat: issued_at,
        exp: issued_at.saturating_add(lifetime),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

/// Verifies and decodes a token string, checking signature and expiry.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}
