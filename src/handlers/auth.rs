// src/handlers/auth.rs

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    utils::{hash::verify_secret, jwt::sign_jwt},
};

/// Credentials of a calling application.
#[derive(Debug, Deserialize, Validate)]
pub struct IssueTokenRequest {
    #[validate(length(min = 1, max = 100))]
    pub app_id: String,
    #[validate(length(min = 1, max = 256))]
    pub app_secret: String,
}

/// Exchanges application credentials for a bearer token.
///
/// The secret is checked against the Argon2 hash configured in `KNOWN_APPS`.
/// Unknown apps and wrong secrets are indistinguishable to the caller.
pub async fn issue_token(
    State(config): State<Config>,
    payload: Result<Json<IssueTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload
        .validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let invalid = || AppError::Unauthenticated("invalid app credentials".to_string());

    let secret_hash = config.known_apps.get(&payload.app_id).ok_or_else(invalid)?;
    if !verify_secret(&payload.app_secret, secret_hash)? {
        tracing::warn!(app_id = %payload.app_id, "Rejected app credentials");
        return Err(invalid());
    }

    let token = sign_jwt(&payload.app_id, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "expires_in": config.jwt_expiration
    })))
}
