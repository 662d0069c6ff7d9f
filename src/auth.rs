// src/auth.rs

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

use crate::{config::Config, error::AppError, utils::jwt::verify_jwt};

/// The token-existence capability itself failed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token backend unavailable: {0}")]
    Unavailable(String),
}

/// Answers whether a presented token is currently valid.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn exists(&self, token: &str) -> Result<bool, AuthError>;
}

pub type DynTokenStore = Arc<dyn TokenStore>;

/// Stateless token store: a token exists while its signature verifies, it
/// has not expired, and the application it names is still configured.
pub struct JwtTokenStore {
    secret: String,
    known_apps: HashSet<String>,
}

impl JwtTokenStore {
    pub fn new<I, S>(secret: impl Into<String>, known_apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            secret: secret.into(),
            known_apps: known_apps.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.clone(), config.known_apps.keys().cloned())
    }
}

#[async_trait]
impl TokenStore for JwtTokenStore {
    async fn exists(&self, token: &str) -> Result<bool, AuthError> {
        match verify_jwt(token, &self.secret) {
            Ok(claims) => Ok(self.known_apps.contains(&claims.sub)),
            Err(e) => match e.kind() {
                ErrorKind::InvalidEcdsaKey
                | ErrorKind::InvalidRsaKey(_)
                | ErrorKind::RsaFailedSigning
                | ErrorKind::InvalidKeyFormat
                | ErrorKind::Crypto(_) => Err(AuthError::Unavailable(e.to_string())),
                _ => {
                    tracing::debug!("Rejected token: {}", e);
                    Ok(false)
                }
            },
        }
    }
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum Middleware: Authentication for mutating routes.
///
/// Validates the 'Authorization: Bearer <token>' header against the token
/// store. Missing or unknown tokens get 401; a failing store gets 500.
pub async fn auth_middleware(
    State(tokens): State<DynTokenStore>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // The request body is not Sync; hold no borrow of `req` across the await.
    let token = bearer_token(&req)
        .map(str::to_owned)
        .ok_or_else(|| AppError::Unauthenticated("missing bearer token".to_string()))?;

    if !tokens.exists(&token).await? {
        return Err(AppError::Unauthenticated("invalid token".to_string()));
    }

    Ok(next.run(req).await)
}
