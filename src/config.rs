// src/config.rs

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use thiserror::Error;

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Lifetime of issued app tokens, in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// App id -> Argon2 hash of the app secret.
    pub known_apps: HashMap<String, String>,
    pub max_page_size: u32,
    pub store_timeout_secs: u64,
    pub db_max_connections: u32,
    pub sanitize_bodies: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let known_apps = match lookup("KNOWN_APPS") {
            Some(raw) => parse_known_apps(&raw)?,
            None => HashMap::new(),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration: parse_or(&lookup, "JWT_EXPIRATION", 3600)?,
            rust_log,
            port: parse_or(&lookup, "PORT", 3000)?,
            known_apps,
            max_page_size: parse_page_cap(&lookup)?,
            store_timeout_secs: parse_or(&lookup, "STORE_TIMEOUT_SECS", 5)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            sanitize_bodies: parse_or(&lookup, "SANITIZE_BODIES", false)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// Page sizes are echoed back as i32, so the cap must fit in one.
fn parse_page_cap<F>(lookup: &F) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let cap: u32 = parse_or(lookup, "MAX_PAGE_SIZE", 100)?;
    if cap == 0 || i32::try_from(cap).is_err() {
        return Err(ConfigError::Invalid {
            key: "MAX_PAGE_SIZE",
            value: cap.to_string(),
        });
    }
    Ok(cap)
}

/// Parses `app_id:hash;app_id:hash`. Argon2 PHC strings never contain ':' or ';'.
fn parse_known_apps(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut apps = HashMap::new();
    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (app_id, hash) = entry
            .split_once(':')
            .filter(|(id, hash)| !id.is_empty() && !hash.is_empty())
            .ok_or_else(|| ConfigError::Invalid {
                key: "KNOWN_APPS",
                value: entry.to_string(),
            })?;
        apps.insert(app_id.to_string(), hash.to_string());
    }
    Ok(apps)
}
