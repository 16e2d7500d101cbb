//! Load configuration from environment variables or from a JSON file.

use crate::config::types::ApiConfig;
use crate::error::ConfigError;
use std::path::Path;
use std::str::FromStr;

/// When set, names a JSON file used instead of the individual variables.
pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";

/// Reads `CONFIG_PATH` if set, otherwise the individual environment variables.
pub async fn load() -> Result<ApiConfig, ConfigError> {
    match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) if !path.trim().is_empty() => load_from_path(path.trim()).await,
        _ => load_from_env(),
    }
}

pub fn load_from_env() -> Result<ApiConfig, ConfigError> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Builds a config from a key lookup; unset or blank keys keep their defaults.
pub fn load_from_lookup<F>(lookup: F) -> Result<ApiConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let mut cfg = ApiConfig::default();

    if let Some(v) = get("DATABASE_URL") {
        cfg.database_url = v;
    }
    if let Some(v) = get("DB_MAX_CONNECTIONS") {
        cfg.max_connections = parse_value("DB_MAX_CONNECTIONS", &v)?;
    }
    if let Some(v) = get("BIND_ADDR") {
        cfg.bind_addr = v;
    }
    if let Some(v) = get("API_PREFIX") {
        cfg.api_prefix = v;
    }
    if let Some(v) = get("RESPONSE_STYLE") {
        cfg.response_style = v.parse()?;
    }
    if let Some(v) = get("DELETE_MODE") {
        cfg.delete_mode = v.parse()?;
    }
    if let Some(v) = get("CORS_ENABLED") {
        cfg.cors.enabled = parse_bool("CORS_ENABLED", &v)?;
    }
    if let Some(v) = get("CORS_METHODS") {
        cfg.cors.methods = v
            .split(',')
            .map(|m| m.trim().to_uppercase())
            .filter(|m| !m.is_empty())
            .collect();
    }
    if let Some(v) = get("CORS_MAX_AGE") {
        cfg.cors.max_age_secs = parse_value("CORS_MAX_AGE", &v)?;
    }
    if let Some(v) = get("MAX_BODY_BYTES") {
        cfg.max_body_bytes = parse_value("MAX_BODY_BYTES", &v)?;
    }
    Ok(cfg)
}

pub async fn load_from_path(path: impl AsRef<Path>) -> Result<ApiConfig, ConfigError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}

fn parse_value<T: FromStr>(key: &'static str, v: &str) -> Result<T, ConfigError> {
    v.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: v.to_string(),
    })
}

fn parse_bool(key: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: v.to_string(),
        }),
    }
}
