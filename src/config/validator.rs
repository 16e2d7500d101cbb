//! Validate a loaded config before the server starts.

use crate::config::types::ApiConfig;
use crate::error::ConfigError;
use std::net::SocketAddr;

/// Methods a CORS preflight may announce besides GET and OPTIONS.
const CORS_METHODS: &[&str] = &["GET", "PUT", "PATCH", "DELETE"];

pub fn validate(cfg: &ApiConfig) -> Result<(), ConfigError> {
    if cfg.database_url.trim().is_empty() {
        return Err(ConfigError::Validation("database_url must not be empty".into()));
    }
    if cfg.max_connections == 0 {
        return Err(ConfigError::Validation("max_connections must be at least 1".into()));
    }
    cfg.bind_addr
        .parse::<SocketAddr>()
        .map_err(|_| ConfigError::Validation(format!("bind_addr '{}' is not host:port", cfg.bind_addr)))?;
    let prefix = cfg.api_prefix.as_str();
    if prefix.len() < 2 || !prefix.starts_with('/') || prefix.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "api_prefix '{}' must start with '/', name a path, and not end with '/'",
            prefix
        )));
    }
    if cfg.max_body_bytes == 0 {
        return Err(ConfigError::Validation("max_body_bytes must be at least 1".into()));
    }
    if cfg.cors.enabled {
        for m in &cfg.cors.methods {
            if !CORS_METHODS.contains(&m.as_str()) {
                return Err(ConfigError::Validation(format!("unsupported CORS method: {}", m)));
            }
        }
    }
    Ok(())
}
