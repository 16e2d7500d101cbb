//! Runtime configuration types. Deserializable from a JSON file; every field has a default.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Shape of response bodies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    /// Every body is `{"status": <code>, "message": <payload>}`.
    #[default]
    Enveloped,
    /// Success bodies are the raw payload; errors are `{"message": <text>}`.
    Direct,
}

impl FromStr for ResponseStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enveloped" | "envelope" => Ok(ResponseStyle::Enveloped),
            "direct" => Ok(ResponseStyle::Direct),
            _ => Err(ConfigError::InvalidValue {
                key: "RESPONSE_STYLE",
                value: s.to_string(),
            }),
        }
    }
}

/// What DELETE does to a row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    #[default]
    Hard,
    /// Sets `active = 0`; reads and updates only see `active = 1` rows.
    Soft,
}

impl FromStr for DeleteMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hard" => Ok(DeleteMode::Hard),
            "soft" => Ok(DeleteMode::Soft),
            _ => Err(ConfigError::InvalidValue {
                key: "DELETE_MODE",
                value: s.to_string(),
            }),
        }
    }
}

/// The two knobs that distinguish the behaviour of the table API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResponsePolicy {
    pub style: ResponseStyle,
    pub delete_mode: DeleteMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    /// Methods announced in preflight responses, besides GET and OPTIONS.
    pub methods: Vec<String>,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            enabled: true,
            methods: vec!["PATCH".into(), "DELETE".into(), "PUT".into()],
            max_age_secs: 86_400,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: String,
    /// Mount point of the table routes, e.g. `/api`.
    pub api_prefix: String,
    pub response_style: ResponseStyle,
    pub delete_mode: DeleteMode,
    pub cors: CorsConfig,
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            database_url: "sqlite://db/api.db".into(),
            max_connections: 5,
            bind_addr: "0.0.0.0:3000".into(),
            api_prefix: "/api".into(),
            response_style: ResponseStyle::default(),
            delete_mode: DeleteMode::default(),
            cors: CorsConfig::default(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ApiConfig {
    pub fn policy(&self) -> ResponsePolicy {
        ResponsePolicy {
            style: self.response_style,
            delete_mode: self.delete_mode,
        }
    }
}
