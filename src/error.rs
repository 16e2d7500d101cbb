//! Typed errors and their HTTP status mapping.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Request-level failures. The display text is what the client sees.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Table name is missing")]
    MissingTable,
    #[error("Invalid JSON format")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Multiple items are not allowed")]
    ArrayBodyNotAllowed,
    #[error("Request body must be a JSON object")]
    BodyNotObject,
    #[error("Invalid column name: '{0}'")]
    InvalidColumn(String),
    #[error("No fields to update")]
    EmptyUpdate,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Only an unsupported method has its own status; everything else is a failed request.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
