//! The six table operations and how HTTP methods select them.

use crate::config::DeleteMode;
use crate::error::AppError;
use axum::http::Method;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Insert,
    Update,
    SoftDelete,
    HardDelete,
}

impl Operation {
    /// GET reads, PUT inserts, PATCH updates, DELETE deletes per `delete_mode`.
    /// `has_id` only splits GET into Get and List; a zero id counts as absent.
    pub fn from_method(method: &Method, has_id: bool, delete_mode: DeleteMode) -> Result<Self, AppError> {
        Ok(match *method {
            Method::GET if has_id => Operation::Get,
            Method::GET => Operation::List,
            Method::PUT => Operation::Insert,
            Method::PATCH => Operation::Update,
            Method::DELETE => match delete_mode {
                DeleteMode::Hard => Operation::HardDelete,
                DeleteMode::Soft => Operation::SoftDelete,
            },
            _ => return Err(AppError::MethodNotAllowed),
        })
    }

    /// Message rendered with 202 when the statement had no effect.
    pub fn no_effect_message(self) -> &'static str {
        match self {
            Operation::List | Operation::Get => "No record found",
            Operation::Insert => "Insert failed",
            Operation::Update => "Update failed",
            Operation::SoftDelete | Operation::HardDelete => "Delete failed",
        }
    }

    pub fn is_read(self) -> bool {
        matches!(self, Operation::List | Operation::Get)
    }
}
