//! Response mapping: operation outcomes and errors to a status code and JSON body.

use crate::config::ResponseStyle;
use crate::error::AppError;
use crate::operation::Operation;
use crate::store::Record;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};

/// Result of running one statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Non-empty result set.
    Rows(Vec<Record>),
    /// Generated row id of an insert.
    Created(i64),
    /// Rows changed by an update or delete.
    Affected(u64),
    /// Empty read, zero id, or zero rows affected.
    NoEffect,
}

/// A rendered response: one JSON value followed by a newline.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Reply { status, body }
    }

    /// Successful creation is 201, any other success 200, no effect 202.
    pub fn from_outcome(op: Operation, outcome: Outcome, style: ResponseStyle) -> Self {
        let (status, message) = match outcome {
            Outcome::Rows(rows) => (StatusCode::OK, Value::Array(rows.into_iter().map(Value::Object).collect())),
            Outcome::Created(id) => (StatusCode::CREATED, Value::from(id)),
            Outcome::Affected(n) => (StatusCode::OK, Value::from(n)),
            Outcome::NoEffect => {
                let text = Value::from(op.no_effect_message());
                return Reply::new(StatusCode::ACCEPTED, shape(StatusCode::ACCEPTED, text, style));
            }
        };
        Reply::new(status, shape(status, message, style))
    }

    /// Errors carry only their display text.
    pub fn from_error(err: &AppError, style: ResponseStyle) -> Self {
        let status = err.status();
        let message = Value::from(err.to_string());
        let body = match style {
            ResponseStyle::Enveloped => envelope(status, message),
            ResponseStyle::Direct => json!({ "message": message }),
        };
        Reply::new(status, body)
    }
}

fn envelope(status: StatusCode, message: Value) -> Value {
    json!({ "status": status.as_u16(), "message": message })
}

fn shape(status: StatusCode, message: Value, style: ResponseStyle) -> Value {
    match style {
        ResponseStyle::Enveloped => envelope(status, message),
        ResponseStyle::Direct => message,
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut bytes = match serde_json::to_vec(&self.body) {
            Ok(b) => b,
            Err(e) => {
                tracing::error!(error = %e, "response serialization failed");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        bytes.push(b'\n');
        (
            self.status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            )],
            bytes,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn enveloped_rows() {
        let rows = vec![record(&[("id", json!(1)), ("tag", json!("x"))])];
        let reply = Reply::from_outcome(Operation::Get, Outcome::Rows(rows), ResponseStyle::Enveloped);
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"status": 200, "message": [{"id": 1, "tag": "x"}]}));
    }

    #[test]
    fn direct_rows_are_bare() {
        let rows = vec![record(&[("id", json!(1))])];
        let reply = Reply::from_outcome(Operation::List, Outcome::Rows(rows), ResponseStyle::Direct);
        assert_eq!(reply.body, json!([{"id": 1}]));
    }

    #[test]
    fn creation_is_201_with_id() {
        let reply = Reply::from_outcome(Operation::Insert, Outcome::Created(7), ResponseStyle::Enveloped);
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.body, json!({"status": 201, "message": 7}));
        let direct = Reply::from_outcome(Operation::Insert, Outcome::Created(7), ResponseStyle::Direct);
        assert_eq!(direct.body, json!(7));
    }

    #[test]
    fn affected_count_is_200() {
        let reply = Reply::from_outcome(Operation::HardDelete, Outcome::Affected(1), ResponseStyle::Direct);
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!(1));
    }

    #[test]
    fn no_effect_is_202_with_operation_message() {
        let cases = [
            (Operation::Get, "No record found"),
            (Operation::List, "No record found"),
            (Operation::Insert, "Insert failed"),
            (Operation::Update, "Update failed"),
            (Operation::SoftDelete, "Delete failed"),
            (Operation::HardDelete, "Delete failed"),
        ];
        for (op, text) in cases {
            let reply = Reply::from_outcome(op, Outcome::NoEffect, ResponseStyle::Enveloped);
            assert_eq!(reply.status, StatusCode::ACCEPTED);
            assert_eq!(reply.body, json!({"status": 202, "message": text}));
            let direct = Reply::from_outcome(op, Outcome::NoEffect, ResponseStyle::Direct);
            assert_eq!(direct.body, json!(text));
        }
    }

    #[test]
    fn errors_by_style() {
        let reply = Reply::from_error(&AppError::MethodNotAllowed, ResponseStyle::Enveloped);
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(reply.body, json!({"status": 405, "message": "Method not allowed"}));
        let direct = Reply::from_error(&AppError::MissingTable, ResponseStyle::Direct);
        assert_eq!(direct.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(direct.body, json!({"message": "Table name is missing"}));
    }

    #[tokio::test]
    async fn body_is_one_line_with_unescaped_unicode() {
        let reply = Reply::new(StatusCode::OK, json!({"status": 200, "message": "καλημέρα"}));
        let response = reply.into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert_eq!(text, "{\"status\":200,\"message\":\"καλημέρα\"}\n");
    }
}
