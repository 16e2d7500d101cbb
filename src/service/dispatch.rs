//! Dispatcher: method, path and body in; one rendered reply out.

use crate::config::ResponsePolicy;
use crate::error::AppError;
use crate::operation::Operation;
use crate::request::{parse_path, TableRequest};
use crate::response::{Outcome, Reply};
use crate::service::TableService;
use crate::sql::build;
use crate::store::Datastore;
use axum::http::Method;

/// Handles one table request. Unsupported methods are refused before the path or body
/// is looked at, so they never reach the datastore.
pub async fn dispatch(
    store: &dyn Datastore,
    policy: ResponsePolicy,
    method: &Method,
    path: &str,
    body: &[u8],
) -> Reply {
    // Id 0, including anything that coerced to 0, reads as no id.
    let has_id = parse_path(path).1.is_some_and(|id| id != 0);
    let op = match Operation::from_method(method, has_id, policy.delete_mode) {
        Ok(op) => op,
        Err(e) => return Reply::from_error(&e, policy.style),
    };
    match execute(store, policy, op, path, body).await {
        Ok(outcome) => Reply::from_outcome(op, outcome, policy.style),
        Err(e) => {
            if let AppError::Db(ref db) = e {
                tracing::error!(operation = ?op, error = %db, "datastore failure");
            } else {
                tracing::debug!(operation = ?op, error = %e, "request rejected");
            }
            Reply::from_error(&e, policy.style)
        }
    }
}

async fn execute(
    store: &dyn Datastore,
    policy: ResponsePolicy,
    op: Operation,
    path: &str,
    body: &[u8],
) -> Result<Outcome, AppError> {
    let req = TableRequest::parse(path, body)?;
    let statement = build(op, &req, policy.delete_mode)?;
    TableService::run(store, op, &statement).await
}
