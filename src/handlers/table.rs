//! Table handlers: hand method, decoded path and raw body to the dispatcher.

use crate::request::decode_path;
use crate::service::dispatch;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

/// Requests to the mount point itself, with or without a trailing slash. These have no
/// table segment.
pub async fn table_root(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    serve(&state, &method, "", &body).await
}

/// Everything below the mount point. The nested router strips the prefix from `uri`; the
/// remainder is decoded lossily here so malformed escapes still get a JSON reply.
pub async fn table_path(State(state): State<AppState>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = decode_path(uri.path());
    serve(&state, &method, &path, &body).await
}

/// OPTIONS never reaches the dispatcher. With CORS enabled the middleware answers it first.
async fn serve(state: &AppState, method: &Method, path: &str, body: &[u8]) -> Response {
    if *method == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    dispatch(state.store.as_ref(), state.policy, method, path, body)
        .await
        .into_response()
}
