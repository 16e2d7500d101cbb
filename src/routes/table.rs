//! Table routes. Any method is accepted here; the dispatcher decides what is allowed.

use crate::handlers::{table_path, table_root};
use crate::state::AppState;
use axum::{routing::any, Router};

/// `/` and `/*path`, where the path is `<table>[/<id>[/...]]`.
pub fn table_routes(state: AppState) -> Router {
    Router::new()
        .route("/", any(table_root))
        .route("/*path", any(table_path))
        .with_state(state)
}
