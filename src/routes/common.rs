//! Liveness and readiness probes.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

/// Body of both probes. `database` is only reported by readiness.
#[derive(Serialize)]
struct Probe {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

impl Probe {
    fn new(status: &'static str, database: Option<&'static str>) -> Self {
        Probe {
            status,
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            database,
        }
    }
}

async fn health() -> Json<Probe> {
    Json(Probe::new("ok", None))
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Probe>) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(Probe::new("ok", Some("ok")))),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Probe::new("degraded", Some("unavailable"))),
            )
        }
    }
}

/// GET /health (process is up, with crate name and version) and GET /ready (datastore ping).
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(state)
}
