//! Router assembly: common routes, table routes under the configured prefix, and layers.

mod common;
mod table;

pub use common::common_routes;
pub use table::table_routes;

use crate::config::ApiConfig;
use crate::cors::{cors, CorsPolicy};
use crate::error::ConfigError;
use crate::state::AppState;
use crate::handlers::table_root;
use axum::{extract::DefaultBodyLimit, middleware, routing::any, Router};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application router for `config`.
pub fn app(state: AppState, config: &ApiConfig) -> Result<Router, ConfigError> {
    let mut router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(mount_point_slash(&config.api_prefix, state.clone()))
        .nest(&config.api_prefix, table_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(config.max_body_bytes)),
        );
    if config.cors.enabled {
        let policy = CorsPolicy::from_config(&config.cors)?;
        router = router.layer(middleware::from_fn_with_state(policy, cors));
    }
    Ok(router)
}

/// `<prefix>/` is not covered by the nested `/` route; it answers like the bare prefix.
fn mount_point_slash(prefix: &str, state: AppState) -> Router {
    Router::new()
        .route(&format!("{}/", prefix), any(table_root))
        .with_state(state)
}
