//! rest-table: a generic REST façade over one dynamically named SQL table.

pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod operation;
pub mod request;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{load, validate, ApiConfig, CorsConfig, DeleteMode, ResponsePolicy, ResponseStyle};
pub use error::{AppError, ConfigError};
pub use operation::Operation;
pub use request::TableRequest;
pub use response::{Outcome, Reply};
pub use routes::{app, common_routes, table_routes};
pub use service::{dispatch, Identifier, TableService};
pub use sql::{build, SqlStatement};
pub use state::AppState;
pub use store::{connect_pool, Datastore, Execution, Record, SqliteStore};
