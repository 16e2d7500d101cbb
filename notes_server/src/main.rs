//! Notes server: serves the `notes` table through rest-table.
//!
//! Run from repo root: `cargo run -p notes-server`
//! Configure with the environment (or a `.env` file), or point `CONFIG_PATH` at a JSON file.

use rest_table::{app, connect_pool, load, validate, AppState, SqliteStore};
use std::sync::Arc;
use tokio::net::TcpListener;

const NOTES_DDL: &str = "CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY,
    tag TEXT NOT NULL,
    entry TEXT NOT NULL UNIQUE,
    active INTEGER DEFAULT 1
)";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rest_table=info,notes_server=info")),
        )
        .init();

    let config = load().await?;
    validate(&config)?;

    let pool = connect_pool(&config.database_url, config.max_connections).await?;
    sqlx::query(NOTES_DDL).execute(&pool).await?;

    let state = AppState::new(Arc::new(SqliteStore::new(pool)), config.policy());
    let router = app(state, &config)?;

    let listener = TcpListener::bind(&config.bind_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(
        style = ?config.response_style,
        delete_mode = ?config.delete_mode,
        "notes server listening on http://{}{}",
        addr,
        config.api_prefix
    );
    axum::serve(listener, router).await?;
    Ok(())
}
