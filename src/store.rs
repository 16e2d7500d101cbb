//! Datastore seam and its SQLite implementation.

use crate::error::AppError;
use crate::sql::SqlStatement;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::str::FromStr;
use std::time::Duration;

/// One row, column name to value, in column order.
pub type Record = Map<String, Value>;

/// What a write statement reports back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Execution {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// Runs exactly one statement per call. Implementations own their connection handling.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Runs a query and materializes every result row.
    async fn fetch(&self, statement: &SqlStatement) -> Result<Vec<Record>, AppError>;

    /// Runs a write and reports affected rows and the last generated row id.
    async fn execute(&self, statement: &SqlStatement) -> Result<Execution, AppError>;

    /// Cheap liveness check used by readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Datastore for SqliteStore {
    async fn fetch(&self, statement: &SqlStatement) -> Result<Vec<Record>, AppError> {
        let (sql, params) = statement.to_positional();
        tracing::debug!(sql = %sql, params = ?params, "query");
        let mut query = sqlx::query(&sql);
        for p in params {
            query = query.bind(p);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_record).collect())
    }

    async fn execute(&self, statement: &SqlStatement) -> Result<Execution, AppError> {
        let (sql, params) = statement.to_positional();
        tracing::debug!(sql = %sql, params = ?params, "execute");
        let mut query = sqlx::query(&sql);
        for p in params {
            query = query.bind(p);
        }
        let done = query.execute(&self.pool).await?;
        Ok(Execution {
            rows_affected: done.rows_affected(),
            last_insert_id: done.last_insert_rowid(),
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Opens a pool for `database_url`, creating the database file and its directory when
/// missing. In-memory databases get one connection that never expires.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    if !in_memory {
        if let Some(dir) = options.get_filename().parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }
    }
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };
    let pool = pool_options.connect_with(options).await?;
    tracing::info!(database_url = %database_url, "database pool ready");
    Ok(pool)
}

fn row_to_record(row: &SqliteRow) -> Record {
    use sqlx::{Column, Row};
    let mut map = Record::new();
    for (idx, col) in row.columns().iter().enumerate() {
        map.insert(col.name().to_string(), cell_to_value(row, idx));
    }
    map
}

/// Decodes by the stored value's runtime storage class, not the declared column type.
fn cell_to_value(row: &SqliteRow, idx: usize) -> Value {
    use sqlx::{Row, TypeInfo, ValueRef};
    let kind = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => return Value::Null,
    };
    match kind.as_str() {
        "INTEGER" | "BOOLEAN" => row
            .try_get::<i64, _>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "REAL" | "NUMERIC" => row
            .try_get::<f64, _>(idx)
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(idx)
            .map(|b| Value::String(String::from_utf8_lossy(&b).into_owned()))
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<String, _>(idx)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}
