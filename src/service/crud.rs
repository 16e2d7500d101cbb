//! Executes one built statement and classifies what it did.

use crate::error::AppError;
use crate::operation::Operation;
use crate::response::Outcome;
use crate::sql::SqlStatement;
use crate::store::Datastore;

pub struct TableService;

impl TableService {
    /// Reads collect rows; inserts report the new id; updates and deletes report the
    /// affected row count. A zero-valued indicator is `Outcome::NoEffect`.
    pub async fn run(
        store: &dyn Datastore,
        op: Operation,
        statement: &SqlStatement,
    ) -> Result<Outcome, AppError> {
        let outcome = if op.is_read() {
            let rows = store.fetch(statement).await?;
            if rows.is_empty() {
                Outcome::NoEffect
            } else {
                Outcome::Rows(rows)
            }
        } else {
            let done = store.execute(statement).await?;
            match op {
                Operation::Insert if done.last_insert_id != 0 => Outcome::Created(done.last_insert_id),
                Operation::Insert => Outcome::NoEffect,
                _ if done.rows_affected != 0 => Outcome::Affected(done.rows_affected),
                _ => Outcome::NoEffect,
            }
        };
        if outcome == Outcome::NoEffect {
            tracing::debug!(operation = ?op, sql = %statement.text(), "statement had no effect");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeleteMode;
    use crate::request::TableRequest;
    use crate::sql::build;
    use crate::store::{Execution, Record};
    use async_trait::async_trait;
    use serde_json::json;

    struct Canned {
        rows: Vec<Record>,
        done: Execution,
    }

    #[async_trait]
    impl Datastore for Canned {
        async fn fetch(&self, _: &SqlStatement) -> Result<Vec<Record>, AppError> {
            Ok(self.rows.clone())
        }
        async fn execute(&self, _: &SqlStatement) -> Result<Execution, AppError> {
            Ok(self.done)
        }
        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn canned(rows: usize, rows_affected: u64, last_insert_id: i64) -> Canned {
        let mut row = Record::new();
        row.insert("id".into(), json!(1));
        Canned {
            rows: vec![row; rows],
            done: Execution {
                rows_affected,
                last_insert_id,
            },
        }
    }

    async fn run(store: &Canned, op: Operation, path: &str, body: &str) -> Outcome {
        let req = TableRequest::parse(path, body.as_bytes()).unwrap();
        let stmt = build(op, &req, DeleteMode::Hard).unwrap();
        TableService::run(store, op, &stmt).await.unwrap()
    }

    #[tokio::test]
    async fn reads() {
        assert_eq!(run(&canned(0, 0, 0), Operation::List, "/t", "").await, Outcome::NoEffect);
        assert!(matches!(
            run(&canned(2, 0, 0), Operation::List, "/t", "").await,
            Outcome::Rows(rows) if rows.len() == 2
        ));
    }

    #[tokio::test]
    async fn inserts_use_the_generated_id() {
        let body = r#"{"a":1}"#;
        assert_eq!(run(&canned(0, 1, 5), Operation::Insert, "/t", body).await, Outcome::Created(5));
        assert_eq!(run(&canned(0, 1, 0), Operation::Insert, "/t", body).await, Outcome::NoEffect);
    }

    #[tokio::test]
    async fn writes_use_the_affected_count() {
        let body = r#"{"a":1}"#;
        assert_eq!(run(&canned(0, 2, 9), Operation::Update, "/t/1", body).await, Outcome::Affected(2));
        assert_eq!(run(&canned(0, 0, 9), Operation::Update, "/t/1", body).await, Outcome::NoEffect);
        assert_eq!(run(&canned(0, 1, 0), Operation::HardDelete, "/t/1", "").await, Outcome::Affected(1));
        assert_eq!(run(&canned(0, 0, 0), Operation::HardDelete, "/t/1", "").await, Outcome::NoEffect);
    }
}
