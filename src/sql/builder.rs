//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for one table.
//!
//! Identifiers are whitelisted `Identifier`s embedded as quoted text; every value is a
//! named `:param`. The path id is always bound as `:id`.

use crate::config::DeleteMode;
use crate::error::AppError;
use crate::operation::Operation;
use crate::request::TableRequest;
use crate::service::Identifier;
use crate::sql::BindValue;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::OnceLock;

const ID_COLUMN: &str = "id";
const ACTIVE_COLUMN: &str = "active";

/// SQL text with named placeholders and their values, in order of first appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct SqlStatement {
    text: String,
    params: Vec<(String, BindValue)>,
}

impl SqlStatement {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &[(String, BindValue)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&BindValue> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Rewrites `:name` placeholders to `?N` (N = 1-based param position) for drivers that
    /// bind by index. Values are returned in the same order.
    pub fn to_positional(&self) -> (String, Vec<BindValue>) {
        let sql = named_placeholder().replace_all(&self.text, |caps: &Captures| {
            let name = &caps[1];
            match self.params.iter().position(|(n, _)| n == name) {
                Some(i) => format!("?{}", i + 1),
                None => caps[0].to_string(),
            }
        });
        let values = self.params.iter().map(|(_, v)| v.clone()).collect();
        (sql.into_owned(), values)
    }
}

fn named_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":([A-Za-z0-9_]+)").expect("static pattern"))
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", s)
}

struct QueryBuf {
    params: Vec<(String, BindValue)>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf { params: Vec::new() }
    }

    /// Registers a value and returns its placeholder.
    fn push_param(&mut self, name: &str, v: BindValue) -> String {
        self.params.push((name.to_string(), v));
        format!(":{}", name)
    }

    fn finish(self, text: String) -> SqlStatement {
        SqlStatement {
            text,
            params: self.params,
        }
    }
}

/// Statement for `op` against `req`. Soft delete mode also restricts reads and updates to
/// active rows.
pub fn build(op: Operation, req: &TableRequest, mode: DeleteMode) -> Result<SqlStatement, AppError> {
    let active_only = mode == DeleteMode::Soft;
    let id = req.id.unwrap_or(0);
    match op {
        Operation::List => Ok(select(&req.table, None, active_only)),
        Operation::Get => Ok(select(&req.table, req.id, active_only)),
        Operation::Insert => Ok(insert(&req.table, &req.body)),
        Operation::Update => update(&req.table, id, &req.body, active_only),
        Operation::SoftDelete => soft_delete(&req.table, id),
        Operation::HardDelete => Ok(delete(&req.table, id)),
    }
}

/// SELECT * with optional id match and optional active-row filter.
pub fn select(table: &Identifier, id: Option<i64>, active_only: bool) -> SqlStatement {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    if let Some(id) = id {
        let ph = q.push_param(ID_COLUMN, id.into());
        where_parts.push(format!("{} = {}", quoted(ID_COLUMN), ph));
    }
    if active_only {
        where_parts.push(format!("{} = 1", quoted(ACTIVE_COLUMN)));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.finish(format!("SELECT * FROM {}{}", table.quoted(), where_clause))
}

/// INSERT with one column and one placeholder per body key, in body order.
/// An empty body inserts a row of defaults.
pub fn insert(table: &Identifier, body: &[(Identifier, Value)]) -> SqlStatement {
    let mut q = QueryBuf::new();
    if body.is_empty() {
        return q.finish(format!("INSERT INTO {} DEFAULT VALUES", table.quoted()));
    }
    let mut cols = Vec::with_capacity(body.len());
    let mut placeholders = Vec::with_capacity(body.len());
    for (col, v) in body {
        placeholders.push(q.push_param(col.as_str(), BindValue::from_json(v)));
        cols.push(col.quoted());
    }
    q.finish(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.quoted(),
        cols.join(", "),
        placeholders.join(", ")
    ))
}

/// UPDATE by id. The primary key is never assigned from the body, so `:id` always
/// carries the path id.
pub fn update(
    table: &Identifier,
    id: i64,
    body: &[(Identifier, Value)],
    active_only: bool,
) -> Result<SqlStatement, AppError> {
    let fields = body
        .iter()
        .filter(|(col, _)| !col.as_str().eq_ignore_ascii_case(ID_COLUMN))
        .map(|(col, v)| (col.as_str(), BindValue::from_json(v)));
    assign(table, id, fields, active_only)
}

/// Marks the row inactive. Whatever the client sent as body is not consulted.
pub fn soft_delete(table: &Identifier, id: i64) -> Result<SqlStatement, AppError> {
    assign(table, id, [(ACTIVE_COLUMN, BindValue::Integer(0))], true)
}

fn assign<'a>(
    table: &Identifier,
    id: i64,
    fields: impl IntoIterator<Item = (&'a str, BindValue)>,
    active_only: bool,
) -> Result<SqlStatement, AppError> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (col, v) in fields {
        let ph = q.push_param(col, v);
        sets.push(format!("{} = {}", quoted(col), ph));
    }
    if sets.is_empty() {
        return Err(AppError::EmptyUpdate);
    }
    let id_ph = q.push_param(ID_COLUMN, id.into());
    let mut where_clause = format!("{} = {}", quoted(ID_COLUMN), id_ph);
    if active_only {
        where_clause.push_str(&format!(" AND {} = 1", quoted(ACTIVE_COLUMN)));
    }
    Ok(q.finish(format!(
        "UPDATE {} SET {} WHERE {}",
        table.quoted(),
        sets.join(", "),
        where_clause
    )))
}

/// DELETE by id.
pub fn delete(table: &Identifier, id: i64) -> SqlStatement {
    let mut q = QueryBuf::new();
    let ph = q.push_param(ID_COLUMN, id.into());
    q.finish(format!("DELETE FROM {} WHERE {} = {}", table.quoted(), quoted(ID_COLUMN), ph))
}
