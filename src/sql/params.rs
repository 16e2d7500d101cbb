//! Convert serde_json::Value to types that sqlx can bind against SQLite.

use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::{Database, Type};

/// A value that can be bound to a SQLite statement.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl BindValue {
    /// Nested arrays and objects are stored as their JSON text.
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::Integer(i)
                } else if n.is_u64() {
                    // Past i64::MAX: bound as its decimal text.
                    BindValue::Text(n.to_string())
                } else {
                    n.as_f64().map(BindValue::Real).unwrap_or(BindValue::Null)
                }
            }
            Value::String(s) => BindValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => BindValue::Text(v.to_string()),
        }
    }
}

impl From<i64> for BindValue {
    fn from(n: i64) -> Self {
        BindValue::Integer(n)
    }
}

impl<'q> Encode<'q, Sqlite> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            BindValue::Null => <Option<i64> as Encode<'q, Sqlite>>::encode_by_ref(&None, buf),
            BindValue::Bool(b) => <bool as Encode<'q, Sqlite>>::encode_by_ref(b, buf),
            BindValue::Integer(n) => <i64 as Encode<'q, Sqlite>>::encode_by_ref(n, buf),
            BindValue::Real(n) => <f64 as Encode<'q, Sqlite>>::encode_by_ref(n, buf),
            BindValue::Text(s) => <String as Encode<'q, Sqlite>>::encode_by_ref(s, buf),
        }
    }
}

impl Type<Sqlite> for BindValue {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}
