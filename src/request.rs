//! Request parser: path segments and raw body into a validated `TableRequest`.

use crate::error::AppError;
use crate::service::Identifier;
use serde_json::Value;

/// One parsed request: target table, optional row id, ordered body fields.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRequest {
    pub table: Identifier,
    pub id: Option<i64>,
    pub body: Vec<(Identifier, Value)>,
}

impl TableRequest {
    /// Parses `/<table>[/<id>[/...]]` and an optional JSON object body.
    ///
    /// Checks run in a fixed order: table, JSON syntax, array body, object shape, keys.
    pub fn parse(path: &str, body: &[u8]) -> Result<Self, AppError> {
        let (table, id) = parse_path(path);
        let table = table.ok_or(AppError::MissingTable)?;
        let body = parse_body(body)?;
        Ok(TableRequest { table, id, body })
    }
}

/// Splits the path into a sanitized table name and an id coerced from the second segment.
/// Segments past the second are ignored.
pub fn parse_path(path: &str) -> (Option<Identifier>, Option<i64>) {
    let mut segments = path.trim_matches('/').split('/');
    let table = segments.next().and_then(Identifier::sanitize);
    let id = segments.next().map(coerce_id);
    (table, id)
}

/// Percent-decodes a raw URI path. Bytes that do not form valid UTF-8 become U+FFFD,
/// which the identifier whitelist then drops.
pub fn decode_path(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Leading decimal digits of the filtered segment; anything else is 0.
fn coerce_id(segment: &str) -> i64 {
    let filtered = Identifier::sanitize(segment);
    let digits: String = filtered
        .as_ref()
        .map(|s| s.as_str().chars().take_while(|c| c.is_ascii_digit()).collect())
        .unwrap_or_default();
    digits.parse().unwrap_or(0)
}

/// Empty (or whitespace-only) bodies are an empty field list.
pub fn parse_body(raw: &[u8]) -> Result<Vec<(Identifier, Value)>, AppError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_slice(raw).map_err(AppError::InvalidJson)?;
    let map = match value {
        Value::Object(map) => map,
        Value::Array(_) => return Err(AppError::ArrayBodyNotAllowed),
        _ => return Err(AppError::BodyNotObject),
    };
    map.into_iter()
        .map(|(key, value)| {
            Identifier::parse(&key)
                .map(|column| (column, value))
                .ok_or(AppError::InvalidColumn(key))
        })
        .collect()
}
