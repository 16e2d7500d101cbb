//! Identifier whitelist: the only gate between request data and SQL text.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn non_identifier_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("static pattern"))
}

fn identifier_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("static pattern"))
}

/// A table or column name made only of `[A-Za-z0-9_]`, never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Strips every character outside the whitelist. None when nothing is left.
    pub fn sanitize(raw: &str) -> Option<Self> {
        let filtered = non_identifier_chars().replace_all(raw, "");
        if filtered.is_empty() {
            None
        } else {
            Some(Identifier(filtered.into_owned()))
        }
    }

    /// Accepts `raw` unchanged or not at all.
    pub fn parse(raw: &str) -> Option<Self> {
        identifier_pattern()
            .is_match(raw)
            .then(|| Identifier(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for SQL text.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
