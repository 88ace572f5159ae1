use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::translation::PlaceholderStyle;

/// Values that can be stored in pipeline state, bound as query parameters, or returned in rows.
///
/// ```rust
/// use sqlmw::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// assert!(params.iter().all(RowValues::is_truthy));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value counts as "present" when resolving a `:name` placeholder.
    ///
    /// Zero, `NaN`, the empty string, `false` and NULL are falsy. Timestamps, JSON documents and
    /// blobs are opaque and always truthy, even when empty.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            RowValues::Int(i) => *i != 0,
            RowValues::Float(f) => *f != 0.0 && !f.is_nan(),
            RowValues::Text(s) => !s.is_empty(),
            RowValues::Bool(b) => *b,
            RowValues::Null => false,
            RowValues::Timestamp(_) | RowValues::JSON(_) | RowValues::Blob(_) => true,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// SQL dialects understood by the middleware.
///
/// Parses from backend names the way a CLI flag would: `DatabaseType::from_str("pg", true)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    #[value(alias = "pg", alias = "postgresql")]
    Postgres,
    /// `SQLite` database
    Sqlite,
    /// `MySQL` database (dialect only; the adapter is supplied by the caller)
    Mysql,
    /// Any other dialect. Has no placeholder style or transaction keywords of its own.
    #[value(skip)]
    Other,
}

impl DatabaseType {
    /// Positional placeholder style for this dialect, if it has a known one.
    #[must_use]
    pub fn placeholder_style(self) -> Option<PlaceholderStyle> {
        match self {
            DatabaseType::Postgres => Some(PlaceholderStyle::Postgres),
            DatabaseType::Sqlite => Some(PlaceholderStyle::Sqlite),
            DatabaseType::Mysql => Some(PlaceholderStyle::Mysql),
            DatabaseType::Other => None,
        }
    }

    /// Primary name used when registering the dialect's backend.
    #[must_use]
    pub fn name(self) -> Option<String> {
        self.to_possible_value().map(|v| v.get_name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_values() {
        assert!(!RowValues::Int(0).is_truthy());
        assert!(!RowValues::Float(0.0).is_truthy());
        assert!(!RowValues::Float(f64::NAN).is_truthy());
        assert!(!RowValues::Text(String::new()).is_truthy());
        assert!(!RowValues::Bool(false).is_truthy());
        assert!(!RowValues::Null.is_truthy());
    }

    #[test]
    fn opaque_values_are_truthy() {
        assert!(RowValues::Int(-1).is_truthy());
        assert!(RowValues::Text("0".into()).is_truthy());
        assert!(RowValues::Blob(Vec::new()).is_truthy());
        assert!(RowValues::JSON(serde_json::json!({})).is_truthy());
        let ts = NaiveDateTime::parse_from_str("1970-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("valid timestamp");
        assert!(RowValues::Timestamp(ts).is_truthy());
    }

    #[test]
    fn database_type_parses_aliases() {
        assert_eq!(
            DatabaseType::from_str("pg", true),
            Ok(DatabaseType::Postgres)
        );
        assert_eq!(
            DatabaseType::from_str("SQLite", true),
            Ok(DatabaseType::Sqlite)
        );
        assert!(DatabaseType::from_str("other", true).is_err());
        assert_eq!(DatabaseType::Postgres.name().as_deref(), Some("postgres"));
        assert_eq!(DatabaseType::Other.name(), None);
    }
}
