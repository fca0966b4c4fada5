use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Values that can appear in a result row or be bound as query parameters
///
/// This enum provides a unified representation of engine values on the
/// client side, independent of the wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (64-bit, covers byte/short/integer/long columns)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Timestamp value (engine sends epoch milliseconds on the wire)
    Timestamp(NaiveDateTime),
    /// Array or object column, kept as JSON
    Json(JsonValue),
}

impl SqlValue {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the value's own type, used in conversion error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "boolean",
            SqlValue::Int(_) => "integer",
            SqlValue::Float(_) => "double",
            SqlValue::Text(_) => "string",
            SqlValue::Timestamp(_) => "timestamp",
            SqlValue::Json(_) => "json",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

/// Column type as declared by the engine in its response metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    Null,
    Boolean,
    String,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Timestamp,
    Array,
    Object,
}

impl SqlType {
    pub fn name(self) -> &'static str {
        match self {
            SqlType::Null => "null",
            SqlType::Boolean => "boolean",
            SqlType::String => "string",
            SqlType::Byte => "byte",
            SqlType::Short => "short",
            SqlType::Integer => "integer",
            SqlType::Long => "long",
            SqlType::Float => "float",
            SqlType::Double => "double",
            SqlType::Timestamp => "timestamp",
            SqlType::Array => "array",
            SqlType::Object => "object",
        }
    }
}

/// Metadata for one column of a result: name, 1-based position, declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub position: usize,
    pub sql_type: SqlType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, position: usize, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            position,
            sql_type,
        }
    }
}
