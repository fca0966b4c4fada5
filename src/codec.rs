//! Value codec: wire JSON to [`SqlValue`] and back, plus the accessor
//! conversions the cursor getters go through.
//!
//! Conversion policy: standard numeric widening is silent; narrowing that
//! would lose data fails with `DriverError::Conversion` rather than
//! truncating. SQL NULL always decodes to `None`, never to a default value.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value as JsonValue;

use crate::error::DriverError;
use crate::types::{SqlType, SqlValue};

/// Decode one wire-level column value into the unified value model, guided by
/// the column's declared type.
pub fn decode_wire(wire: &JsonValue, declared: SqlType) -> Result<SqlValue, DriverError> {
    if wire.is_null() {
        return Ok(SqlValue::Null);
    }
    match declared {
        SqlType::Null => Ok(SqlValue::Null),
        SqlType::Boolean => wire
            .as_bool()
            .map(SqlValue::Bool)
            .ok_or_else(|| mismatch(wire, declared)),
        SqlType::Byte | SqlType::Short | SqlType::Integer | SqlType::Long => wire
            .as_i64()
            .map(SqlValue::Int)
            .ok_or_else(|| mismatch(wire, declared)),
        SqlType::Float | SqlType::Double => wire
            .as_f64()
            .map(SqlValue::Float)
            .ok_or_else(|| mismatch(wire, declared)),
        SqlType::String => wire
            .as_str()
            .map(|s| SqlValue::Text(s.to_string()))
            .ok_or_else(|| mismatch(wire, declared)),
        // Timestamps travel as epoch milliseconds.
        SqlType::Timestamp => wire
            .as_i64()
            .and_then(timestamp_from_millis)
            .map(SqlValue::Timestamp)
            .ok_or_else(|| mismatch(wire, declared)),
        SqlType::Array | SqlType::Object => Ok(SqlValue::Json(wire.clone())),
    }
}

fn mismatch(wire: &JsonValue, declared: SqlType) -> DriverError {
    DriverError::Conversion(format!(
        "wire value {wire} does not match declared column type {}",
        declared.name()
    ))
}

fn timestamp_from_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Encode one bound parameter into its wire representation.
pub fn encode(value: &SqlValue) -> Result<JsonValue, DriverError> {
    match value {
        SqlValue::Null => Ok(JsonValue::Null),
        SqlValue::Bool(b) => Ok(JsonValue::Bool(*b)),
        SqlValue::Int(i) => Ok(JsonValue::from(*i)),
        SqlValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .ok_or_else(|| {
                DriverError::Conversion(format!("cannot encode non-finite float {f} as parameter"))
            }),
        SqlValue::Text(s) => Ok(JsonValue::from(s.clone())),
        SqlValue::Timestamp(ts) => Ok(JsonValue::from(ts.and_utc().timestamp_millis())),
        SqlValue::Json(j) => Ok(j.clone()),
    }
}

/// Encode a full parameter list for dispatch.
pub fn encode_params(params: &[SqlValue]) -> Result<Vec<JsonValue>, DriverError> {
    params.iter().map(encode).collect()
}

fn incompatible(value: &SqlValue, requested: &str) -> DriverError {
    DriverError::Conversion(format!(
        "cannot read {} value as {requested}",
        value.type_name()
    ))
}

pub(crate) fn to_i64(value: &SqlValue) -> Result<Option<i64>, DriverError> {
    match value {
        SqlValue::Null => Ok(None),
        SqlValue::Int(i) => Ok(Some(*i)),
        SqlValue::Bool(b) => Ok(Some(i64::from(*b))),
        SqlValue::Float(f) => {
            // Narrowing: only a float with no fractional part fits losslessly.
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Ok(Some(*f as i64))
            } else {
                Err(DriverError::Conversion(format!(
                    "double value {f} cannot be narrowed to integer without loss"
                )))
            }
        }
        SqlValue::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| incompatible(value, "integer")),
        other => Err(incompatible(other, "integer")),
    }
}

pub(crate) fn to_i32(value: &SqlValue) -> Result<Option<i32>, DriverError> {
    match to_i64(value)? {
        None => Ok(None),
        Some(wide) => i32::try_from(wide).map(Some).map_err(|_| {
            DriverError::Conversion(format!("integer value {wide} out of range for i32"))
        }),
    }
}

pub(crate) fn to_f64(value: &SqlValue) -> Result<Option<f64>, DriverError> {
    match value {
        SqlValue::Null => Ok(None),
        SqlValue::Float(f) => Ok(Some(*f)),
        SqlValue::Int(i) => Ok(Some(*i as f64)),
        SqlValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| incompatible(value, "double")),
        other => Err(incompatible(other, "double")),
    }
}

pub(crate) fn to_bool(value: &SqlValue) -> Result<Option<bool>, DriverError> {
    match value {
        SqlValue::Null => Ok(None),
        SqlValue::Bool(b) => Ok(Some(*b)),
        SqlValue::Int(0) => Ok(Some(false)),
        SqlValue::Int(1) => Ok(Some(true)),
        SqlValue::Text(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "t" => Ok(Some(true)),
            "false" | "f" => Ok(Some(false)),
            _ => Err(incompatible(value, "boolean")),
        },
        other => Err(incompatible(other, "boolean")),
    }
}

pub(crate) fn to_text(value: &SqlValue) -> Result<Option<String>, DriverError> {
    match value {
        SqlValue::Null => Ok(None),
        SqlValue::Text(s) => Ok(Some(s.clone())),
        SqlValue::Int(i) => Ok(Some(i.to_string())),
        SqlValue::Float(f) => Ok(Some(f.to_string())),
        SqlValue::Bool(b) => Ok(Some(b.to_string())),
        SqlValue::Timestamp(ts) => Ok(Some(ts.format("%F %T%.f").to_string())),
        SqlValue::Json(j) => Ok(Some(j.to_string())),
    }
}

pub(crate) fn to_timestamp(value: &SqlValue) -> Result<Option<NaiveDateTime>, DriverError> {
    match value {
        SqlValue::Null => Ok(None),
        SqlValue::Timestamp(ts) => Ok(Some(*ts)),
        // Long columns read as timestamps are interpreted as epoch millis.
        SqlValue::Int(millis) => timestamp_from_millis(*millis)
            .map(Some)
            .ok_or_else(|| incompatible(value, "timestamp")),
        SqlValue::Text(s) => {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Ok(Some(dt));
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Ok(Some(dt));
            }
            Err(incompatible(value, "timestamp"))
        }
        other => Err(incompatible(other, "timestamp")),
    }
}

pub(crate) fn to_json(value: &SqlValue) -> Result<Option<JsonValue>, DriverError> {
    match value {
        SqlValue::Null => Ok(None),
        SqlValue::Json(j) => Ok(Some(j.clone())),
        other => Err(incompatible(other, "json")),
    }
}
