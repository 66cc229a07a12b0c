//! Scalar values stored in a record field

use crate::errors::RecordError;
use serde::{Deserialize, Serialize};

/// A single field value
///
/// Mirrors what a SQLite column can hold for this application: JSON
/// strings, numbers, booleans and null. Arrays and objects are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl FieldValue {
    /// Convert a JSON value, naming `field` in the error for nested values
    pub fn from_json(field: &str, value: serde_json::Value) -> Result<Self, RecordError> {
        match value {
            serde_json::Value::Null => Ok(FieldValue::Null),
            serde_json::Value::Bool(b) => Ok(FieldValue::Bool(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(FieldValue::Integer(i)),
                None => n.as_f64().map(FieldValue::Real).ok_or_else(|| {
                    RecordError::UnsupportedValue {
                        field: field.to_string(),
                    }
                }),
            },
            serde_json::Value::String(s) => Ok(FieldValue::Text(s)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Err(RecordError::UnsupportedValue {
                    field: field.to_string(),
                })
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of the value
    ///
    /// Accepts integral reals and numeric strings, since request payloads
    /// often carry quantities as `"3"` or `3.0`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Real(f) if f.fract() == 0.0 && f.is_finite() => {
                let truncated = *f as i64;
                (truncated as f64 == *f).then_some(truncated)
            }
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Truthiness for flag columns (SQLite stores booleans as 0/1)
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Render as a plain string for identifiers
    pub fn to_key_string(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            _ => None,
        }
    }
}

impl TryFrom<serde_json::Value> for FieldValue {
    type Error = RecordError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        FieldValue::from_json("<value>", value)
    }
}

impl From<FieldValue> for serde_json::Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Integer(i) => serde_json::Value::from(i),
            FieldValue::Real(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Text(s) => serde_json::Value::String(s),
            FieldValue::Bool(b) => serde_json::Value::Bool(b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Real(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}
