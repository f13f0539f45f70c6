//! Untyped property values as submitted on the write path

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::DataType;
use crate::error::{AutoSchemaError, AutoSchemaResult};

/// Property name to value mapping of an object or nested object
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A loosely-typed property value
///
/// Numbers decoded from JSON without committing to float or integer are kept
/// as [`PropertyValue::Number`] and resolved later by the configured default
/// number kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Numeric literal with unspecified precision
    Number(serde_json::Number),
    String(String),
    Array(Vec<PropertyValue>),
    Object(PropertyMap),
}

impl PropertyValue {
    /// Convert a JSON value, keeping numbers as unresolved literals
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(b),
            Value::Number(n) => PropertyValue::Number(n),
            Value::String(s) => PropertyValue::String(s),
            Value::Array(items) => {
                PropertyValue::Array(items.into_iter().map(PropertyValue::from_json).collect())
            }
            Value::Object(map) => PropertyValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, PropertyValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a JSON value, committing numbers to integer or float
    ///
    /// Unsigned integers beyond the signed 64-bit range have no typed
    /// representation and are rejected.
    pub fn try_from_json_typed(value: Value) -> AutoSchemaResult<Self> {
        let converted = match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PropertyValue::Int(i)
                } else if n.is_u64() {
                    return Err(AutoSchemaError::UnrecognizedType {
                        value: n.to_string(),
                        allowed: DataType::value_type_names(false),
                    });
                } else {
                    PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::Array(items) => PropertyValue::Array(
                items
                    .into_iter()
                    .map(PropertyValue::try_from_json_typed)
                    .collect::<AutoSchemaResult<_>>()?,
            ),
            Value::Object(map) => PropertyValue::Object(
                map.into_iter()
                    .map(|(k, v)| Ok((k, PropertyValue::try_from_json_typed(v)?)))
                    .collect::<AutoSchemaResult<_>>()?,
            ),
            other => PropertyValue::from_json(other),
        };
        Ok(converted)
    }

    /// Convert back to a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Null => Value::Null,
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Int(i) => Value::from(*i),
            PropertyValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropertyValue::Number(n) => Value::Number(n.clone()),
            PropertyValue::String(s) => Value::String(s.clone()),
            PropertyValue::Array(items) => {
                Value::Array(items.iter().map(PropertyValue::to_json).collect())
            }
            PropertyValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Get the mapping if this value is an object
    pub fn as_object(&self) -> Option<&PropertyMap> {
        match self {
            PropertyValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Get the items if this value is a sequence
    pub fn as_array(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get the string if this value is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::from_json(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Int(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(items: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(items)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(map: PropertyMap) -> Self {
        PropertyValue::Object(map)
    }
}
