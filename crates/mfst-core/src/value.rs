//! # Scalar Values
//!
//! Leaf values of a document tree. Three scalar types exist: strings,
//! integers, and booleans. Floats are deliberately absent; manifests carry
//! quantities as strings or integers, which keeps rendering deterministic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The declared type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// UTF-8 string.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// Boolean.
    Boolean,
}

impl ScalarType {
    /// Returns the type name used in diagnostics and schema descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A present scalar value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    Str(String),
}

impl Scalar {
    /// The type of this scalar.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Bool(_) => ScalarType::Boolean,
            Self::Int(_) => ScalarType::Integer,
            Self::Str(_) => ScalarType::String,
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON value into a scalar of the expected type.
    ///
    /// Returns `None` on a type mismatch. Integers must fit in `i64`; a
    /// JSON number with a fractional part is never an integer.
    pub fn from_json(value: &Value, expected: ScalarType) -> Option<Self> {
        match (expected, value) {
            (ScalarType::String, Value::String(s)) => Some(Self::Str(s.clone())),
            (ScalarType::Integer, Value::Number(n)) => n.as_i64().map(Self::Int),
            (ScalarType::Boolean, Value::Bool(b)) => Some(Self::Bool(*b)),
            _ => None,
        }
    }

    /// Convert to a JSON value for rendering.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Str(s) => Value::String(s.clone()),
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Describe the JSON type of a value, for type-mismatch messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(n) if n.is_u64() => "integer out of range",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
