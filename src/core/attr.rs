//! Key-value attributes attached to log records
//!
//! This module provides:
//! - `FieldValue`: scalar value of an attribute
//! - `Attr`: an ordered key/value pair
//! - `ScopedAttr`: an attribute together with the group path it was recorded under

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Attribute keys reserved by the logger
pub mod keys {
    pub const TIME: &str = "time";
    pub const LEVEL: &str = "level";
    pub const SOURCE: &str = "source";
    pub const MESSAGE: &str = "msg";
    pub const ERROR: &str = "error";
}

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Null,
    /// Severity of the record itself, emitted only by handlers
    ///
    /// Encodes as the raw integer unless a hook renames it.
    #[serde(serialize_with = "serialize_raw_level", skip_deserializing)]
    Level(LogLevel),
}

fn serialize_raw_level<S: Serializer>(level: &LogLevel, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(level.as_raw())
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
            FieldValue::Level(level) => write!(f, "{}", level.as_raw()),
        }
    }
}

impl FieldValue {
    /// Capture any `Debug` value as a string
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        FieldValue::String(format!("{:?}", value))
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Uint(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Level(level) => serde_json::Value::Number(level.as_raw().into()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::Uint(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// A single key/value attribute
///
/// Lists of attributes keep insertion order and are never deduplicated;
/// how repeated keys are rendered is up to the handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    pub key: String,
    pub value: FieldValue,
}

impl Attr {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Attribute holding an error's display text
    pub fn error(key: impl Into<String>, err: &dyn std::error::Error) -> Self {
        Self::new(key, err.to_string())
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> From<(K, V)> for Attr {
    fn from((key, value): (K, V)) -> Self {
        Attr::new(key, value)
    }
}

/// Shorthand for [`Attr::new`]
///
/// # Example
///
/// ```
/// use structured_logger_system::{attr, FieldValue};
///
/// let a = attr("user_id", 42);
/// assert_eq!(a.key, "user_id");
/// assert_eq!(a.value, FieldValue::Int(42));
/// ```
pub fn attr<K, V>(key: K, value: V) -> Attr
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    Attr::new(key, value)
}

/// An attribute qualified by the groups that were open when it was added
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedAttr {
    pub groups: Arc<[String]>,
    pub attr: Attr,
}

impl ScopedAttr {
    pub fn new(groups: Arc<[String]>, attr: Attr) -> Self {
        Self { groups, attr }
    }

    /// Attribute outside of any group
    pub fn top_level(attr: Attr) -> Self {
        Self {
            groups: Arc::from(Vec::<String>::new()),
            attr,
        }
    }

    /// Dotted key used by flat encodings (`group.sub.key`)
    pub fn qualified_key(&self) -> String {
        if self.groups.is_empty() {
            return self.attr.key.clone();
        }
        let mut key = self.groups.join(".");
        key.push('.');
        key.push_str(&self.attr.key);
        key
    }
}
