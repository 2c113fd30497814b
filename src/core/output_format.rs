//! Output format configuration for log records
//!
//! Provides the two encodings handlers can write:
//! - Text: logfmt-style `key=value` pairs, one record per line (default)
//! - Json: one JSON object per line
//!
//! Both work on attributes that already went through the replacement hook.

use super::attr::{FieldValue, ScopedAttr};
use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable logfmt format
    ///
    /// Example: `time=2025-01-08T10:30:45.120Z level=INFO msg="Request processed" user.id=7`
    #[default]
    Text,

    /// JSON format for machine processing; groups become nested objects
    ///
    /// Example: `{"time":"2025-01-08T10:30:45.120Z","level":"INFO","msg":"Request processed","user":{"id":7}}`
    Json,
}

impl OutputFormat {
    /// Encode resolved attributes as a single line (without the newline)
    pub fn encode(&self, attrs: &[ScopedAttr]) -> String {
        match self {
            OutputFormat::Text => self.format_text(attrs),
            OutputFormat::Json => self.format_json(attrs),
        }
    }

    fn format_json(&self, attrs: &[ScopedAttr]) -> String {
        let mut root = Map::new();

        for scoped in attrs {
            let mut target = &mut root;
            for group in scoped.groups.iter() {
                target = Self::child_object(target, group);
            }
            target.insert(scoped.attr.key.clone(), scoped.attr.value.to_json_value());
        }

        serde_json::to_string(&Value::Object(root)).unwrap_or_default()
    }

    fn child_object<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
        let slot = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(child) => child,
            _ => unreachable!("group slot is always an object"),
        }
    }

    fn format_text(&self, attrs: &[ScopedAttr]) -> String {
        Self::format_text_with(attrs, |scoped| Self::format_text_value(&scoped.attr.value))
    }

    /// logfmt line with a caller-supplied renderer for values
    pub(crate) fn format_text_with<F>(attrs: &[ScopedAttr], render: F) -> String
    where
        F: Fn(&ScopedAttr) -> String,
    {
        attrs
            .iter()
            .map(|scoped| {
                format!(
                    "{}={}",
                    Self::escape_logfmt_key(&scoped.qualified_key()),
                    render(scoped)
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn format_text_value(value: &FieldValue) -> String {
        match value {
            FieldValue::String(s) => Self::escape_logfmt_value(s),
            other => other.to_string(),
        }
    }

    /// Escape a logfmt key (remove spaces and special chars)
    fn escape_logfmt_key(key: &str) -> String {
        key.chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
            .collect()
    }

    /// Escape a logfmt value (quote if contains spaces or control characters)
    fn escape_logfmt_value(value: &str) -> String {
        let needs_quotes = value.is_empty()
            || value
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=');
        if needs_quotes {
            Self::quote_logfmt_value(value)
        } else {
            value.to_string()
        }
    }

    /// Quote a logfmt value, escaping anything that would break the line
    fn quote_logfmt_value(value: &str) -> String {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('"');
        for c in value.chars() {
            match c {
                '\\' => quoted.push_str("\\\\"),
                '"' => quoted.push_str("\\\""),
                '\n' => quoted.push_str("\\n"),
                '\r' => quoted.push_str("\\r"),
                '\t' => quoted.push_str("\\t"),
                c if c.is_control() => quoted.push_str(&c.escape_unicode().to_string()),
                c => quoted.push(c),
            }
        }
        quoted.push('"');
        quoted
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(LoggerError::invalid_format(s)),
        }
    }
}
