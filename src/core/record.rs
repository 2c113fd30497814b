//! Log record structure

use super::attr::ScopedAttr;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::panic::Location;

/// One log call, before the handler runs attribute replacement on it
#[derive(Debug, Clone)]
pub struct Record {
    pub time: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Immediate caller of the logger, used as the `source` placeholder
    pub caller: Option<&'static Location<'static>>,
    pub attrs: Vec<ScopedAttr>,
}

impl Record {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: &str) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: Self::sanitize_message(message),
            caller: None,
            attrs: Vec::new(),
        }
    }

    pub fn with_caller(mut self, caller: &'static Location<'static>) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_attrs(mut self, attrs: Vec<ScopedAttr>) -> Self {
        self.attrs = attrs;
        self
    }

    /// `file:line` of the immediate caller, if one was captured
    pub fn caller_location(&self) -> Option<String> {
        self.caller
            .map(|location| format!("{}:{}", location.file(), location.line()))
    }
}
