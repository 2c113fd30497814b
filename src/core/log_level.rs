//! Log level definitions
//!
//! Levels are backed by signed integers with gaps between them so that
//! handlers can synthesize intermediate severities. Only the five named
//! levels have display names; anything else renders as `UNKNOWN`.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display name used for raw severities that are not a named level
pub const UNKNOWN_LEVEL_NAME: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[repr(i8)]
pub enum LogLevel {
    Trace = -8,
    Debug = -4,
    #[default]
    Info = 0,
    Warn = 4,
    Error = 8,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Raw integer value carried in the `level` attribute
    pub fn as_raw(&self) -> i64 {
        *self as i8 as i64
    }

    pub fn from_raw(raw: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_raw() == raw)
    }

    /// Display name for a raw severity value
    ///
    /// # Example
    ///
    /// ```
    /// use structured_logger_system::LogLevel;
    ///
    /// assert_eq!(LogLevel::name_of(4), "WARN");
    /// assert_eq!(LogLevel::name_of(3), "UNKNOWN");
    /// ```
    pub fn name_of(raw: i64) -> &'static str {
        Self::from_raw(raw)
            .map(|level| level.to_str())
            .unwrap_or(UNKNOWN_LEVEL_NAME)
    }

    /// Parse a level name, falling back to `Error` for anything unrecognized
    ///
    /// Unknown input resolves to the loudest level rather than silently
    /// enabling verbose output. Use `str::parse` for a strict variant.
    pub fn parse_lenient(name: &str) -> Self {
        name.parse().unwrap_or(LogLevel::Error)
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}
