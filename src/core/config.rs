//! Logger configuration and builder

use super::attr::Attr;
use super::error::{LoggerError, Result};
use super::handler::{Handler, HandlerOptions};
use super::log_level::LogLevel;
use super::logger::Logger;
use super::output_format::OutputFormat;
use super::replace::{source_replacer, ReplaceAttrFn};
use crate::appenders::StreamHandler;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;

/// Serializable logger settings
///
/// # Example
///
/// ```
/// use structured_logger_system::{LoggerConfig, LogLevel, OutputFormat};
///
/// let config = LoggerConfig::from_json(r#"{"level": "debug", "format": "json"}"#).unwrap();
/// assert_eq!(config.min_level().unwrap(), LogLevel::Debug);
/// assert_eq!(config.format, OutputFormat::Json);
/// assert!(config.add_source);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Level name, case-insensitive
    pub level: String,
    pub format: OutputFormat,
    pub add_source: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info.to_str().to_string(),
            format: OutputFormat::Text,
            add_source: true,
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn min_level(&self) -> Result<LogLevel> {
        self.level.parse()
    }

    pub fn validate(&self) -> Result<()> {
        self.min_level().map(|_| ()).map_err(|_| {
            LoggerError::config(
                "LoggerConfig",
                format!("level '{}' is not recognized", self.level),
            )
        })
    }

    /// Options with stack-resolved sources when `add_source` is set
    pub fn handler_options(&self) -> Result<HandlerOptions> {
        let options = HandlerOptions::new(self.min_level()?).with_source(self.add_source);
        Ok(options.with_replace_attr(source_replacer()))
    }
}

enum Target {
    Stdout,
    Stderr,
    Writer(Box<dyn Write + Send>),
    Handler(Arc<dyn Handler>),
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use structured_logger_system::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .format(OutputFormat::Json)
///     .stderr()
///     .attrs(&[attr("service", "billing")])
///     .build();
/// logger.debug("ready", &[]);
/// ```
pub struct LoggerBuilder {
    options: HandlerOptions,
    format: OutputFormat,
    colors: bool,
    target: Target,
    attrs: Vec<Attr>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults: `Info`, text to stdout, stack-resolved `source`.
    pub fn new() -> Self {
        Self {
            options: HandlerOptions::new(LogLevel::Info)
                .with_source(true)
                .with_replace_attr(source_replacer()),
            format: OutputFormat::Text,
            colors: false,
            target: Target::Stdout,
            attrs: Vec::new(),
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.options.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn add_source(mut self, add_source: bool) -> Self {
        self.options.add_source = add_source;
        self
    }

    /// Replace the attribute hook (default: [`replace_source`](crate::core::replace::replace_source))
    #[must_use = "builder methods return a new value"]
    pub fn replace_attr(mut self, hook: ReplaceAttrFn) -> Self {
        self.options.replace_attr = Some(hook);
        self
    }

    /// Colour the level in text output
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stdout(mut self) -> Self {
        self.target = Target::Stdout;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stderr(mut self) -> Self {
        self.target = Target::Stderr;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.target = Target::Writer(Box::new(writer));
        self
    }

    /// Use a custom handler; format, colour and option settings are ignored
    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.target = Target::Handler(Arc::new(handler));
        self
    }

    /// Attributes bound to every record
    #[must_use = "builder methods return a new value"]
    pub fn attrs(mut self, attrs: &[Attr]) -> Self {
        self.attrs.extend_from_slice(attrs);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let handler: Arc<dyn Handler> = match self.target {
            Target::Handler(handler) => handler,
            target => {
                let stream = match target {
                    Target::Stderr => StreamHandler::stderr(self.format, self.options),
                    Target::Writer(writer) => StreamHandler::boxed(writer, self.format, self.options),
                    _ => StreamHandler::stdout(self.format, self.options),
                };
                Arc::new(stream.with_colors(self.colors))
            }
        };

        let logger = Logger::from_handler(handler);
        if self.attrs.is_empty() {
            logger
        } else {
            logger.with(&self.attrs)
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use structured_logger_system::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attr::attr;
    use parking_lot::Mutex;
    use std::io;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = LoggerConfig::from_json("{}").unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.min_level().unwrap(), LogLevel::Info);
    }

    #[test]
    fn test_config_rejects_unknown_level() {
        let config = LoggerConfig {
            level: "loud".to_string(),
            ..LoggerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_config_rejects_unknown_format() {
        let err = LoggerConfig::from_json(r#"{"format": "xml"}"#).unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }

    #[test]
    fn test_config_handler_options() {
        let config = LoggerConfig {
            level: "trace".to_string(),
            add_source: false,
            ..LoggerConfig::default()
        };
        let options = config.handler_options().unwrap();
        assert_eq!(options.level, LogLevel::Trace);
        assert!(!options.add_source);
        assert!(options.replace_attr.is_some());
    }

    #[test]
    fn test_builder_writer_json() {
        let buffer = SharedBuffer::default();
        let logger = Logger::builder()
            .min_level(LogLevel::Debug)
            .format(OutputFormat::Json)
            .add_source(false)
            .writer(buffer.clone())
            .attrs(&[attr("service", "api")])
            .build();

        logger.debug("started", &[attr("port", 8080)]);
        logger.trace("hidden", &[]);

        let output = buffer.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["level"], "DEBUG");
        assert_eq!(parsed["msg"], "started");
        assert_eq!(parsed["service"], "api");
        assert_eq!(parsed["port"], 8080);
        assert!(parsed.get("source").is_none());
    }

    #[test]
    fn test_builder_default() {
        let logger = LoggerBuilder::default().build();
        assert!(logger.enabled(LogLevel::Info));
        assert!(!logger.enabled(LogLevel::Debug));
    }
}
