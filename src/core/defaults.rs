//! Process-wide default logger and errorer
//!
//! Code that does not pass a [`Logger`] around logs through these. They are
//! meant to be initialized once at startup, before other threads start
//! logging; later reads always see the last initialization.
//!
//! Until initialized, the default logger writes text to stderr at `Info` and
//! the default errorer falls back to the default logger.

use super::config::LoggerConfig;
use super::error::Result;
use super::handler::HandlerOptions;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::output_format::OutputFormat;
use super::replace::source_replacer;
use crate::appenders::StreamHandler;
use parking_lot::RwLock;
use std::sync::LazyLock;

struct Defaults {
    logger: Logger,
    options: HandlerOptions,
    errorer: Option<Logger>,
}

impl Defaults {
    fn initial() -> Self {
        let options = standard_options(LogLevel::Info);
        Self {
            logger: Logger::new(StreamHandler::stderr(OutputFormat::Text, options.clone())),
            options,
            errorer: None,
        }
    }
}

static DEFAULTS: LazyLock<RwLock<Defaults>> = LazyLock::new(|| RwLock::new(Defaults::initial()));

/// Options the default logger uses: source attribution with stack resolution
pub fn standard_options(level: LogLevel) -> HandlerOptions {
    HandlerOptions::new(level)
        .with_source(true)
        .with_replace_attr(source_replacer())
}

/// Replace the default logger with a stdout logger at `min_level`
///
/// Unrecognized level names fall back to `ERROR`.
pub fn init_default(min_level: &str, format: OutputFormat) {
    let options = standard_options(LogLevel::parse_lenient(min_level));
    let logger = Logger::new(StreamHandler::stdout(format, options.clone()));
    set_default(logger, options);
}

/// Initialize the default logger from configuration
///
/// Unlike [`init_default`], an unknown level name is an error here.
pub fn init_from_config(config: &LoggerConfig) -> Result<()> {
    config.validate()?;
    let options = config.handler_options()?;
    let logger = Logger::new(StreamHandler::stdout(config.format, options.clone()));
    set_default(logger, options);
    Ok(())
}

/// Install an arbitrary logger as the default
///
/// `options` is what [`logger_from_default`] inherits the minimum level from.
pub fn set_default(logger: Logger, options: HandlerOptions) {
    let mut defaults = DEFAULTS.write();
    defaults.logger = logger;
    defaults.options = options;
}

pub fn default_logger() -> Logger {
    DEFAULTS.read().logger.clone()
}

/// Minimum level of the current default logger
pub fn default_level() -> LogLevel {
    DEFAULTS.read().options.level
}

/// Build a stdout logger sharing the default's minimum level
///
/// Everything else in `options` is kept as given.
pub fn logger_from_default(mut options: HandlerOptions, format: OutputFormat) -> Logger {
    options.level = default_level();
    Logger::new(StreamHandler::stdout(format, options))
}

/// Set up the logger used by the `err_*` functions
pub fn init_default_errorer(format: OutputFormat) {
    let options = HandlerOptions::default()
        .with_source(true)
        .with_replace_attr(source_replacer());
    set_default_errorer(logger_from_default(options, format));
}

pub fn set_default_errorer(logger: Logger) {
    DEFAULTS.write().errorer = Some(logger);
}

pub fn default_errorer() -> Logger {
    let defaults = DEFAULTS.read();
    defaults
        .errorer
        .clone()
        .unwrap_or_else(|| defaults.logger.clone())
}
