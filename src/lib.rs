//! # Structured Logger System
//!
//! A structured logging facade that attributes every record to the code that
//! actually issued it, and lets errors carry attributes up the call stack
//! until they are logged.
//!
//! ## Features
//!
//! - **Caller Attribution**: `source` is resolved by walking the stack past the logger's own frames
//! - **Structured Errors**: `Errorer` wraps errors with attributes that accumulate across layers
//! - **Immutable Loggers**: `with` / `with_group` derive new loggers, safe to share across threads
//! - **Pluggable Output**: any `Handler`; JSON and logfmt text handlers included
//!
//! ## Example
//!
//! ```
//! use structured_logger_system::prelude::*;
//!
//! let (handler, capture) = CaptureHandler::new(standard_options(LogLevel::Debug));
//! let logger = Logger::new(handler).with(&[attr("service", "billing")]);
//!
//! let db = Errorer::new(vec![attr("component", "db")]);
//! let err = db.wrap("connection reset", &[attr("attempt", 3)]);
//!
//! logger.log_error(LogLevel::Warn, "charge failed", &err, &[attr("invoice", 42)]);
//!
//! let record = &capture.records()[0];
//! assert_eq!(record.message(), Some("charge failed"));
//! assert_eq!(record.get("component"), Some(&FieldValue::from("db")));
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{Capture, CaptureHandler, StreamHandler};
    pub use crate::core::{
        attr, err_debug, err_error, err_info, err_trace, err_warn, standard_options, Attr,
        Errorer, FieldValue, FrameFilter, Handler, HandlerOptions, LogLevel, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, OutputFormat, Result, SourceResolver,
        StructuredError,
    };
}

pub use crate::appenders::{Capture, CaptureHandler, CapturedRecord, StreamHandler};
pub use crate::core::{
    attr, attrs_of, default_errorer, default_level, default_logger, default_resolver, err_debug,
    err_error, err_info, err_trace, err_warn, error_attrs, find_attrs, init_default,
    init_default_errorer, init_from_config, level_replacer, log_error, logger_from_default,
    register_attr_source, replace_level, replace_source, set_default, set_default_errorer,
    set_default_resolver, source_replacer, standard_options, Attr, AttrSource, Errorer,
    FieldValue, Frame, FrameFilter, Handler, HandlerOptions, LogLevel, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, OutputFormat, Record, ReplaceAttrFn, Result, ScopedAttr,
    SourceResolver, StructuredError,
};
