//! Core logger types and traits

pub mod attr;
pub mod config;
pub mod defaults;
pub mod error;
pub mod handler;
pub mod log_level;
pub mod logger;
pub mod output_format;
pub mod record;
pub mod replace;
pub mod source;
pub mod structured_error;

pub use attr::{attr, Attr, FieldValue, ScopedAttr};
pub use config::{LoggerBuilder, LoggerConfig};
pub use defaults::{
    default_errorer, default_level, default_logger, init_default, init_default_errorer,
    init_from_config, logger_from_default, set_default, set_default_errorer, standard_options,
};
pub use error::{LoggerError, Result};
pub use handler::{Handler, HandlerOptions};
pub use log_level::LogLevel;
pub use logger::Logger;
pub use output_format::OutputFormat;
pub use record::Record;
pub use replace::{level_replacer, replace_level, replace_source, source_replacer, ReplaceAttrFn};
pub use source::{default_resolver, set_default_resolver, Frame, FrameFilter, SourceResolver};
pub use structured_error::{
    attrs_of, err_debug, err_error, err_info, err_trace, err_warn, error_attrs, find_attrs,
    log_error, register_attr_source, AttrSource, Errorer, StructuredError,
};
