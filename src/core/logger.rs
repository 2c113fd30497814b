//! Main logger implementation

use super::{
    attr::{Attr, ScopedAttr},
    error::Result,
    handler::Handler,
    log_level::LogLevel,
    record::Record,
    structured_error::error_attrs,
};
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Cheap-to-clone logging facade over a single [`Handler`]
///
/// `with` and `with_group` return derived loggers; the receiver is never
/// modified, so a logger can be shared freely across threads.
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
    attrs: Arc<[ScopedAttr]>,
    groups: Arc<[String]>,
}

impl Logger {
    #[must_use]
    pub fn new<H: Handler + 'static>(handler: H) -> Self {
        Self::from_handler(Arc::new(handler))
    }

    #[must_use]
    pub fn from_handler(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            attrs: Arc::from(Vec::new()),
            groups: Arc::from(Vec::new()),
        }
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Attributes included on every record of this logger
    pub fn bound_attrs(&self) -> &[ScopedAttr] {
        &self.attrs
    }

    /// Derive a logger that adds `attrs` to every record
    ///
    /// # Example
    ///
    /// ```
    /// use structured_logger_system::prelude::*;
    ///
    /// let (handler, capture) = CaptureHandler::new(HandlerOptions::default());
    /// let base = Logger::new(handler);
    /// let request = base.with(&[attr("request_id", "abc-123")]);
    ///
    /// request.info("handled", &[]);
    /// base.info("unrelated", &[]);
    ///
    /// let records = capture.records();
    /// assert!(records[0].get("request_id").is_some());
    /// assert!(records[1].get("request_id").is_none());
    /// ```
    #[must_use]
    pub fn with(&self, attrs: &[Attr]) -> Logger {
        let mut bound = Vec::with_capacity(self.attrs.len() + attrs.len());
        bound.extend(self.attrs.iter().cloned());
        bound.extend(self.scope(attrs));
        Logger {
            handler: Arc::clone(&self.handler),
            attrs: Arc::from(bound),
            groups: Arc::clone(&self.groups),
        }
    }

    /// Derive a logger whose later attributes are nested under `name`
    ///
    /// Attributes bound before the group keep their original path.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Logger {
        let mut groups = self.groups.to_vec();
        groups.push(name.into());
        Logger {
            handler: Arc::clone(&self.handler),
            attrs: Arc::clone(&self.attrs),
            groups: Arc::from(groups),
        }
    }

    fn scope<'a>(&'a self, attrs: &'a [Attr]) -> impl Iterator<Item = ScopedAttr> + 'a {
        attrs
            .iter()
            .map(move |attr| ScopedAttr::new(Arc::clone(&self.groups), attr.clone()))
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.handler.enabled(level)
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>, attrs: &[Attr]) {
        if !self.handler.enabled(level) {
            return;
        }

        let message = message.into();
        let mut all = Vec::with_capacity(self.attrs.len() + attrs.len());
        all.extend(self.attrs.iter().cloned());
        all.extend(self.scope(attrs));

        let record = Record::new(level, &message)
            .with_caller(Location::caller())
            .with_attrs(all);
        self.dispatch(&record);
    }

    /// Hand a record to the handler with panic isolation
    ///
    /// A failing handler must never take the calling code down with it.
    fn dispatch(&self, record: &Record) {
        let handler = &self.handler;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            handler.handle(record)
        }));

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Handler '{}' failed: {}", handler.name(), e);
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Handler '{}' panicked: {}",
                    handler.name(),
                    panic_msg
                );
            }
        }
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(LogLevel::Trace, message, attrs);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(LogLevel::Debug, message, attrs);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(LogLevel::Info, message, attrs);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(LogLevel::Warn, message, attrs);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>, attrs: &[Attr]) {
        self.log(LogLevel::Error, message, attrs);
    }

    /// Log an error together with the attributes it carries
    ///
    /// Same assembly as [`log_error`](crate::core::structured_error::log_error),
    /// emitted through this logger instead of the process default.
    #[track_caller]
    pub fn log_error(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        err: &(dyn Error + 'static),
        additional: &[Attr],
    ) {
        if !self.handler.enabled(level) {
            return;
        }
        self.log(level, message, &error_attrs(err, additional));
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("handler", &self.handler.name())
            .field("attrs", &self.attrs)
            .field("groups", &self.groups)
            .finish()
    }
}
