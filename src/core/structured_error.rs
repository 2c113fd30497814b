//! Errors that carry structured attributes to the eventual log call
//!
//! An [`Errorer`] wraps errors with a fixed set of attributes as they travel
//! up the call stack. Each layer's attributes come before the ones already
//! carried by the error it wraps. The error-logging entry points flatten the
//! attributes into the record when the error is finally logged.

use super::attr::{keys, Attr};
use super::defaults::default_errorer;
use super::log_level::LogLevel;
use parking_lot::RwLock;
use std::error::Error;
use std::fmt;
use std::sync::LazyLock;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Capability of exposing structured attributes
///
/// Implement this on your own error type and call
/// [`register_attr_source`] to have its attributes picked up by
/// [`Errorer::wrap`] and the error-logging functions.
pub trait AttrSource {
    fn attrs(&self) -> &[Attr];
}

type AttrExtractor = for<'a> fn(&'a (dyn Error + 'static)) -> Option<&'a [Attr]>;

static EXTRACTORS: LazyLock<RwLock<Vec<AttrExtractor>>> =
    LazyLock::new(|| RwLock::new(Vec::new()));

fn extract<'a, T>(err: &'a (dyn Error + 'static)) -> Option<&'a [Attr]>
where
    T: AttrSource + Error + 'static,
{
    err.downcast_ref::<T>().map(AttrSource::attrs)
}

/// Register a third-party error type as an attribute carrier
///
/// Registration is process-wide and idempotent.
pub fn register_attr_source<T>()
where
    T: AttrSource + Error + 'static,
{
    let extractor: AttrExtractor = extract::<T>;
    let mut extractors = EXTRACTORS.write();
    if !extractors.iter().any(|known| *known as usize == extractor as usize) {
        extractors.push(extractor);
    }
}

/// Attributes carried by this exact error value, ignoring its sources
pub fn attrs_of(err: &(dyn Error + 'static)) -> Option<Vec<Attr>> {
    if let Some(attrs) = extract::<StructuredError>(err) {
        return Some(attrs.to_vec());
    }
    EXTRACTORS
        .read()
        .iter()
        .find_map(|extractor| extractor(err))
        .map(<[Attr]>::to_vec)
}

/// Attributes of the first carrier found walking `err` and its sources
pub fn find_attrs(err: &(dyn Error + 'static)) -> Option<Vec<Attr>> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(attrs) = attrs_of(e) {
            return Some(attrs);
        }
        current = e.source();
    }
    None
}

/// An error paired with an ordered list of attributes
///
/// `Display` is the cause's message, unchanged: attributes only show up when
/// the error is logged. `source()` returns the cause.
#[derive(Debug)]
pub struct StructuredError {
    cause: BoxError,
    attrs: Vec<Attr>,
}

impl StructuredError {
    pub fn new<E>(cause: E, attrs: Vec<Attr>) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            cause: cause.into(),
            attrs,
        }
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.cause
    }

    pub fn into_parts(self) -> (BoxError, Vec<Attr>) {
        (self.cause, self.attrs)
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.cause, f)
    }
}

impl Error for StructuredError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.cause)
    }
}

impl AttrSource for StructuredError {
    fn attrs(&self) -> &[Attr] {
        &self.attrs
    }
}

/// Reusable binder of default attributes for error wrapping
///
/// # Example
///
/// ```
/// use structured_logger_system::{attr, Errorer, StructuredError};
///
/// let storage = Errorer::new(vec![attr("component", "storage")]);
/// let inner = StructuredError::new("disk full", vec![attr("path", "/var/data")]);
///
/// let wrapped = storage.wrap(inner, &[]);
/// assert_eq!(wrapped.to_string(), "disk full");
/// assert_eq!(wrapped.attrs()[0], attr("component", "storage"));
/// assert_eq!(wrapped.attrs()[1], attr("path", "/var/data"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Errorer {
    attrs: Vec<Attr>,
}

impl Errorer {
    pub fn new(attrs: Vec<Attr>) -> Self {
        Self { attrs }
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Wrap `err`, accumulating attributes already carried along its chain
    ///
    /// The result carries `self.attrs`, then `additional`, then whatever the
    /// first carrier in `err`'s chain holds.
    pub fn wrap<E>(&self, err: E, additional: &[Attr]) -> StructuredError
    where
        E: Into<BoxError>,
    {
        let cause: BoxError = err.into();
        let found = find_attrs(&*cause).unwrap_or_default();

        let mut attrs = Vec::with_capacity(self.attrs.len() + additional.len() + found.len());
        attrs.extend_from_slice(&self.attrs);
        attrs.extend_from_slice(additional);
        attrs.extend(found);
        StructuredError::new(cause, attrs)
    }

    /// [`wrap`](Self::wrap) the error side of a result; `Ok` passes through untouched
    pub fn bind<T, E>(&self, result: Result<T, E>, additional: &[Attr]) -> Result<T, StructuredError>
    where
        E: Into<BoxError>,
    {
        result.map_err(|err| self.wrap(err, additional))
    }

    pub fn bind_opt<E>(&self, err: Option<E>, additional: &[Attr]) -> Option<StructuredError>
    where
        E: Into<BoxError>,
    {
        err.map(|err| self.wrap(err, additional))
    }
}

/// Attribute list for logging `err`
///
/// `error` first, then `additional`, then the attributes carried by `err`
/// itself. Only `err` is inspected, not its sources: a carrier buried in the
/// chain is not surfaced here, unlike [`Errorer::wrap`].
pub fn error_attrs(err: &(dyn Error + 'static), additional: &[Attr]) -> Vec<Attr> {
    let carried = attrs_of(err).unwrap_or_default();
    let mut attrs = Vec::with_capacity(1 + additional.len() + carried.len());
    attrs.push(Attr::new(keys::ERROR, err.to_string()));
    attrs.extend_from_slice(additional);
    attrs.extend(carried);
    attrs
}

/// Log `err` through the default errorer
#[track_caller]
pub fn log_error(level: LogLevel, message: &str, err: &(dyn Error + 'static), additional: &[Attr]) {
    let errorer = default_errorer();
    if !errorer.enabled(level) {
        return;
    }
    errorer.log(level, message, &error_attrs(err, additional));
}

#[track_caller]
pub fn err_trace(message: &str, err: &(dyn Error + 'static), additional: &[Attr]) {
    log_error(LogLevel::Trace, message, err, additional);
}

#[track_caller]
pub fn err_debug(message: &str, err: &(dyn Error + 'static), additional: &[Attr]) {
    log_error(LogLevel::Debug, message, err, additional);
}

#[track_caller]
pub fn err_info(message: &str, err: &(dyn Error + 'static), additional: &[Attr]) {
    log_error(LogLevel::Info, message, err, additional);
}

#[track_caller]
pub fn err_warn(message: &str, err: &(dyn Error + 'static), additional: &[Attr]) {
    log_error(LogLevel::Warn, message, err, additional);
}

#[track_caller]
pub fn err_error(message: &str, err: &(dyn Error + 'static), additional: &[Attr]) {
    log_error(LogLevel::Error, message, err, additional);
}
