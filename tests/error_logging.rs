//! Error logging through the process-wide default errorer
//!
//! These tests swap the global errorer, so they hold a lock for their whole
//! duration.

use parking_lot::Mutex;
use std::error::Error;
use std::fmt;
use std::io;
use structured_logger_system::prelude::*;
use structured_logger_system::{
    default_errorer, init_default_errorer, level_replacer, log_error, register_attr_source,
    set_default,
    set_default_errorer, AttrSource, Capture, FieldValue,
};

static GLOBALS: Mutex<()> = Mutex::new(());

fn capture_errorer(level: LogLevel) -> Capture {
    let (handler, capture) = CaptureHandler::new(standard_options(level));
    set_default_errorer(Logger::new(handler));
    capture
}

fn keys_of(capture: &Capture, index: usize) -> Vec<String> {
    capture.records()[index]
        .user_attrs()
        .into_iter()
        .map(|(key, _)| key)
        .collect()
}

/// Error type that hides a carrier behind its `source()`
#[derive(Debug)]
struct RequestFailed {
    inner: StructuredError,
}

impl fmt::Display for RequestFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request failed: {}", self.inner)
    }
}

impl Error for RequestFailed {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.inner)
    }
}

#[test]
fn test_err_warn_attribute_order_and_source() {
    let _guard = GLOBALS.lock();
    let capture = capture_errorer(LogLevel::Trace);

    let err = Errorer::new(vec![attr("k1", "v1")]).wrap(
        io::Error::new(io::ErrorKind::NotFound, "file missing"),
        &[],
    );

    let line = line!() + 1;
    err_warn("load failed", &err, &[attr("extra", "x")]);

    let record = &capture.records()[0];
    assert_eq!(record.level, LogLevel::Warn);
    assert_eq!(record.message(), Some("load failed"));
    assert_eq!(record.get("level"), Some(&FieldValue::from("WARN")));
    assert_eq!(
        record.user_attrs(),
        vec![
            ("error".to_string(), FieldValue::from("file missing")),
            ("extra".to_string(), FieldValue::from("x")),
            ("k1".to_string(), FieldValue::from("v1")),
        ]
    );

    let source = record.source().expect("source resolved");
    assert!(
        source.ends_with(&format!("error_logging.rs:{}", line)),
        "got {}",
        source
    );
}

#[test]
fn test_caller_location_without_stack_walk_points_at_call_site() {
    let _guard = GLOBALS.lock();
    let options = HandlerOptions::new(LogLevel::Trace)
        .with_source(true)
        .with_replace_attr(level_replacer());
    let (handler, capture) = CaptureHandler::new(options);
    set_default_errorer(Logger::new(handler));
    let err = io::Error::new(io::ErrorKind::Other, "boom");

    let first = line!() + 1;
    err_trace("t", &err, &[]);
    err_debug("d", &err, &[]);
    err_info("i", &err, &[]);
    err_warn("w", &err, &[]);
    err_error("e", &err, &[]);
    log_error(LogLevel::Info, "direct", &err, &[]);

    assert_eq!(capture.len(), 6);
    for (offset, record) in capture.records().iter().enumerate() {
        let source = record.source().expect("caller location present");
        let expected = format!("error_logging.rs:{}", first + offset as u32);
        assert!(source.ends_with(&expected), "expected {}, got {}", expected, source);
    }
}

#[test]
fn test_each_entry_point_uses_its_level() {
    let _guard = GLOBALS.lock();
    let capture = capture_errorer(LogLevel::Trace);
    let err = io::Error::new(io::ErrorKind::Other, "boom");

    err_trace("t", &err, &[]);
    err_debug("d", &err, &[]);
    err_info("i", &err, &[]);
    err_warn("w", &err, &[]);
    err_error("e", &err, &[]);
    log_error(LogLevel::Info, "direct", &err, &[]);

    let levels: Vec<LogLevel> = capture.records().iter().map(|r| r.level).collect();
    assert_eq!(
        levels,
        vec![
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Info,
        ]
    );
}

#[test]
fn test_entry_points_respect_errorer_level() {
    let _guard = GLOBALS.lock();
    let capture = capture_errorer(LogLevel::Warn);
    let err = io::Error::new(io::ErrorKind::Other, "boom");

    err_trace("t", &err, &[]);
    err_debug("d", &err, &[]);
    err_info("i", &err, &[]);
    err_warn("w", &err, &[]);
    err_error("e", &err, &[]);

    assert_eq!(capture.len(), 2);
}

#[test]
fn test_plain_error_has_only_error_and_additional() {
    let _guard = GLOBALS.lock();
    let capture = capture_errorer(LogLevel::Info);

    let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
    err_error("write failed", &err, &[attr("path", "/etc/app.conf")]);

    assert_eq!(keys_of(&capture, 0), vec!["error", "path"]);
}

#[test]
fn test_carrier_nested_in_chain_is_not_surfaced() {
    let _guard = GLOBALS.lock();
    let capture = capture_errorer(LogLevel::Info);

    let carrier = Errorer::new(vec![attr("user", 7)]).wrap("token expired", &[]);
    let err = RequestFailed { inner: carrier };

    err_error("request failed", &err, &[]);
    assert_eq!(keys_of(&capture, 0), vec!["error"]);
    assert_eq!(
        capture.records()[0].get("error"),
        Some(&FieldValue::from("request failed: token expired"))
    );

    // Wrapping does search the chain, so rewrapping surfaces the attributes
    let rewrapped = Errorer::default().wrap(err, &[]);
    err_error("request failed", &rewrapped, &[]);
    assert_eq!(keys_of(&capture, 1), vec!["error", "user"]);
}

#[test]
fn test_layers_accumulate_outermost_first() {
    let _guard = GLOBALS.lock();
    let capture = capture_errorer(LogLevel::Info);

    let storage = Errorer::new(vec![attr("layer", "storage")]);
    let service = Errorer::new(vec![attr("layer", "service"), attr("op", "save")]);
    let api = Errorer::new(vec![attr("route", "/orders")]);

    let err = storage.wrap(io::Error::new(io::ErrorKind::Other, "disk full"), &[attr("bytes", 512)]);
    let err = service.wrap(err, &[]);
    let err = api.wrap(err, &[attr("status", 507)]);

    err_error("save failed", &err, &[]);

    assert_eq!(
        keys_of(&capture, 0),
        vec!["error", "route", "status", "layer", "op", "layer", "bytes"]
    );
    assert_eq!(capture.records()[0].get("error"), Some(&FieldValue::from("disk full")));
}

#[derive(Debug)]
struct HttpError {
    status: u16,
    attrs: Vec<Attr>,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http {}", self.status)
    }
}

impl Error for HttpError {}

impl AttrSource for HttpError {
    fn attrs(&self) -> &[Attr] {
        &self.attrs
    }
}

#[test]
fn test_registered_carrier_is_logged() {
    let _guard = GLOBALS.lock();
    register_attr_source::<HttpError>();
    let capture = capture_errorer(LogLevel::Info);

    let err = HttpError {
        status: 503,
        attrs: vec![attr("upstream", "payments")],
    };
    err_info("upstream unavailable", &err, &[attr("retry", true)]);

    let record = &capture.records()[0];
    assert_eq!(keys_of(&capture, 0), vec!["error", "retry", "upstream"]);
    assert_eq!(record.get("error"), Some(&FieldValue::from("http 503")));
}

#[test]
fn test_init_default_errorer_inherits_default_level() {
    let _guard = GLOBALS.lock();
    let (handler, _capture) = CaptureHandler::new(HandlerOptions::new(LogLevel::Warn));
    set_default(Logger::new(handler), HandlerOptions::new(LogLevel::Warn));

    init_default_errorer(OutputFormat::Json);

    let errorer = default_errorer();
    assert!(!errorer.enabled(LogLevel::Info));
    assert!(errorer.enabled(LogLevel::Warn));
    assert_eq!(errorer.handler().name(), "stdout");
}
