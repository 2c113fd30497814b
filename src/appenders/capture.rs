//! In-memory handler for asserting on emitted records in tests

use crate::core::{
    attr::{keys, FieldValue, ScopedAttr},
    Handler, HandlerOptions, LogLevel, Record, Result,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// A record after attribute replacement, as a handler would encode it
#[derive(Debug, Clone)]
pub struct CapturedRecord {
    pub level: LogLevel,
    pub attrs: Vec<ScopedAttr>,
}

impl CapturedRecord {
    /// Last value for a dotted key such as `msg` or `request.id`
    pub fn get(&self, qualified_key: &str) -> Option<&FieldValue> {
        self.attrs
            .iter()
            .rev()
            .find(|scoped| scoped.qualified_key() == qualified_key)
            .map(|scoped| &scoped.attr.value)
    }

    pub fn message(&self) -> Option<&str> {
        self.get(keys::MESSAGE).and_then(FieldValue::as_str)
    }

    pub fn source(&self) -> Option<&str> {
        self.get(keys::SOURCE).and_then(FieldValue::as_str)
    }

    /// Record attributes in order, without the built-ins
    pub fn user_attrs(&self) -> Vec<(String, FieldValue)> {
        self.attrs
            .iter()
            .filter(|scoped| {
                !(scoped.groups.is_empty()
                    && matches!(
                        scoped.attr.key.as_str(),
                        keys::TIME | keys::LEVEL | keys::SOURCE | keys::MESSAGE
                    ))
            })
            .map(|scoped| (scoped.qualified_key(), scoped.attr.value.clone()))
            .collect()
    }
}

/// Read side of a [`CaptureHandler`]
#[derive(Debug, Clone, Default)]
pub struct Capture {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl Capture {
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

/// Handler that keeps resolved records in memory
pub struct CaptureHandler {
    options: HandlerOptions,
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl CaptureHandler {
    pub fn new(options: HandlerOptions) -> (Self, Capture) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let handler = Self {
            options,
            records: Arc::clone(&records),
        };
        (handler, Capture { records })
    }
}

impl Handler for CaptureHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        self.options.enabled(level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        let attrs = self.options.resolve(record);
        self.records.lock().push(CapturedRecord {
            level: record.level,
            attrs,
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "capture"
    }
}
