//! Handler trait for log output destinations

use super::attr::{keys, Attr, FieldValue, ScopedAttr};
use super::error::Result;
use super::log_level::LogLevel;
use super::record::Record;
use super::replace::ReplaceAttrFn;
use chrono::SecondsFormat;
use std::fmt;

/// Receives records from a [`Logger`](super::logger::Logger)
///
/// Implementations filter by level, run the configured replacement hook over
/// every attribute, and encode the result. Errors are reported by the logger
/// and never reach the code that issued the log call.
pub trait Handler: Send + Sync {
    fn enabled(&self, level: LogLevel) -> bool;
    fn handle(&self, record: &Record) -> Result<()>;
    fn flush(&self) -> Result<()> {
        Ok(())
    }
    fn name(&self) -> &str;
}

/// Options shared by the bundled handlers
#[derive(Clone)]
pub struct HandlerOptions {
    /// Records below this level are suppressed
    pub level: LogLevel,
    /// Emit a `source` attribute for every record
    pub add_source: bool,
    pub replace_attr: Option<ReplaceAttrFn>,
}

impl HandlerOptions {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            add_source: false,
            replace_attr: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_replace_attr(mut self, replace_attr: ReplaceAttrFn) -> Self {
        self.replace_attr = Some(replace_attr);
        self
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn replace(&self, groups: &[String], attr: Attr) -> Option<Attr> {
        match &self.replace_attr {
            Some(hook) => hook(groups, attr),
            None => Some(attr),
        }
    }

    /// Run built-in and record attributes through the replacement hook
    ///
    /// Built-ins come first, in the order `time`, `level`, `source`, `msg`,
    /// and are offered to the hook with an empty group path. Attributes the
    /// hook drops are left out.
    pub fn resolve(&self, record: &Record) -> Vec<ScopedAttr> {
        let mut builtins = Vec::with_capacity(4);
        builtins.push(Attr::new(
            keys::TIME,
            record.time.to_rfc3339_opts(SecondsFormat::Millis, true),
        ));
        builtins.push(Attr::new(keys::LEVEL, FieldValue::Level(record.level)));
        if self.add_source {
            let placeholder = record
                .caller_location()
                .map(FieldValue::String)
                .unwrap_or(FieldValue::Null);
            builtins.push(Attr::new(keys::SOURCE, placeholder));
        }
        builtins.push(Attr::new(keys::MESSAGE, record.message.as_str()));

        let mut resolved = Vec::with_capacity(builtins.len() + record.attrs.len());
        for attr in builtins {
            if let Some(attr) = self.replace(&[], attr) {
                resolved.push(ScopedAttr::top_level(attr));
            }
        }
        for scoped in &record.attrs {
            if let Some(attr) = self.replace(&scoped.groups, scoped.attr.clone()) {
                resolved.push(ScopedAttr::new(scoped.groups.clone(), attr));
            }
        }
        resolved
    }
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("replace_attr", &self.replace_attr.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attr::attr;
    use crate::core::replace::level_replacer;
    use std::sync::Arc;

    fn keys_of(resolved: &[ScopedAttr]) -> Vec<String> {
        resolved.iter().map(ScopedAttr::qualified_key).collect()
    }

    #[test]
    fn test_enabled_threshold() {
        let options = HandlerOptions::new(LogLevel::Warn);
        assert!(!options.enabled(LogLevel::Info));
        assert!(options.enabled(LogLevel::Warn));
        assert!(options.enabled(LogLevel::Error));
    }

    #[test]
    fn test_resolve_builtin_order() {
        let record = Record::new(LogLevel::Info, "hello")
            .with_attrs(vec![ScopedAttr::top_level(attr("k", 1))]);
        let resolved = HandlerOptions::default().resolve(&record);
        assert_eq!(keys_of(&resolved), vec!["time", "level", "msg", "k"]);
        // Without a hook the severity is left for the encoder
        assert_eq!(resolved[1].attr.value, FieldValue::Level(LogLevel::Info));
    }

    #[test]
    fn test_resolve_with_source_placeholder() {
        let record = Record::new(LogLevel::Info, "hello")
            .with_caller(std::panic::Location::caller());
        let resolved = HandlerOptions::default().with_source(true).resolve(&record);
        assert_eq!(keys_of(&resolved), vec!["time", "level", "source", "msg"]);
        assert!(resolved[2].attr.value.as_str().unwrap().contains("handler.rs"));
    }

    #[test]
    fn test_hook_can_drop_and_rename() {
        let hook: ReplaceAttrFn = Arc::new(|_groups: &[String], attr: Attr| {
            if attr.key == keys::TIME || attr.key == "secret" {
                None
            } else {
                Some(attr)
            }
        });
        let record = Record::new(LogLevel::Error, "m").with_attrs(vec![
            ScopedAttr::top_level(attr("secret", "hunter2")),
            ScopedAttr::top_level(attr("visible", true)),
        ]);
        let resolved = HandlerOptions::default().with_replace_attr(hook).resolve(&record);
        assert_eq!(keys_of(&resolved), vec!["level", "msg", "visible"]);
    }

    #[test]
    fn test_hook_sees_group_path() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let hook: ReplaceAttrFn = Arc::new(move |groups: &[String], attr: Attr| {
            seen_clone.lock().push((groups.to_vec(), attr.key.clone()));
            Some(attr)
        });
        let groups: Arc<[String]> = Arc::from(vec!["req".to_string()]);
        let record = Record::new(LogLevel::Info, "m")
            .with_attrs(vec![ScopedAttr::new(groups, attr("id", 9))]);
        HandlerOptions::default().with_replace_attr(hook).resolve(&record);

        let seen = seen.lock();
        assert!(seen.contains(&(Vec::new(), "level".to_string())));
        assert!(seen.contains(&(vec!["req".to_string()], "id".to_string())));
    }

    #[test]
    fn test_level_replacer_renders_name() {
        let record = Record::new(LogLevel::Trace, "m");
        let resolved = HandlerOptions::new(LogLevel::Trace)
            .with_replace_attr(level_replacer())
            .resolve(&record);
        assert_eq!(resolved[1].attr.value.as_str(), Some("TRACE"));
    }
}
