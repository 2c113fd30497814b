//! Attribute replacement hooks
//!
//! Handlers call the configured hook once per attribute right before a record
//! is encoded. Returning `None` drops the attribute from the output.

use super::attr::{keys, Attr, FieldValue};
use super::source::{default_resolver, SourceResolver};
use std::sync::Arc;

/// Per-attribute hook: `(groups, attr) -> replacement`
pub type ReplaceAttrFn = Arc<dyn Fn(&[String], Attr) -> Option<Attr> + Send + Sync>;

/// Render the record's own severity as its display name
///
/// Only the built-in [`FieldValue::Level`] is renamed. A `level` attribute
/// supplied at the call site is a plain value and passes through.
pub fn replace_level(_groups: &[String], mut attr: Attr) -> Option<Attr> {
    if attr.key == keys::LEVEL {
        if let FieldValue::Level(level) = attr.value {
            attr.value = FieldValue::String(level.to_str().to_string());
        }
    }
    Some(attr)
}

/// Level renaming plus stack-resolved `source`, using the default resolver
pub fn replace_source(groups: &[String], attr: Attr) -> Option<Attr> {
    resolve_source_with(&default_resolver(), groups, attr)
}

fn resolve_source_with(resolver: &SourceResolver, groups: &[String], attr: Attr) -> Option<Attr> {
    let attr = replace_level(groups, attr)?;
    if attr.key != keys::SOURCE {
        return Some(attr);
    }
    resolver
        .resolve()
        .map(|location| Attr::new(keys::SOURCE, location))
}

/// Hook that only renames levels
pub fn level_replacer() -> ReplaceAttrFn {
    Arc::new(replace_level)
}

/// Hook equivalent to [`replace_source`]
pub fn source_replacer() -> ReplaceAttrFn {
    Arc::new(replace_source)
}

impl SourceResolver {
    /// Hook equivalent to [`replace_source`] but bound to this resolver
    pub fn source_replacer(self) -> ReplaceAttrFn {
        let resolver = Arc::new(self);
        Arc::new(move |groups: &[String], attr: Attr| {
            resolve_source_with(&resolver, groups, attr)
        })
    }
}
