//! Call-site resolution by walking the current thread's stack
//!
//! Log calls are issued from one or two layers of logger code, so the
//! immediate caller is usually a line inside this crate. `SourceResolver`
//! walks outward and returns the first frame that none of its filters claim.

use parking_lot::RwLock;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

/// Symbol prefix shared by every function in this crate
pub const CRATE_SYMBOL_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Upper bound on physical frames inspected per resolution
pub const DEFAULT_MAX_FRAMES: usize = 48;

/// Resolved metadata for one (possibly inlined) stack frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Demangled symbol without the trailing hash
    pub symbol: Option<String>,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(symbol: Option<&str>, file: Option<&Path>, line: Option<u32>) -> Self {
        Self {
            symbol: symbol.map(str::to_string),
            file: file.map(Path::to_path_buf),
            line,
        }
    }

    fn from_symbol(symbol: &backtrace::Symbol) -> Self {
        Self {
            symbol: symbol.name().map(|name| format!("{:#}", name)),
            file: symbol.filename().map(Path::to_path_buf),
            line: symbol.lineno(),
        }
    }

    /// `file:line`, or `None` when either half is missing
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file.display(), line)),
            _ => None,
        }
    }
}

/// Rule marking a frame as logger-internal
#[derive(Clone)]
pub enum FrameFilter {
    /// Symbol starts with the prefix; a leading `<` of trait-impl symbols is ignored
    SymbolPrefix(String),
    /// Source file path contains the fragment
    FileContains(String),
    Custom(Arc<dyn Fn(&Frame) -> bool + Send + Sync>),
}

impl FrameFilter {
    pub fn symbol_prefix(prefix: impl Into<String>) -> Self {
        FrameFilter::SymbolPrefix(prefix.into())
    }

    pub fn file_contains(fragment: impl Into<String>) -> Self {
        FrameFilter::FileContains(fragment.into())
    }

    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Frame) -> bool + Send + Sync + 'static,
    {
        FrameFilter::Custom(Arc::new(predicate))
    }

    pub fn matches(&self, frame: &Frame) -> bool {
        match self {
            FrameFilter::SymbolPrefix(prefix) => frame
                .symbol
                .as_deref()
                .map(|symbol| symbol.trim_start_matches('<').starts_with(prefix.as_str()))
                .unwrap_or(false),
            FrameFilter::FileContains(fragment) => frame
                .file
                .as_deref()
                .map(|file| file.to_string_lossy().contains(fragment.as_str()))
                .unwrap_or(false),
            FrameFilter::Custom(predicate) => predicate(frame),
        }
    }
}

/// Split `<Type as Trait>::method` into `(Type, Trait)`
fn split_trait_impl(symbol: &str) -> Option<(&str, &str)> {
    let inner = symbol.strip_prefix('<')?;
    let mut depth = 0usize;
    let mut self_end = None;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if inner[..i].ends_with('-') => {}
            '>' if depth == 0 => {
                let end = self_end?;
                return Some((&inner[..end], &inner[end + " as ".len()..i]));
            }
            '>' => depth -= 1,
            ' ' if depth == 0 && self_end.is_none() && inner[i..].starts_with(" as ") => {
                self_end = Some(i);
            }
            _ => {}
        }
    }
    None
}

impl fmt::Debug for FrameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameFilter::SymbolPrefix(prefix) => f.debug_tuple("SymbolPrefix").field(prefix).finish(),
            FrameFilter::FileContains(fragment) => {
                f.debug_tuple("FileContains").field(fragment).finish()
            }
            FrameFilter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Walks the stack and reports the first frame outside the logger
#[derive(Debug, Clone)]
pub struct SourceResolver {
    filters: Vec<FrameFilter>,
    max_frames: usize,
}

impl SourceResolver {
    /// Resolver with no filters at all
    pub fn empty() -> Self {
        Self {
            filters: Vec::new(),
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    /// Skips this crate, the stack walker, the unwinder and the standard library
    pub fn new() -> Self {
        Self::empty()
            .with_filter(FrameFilter::symbol_prefix(CRATE_SYMBOL_PREFIX))
            .with_filter(FrameFilter::symbol_prefix("backtrace::"))
            .with_filter(FrameFilter::symbol_prefix("std::"))
            .with_filter(FrameFilter::symbol_prefix("core::"))
            .with_filter(FrameFilter::symbol_prefix("alloc::"))
            .with_filter(FrameFilter::symbol_prefix("_Unwind"))
            .with_filter(FrameFilter::symbol_prefix("__rust"))
            .with_filter(FrameFilter::file_contains("/rustc/"))
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_filter(mut self, filter: FrameFilter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn filters(&self) -> &[FrameFilter] {
        &self.filters
    }

    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    /// Whether any filter claims `frame`
    ///
    /// A trait-impl symbol `<Type as Trait>::method` is claimed by the prefix
    /// filters only when both `Type` and `Trait` are, so an application's
    /// own trait implemented on a library type still counts as application
    /// code.
    pub fn is_internal(&self, frame: &Frame) -> bool {
        let trait_impl = frame.symbol.as_deref().and_then(split_trait_impl);
        self.filters.iter().any(|filter| match (filter, trait_impl) {
            (FrameFilter::SymbolPrefix(_), Some((self_ty, trait_path))) => {
                self.claims_path(self_ty) && self.claims_path(trait_path)
            }
            _ => filter.matches(frame),
        })
    }

    fn claims_path(&self, path: &str) -> bool {
        self.filters.iter().any(|filter| {
            matches!(filter, FrameFilter::SymbolPrefix(prefix) if path.starts_with(prefix.as_str()))
        })
    }

    /// `file:line` of the first qualifying frame on the current stack
    ///
    /// Symbols are resolved lazily and the walk stops at the first hit, so
    /// the cost is bounded by how deep the logger's own frames go. Returns
    /// `None` when nothing qualifies within `max_frames`.
    pub fn resolve(&self) -> Option<String> {
        let mut found = None;
        let mut depth = 0;

        backtrace::trace(|raw| {
            depth += 1;
            backtrace::resolve_frame(raw, |symbol| {
                if found.is_none() {
                    let frame = Frame::from_symbol(symbol);
                    if !self.is_internal(&frame) {
                        found = frame.location();
                    }
                }
            });
            found.is_none() && depth < self.max_frames
        });

        found
    }

    /// Same selection as [`resolve`](Self::resolve) over an explicit frame list
    pub fn resolve_from<I>(&self, frames: I) -> Option<String>
    where
        I: IntoIterator<Item = Frame>,
    {
        frames
            .into_iter()
            .take(self.max_frames)
            .filter(|frame| !self.is_internal(frame))
            .find_map(|frame| frame.location())
    }
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_RESOLVER: LazyLock<RwLock<Arc<SourceResolver>>> =
    LazyLock::new(|| RwLock::new(Arc::new(SourceResolver::new())));

/// Resolver used by [`replace_source`](super::replace::replace_source)
pub fn default_resolver() -> Arc<SourceResolver> {
    Arc::clone(&DEFAULT_RESOLVER.read())
}

/// Replace the process-wide resolver, e.g. to exclude a wrapper crate
///
/// Like the other defaults, call this during startup.
pub fn set_default_resolver(resolver: SourceResolver) {
    *DEFAULT_RESOLVER.write() = Arc::new(resolver);
}
