//! Line-writing handler for stdout, stderr, files or any `Write`

use crate::core::{
    Handler, HandlerOptions, LogLevel, LoggerError, OutputFormat, Record, Result, ScopedAttr,
};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Writes one encoded record per line
///
/// The replacement hook runs before the writer lock is taken, so stack
/// resolution never happens while another thread is blocked on output.
pub struct StreamHandler {
    writer: Mutex<Box<dyn Write + Send>>,
    options: HandlerOptions,
    format: OutputFormat,
    use_colors: bool,
    name: &'static str,
}

impl StreamHandler {
    pub fn new<W: Write + Send + 'static>(
        writer: W,
        format: OutputFormat,
        options: HandlerOptions,
    ) -> Self {
        Self::boxed(Box::new(writer), format, options)
    }

    pub fn boxed(writer: Box<dyn Write + Send>, format: OutputFormat, options: HandlerOptions) -> Self {
        Self {
            writer: Mutex::new(writer),
            options,
            format,
            use_colors: false,
            name: "stream",
        }
    }

    pub fn stdout(format: OutputFormat, options: HandlerOptions) -> Self {
        Self {
            name: "stdout",
            ..Self::new(io::stdout(), format, options)
        }
    }

    pub fn stderr(format: OutputFormat, options: HandlerOptions) -> Self {
        Self {
            name: "stderr",
            ..Self::new(io::stderr(), format, options)
        }
    }

    /// Append to a file, creating it if needed
    pub fn file<P: AsRef<Path>>(path: P, format: OutputFormat, options: HandlerOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;
        Ok(Self {
            name: "file",
            ..Self::new(io::BufWriter::new(file), format, options)
        })
    }

    /// Colour the level value in text output
    ///
    /// Has no effect without the `console` feature or with JSON output.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    /// Encode a record into one line without the trailing newline
    pub fn format_record(&self, record: &Record) -> String {
        let resolved = self.options.resolve(record);
        if self.use_colors && self.format == OutputFormat::Text {
            return Self::format_colored(&resolved, record.level);
        }
        self.format.encode(&resolved)
    }

    #[cfg(feature = "console")]
    fn format_colored(resolved: &[ScopedAttr], level: LogLevel) -> String {
        use crate::core::attr::keys;
        use colored::Colorize;

        OutputFormat::format_text_with(resolved, |scoped| {
            let text = OutputFormat::format_text_value(&scoped.attr.value);
            if scoped.groups.is_empty() && scoped.attr.key == keys::LEVEL {
                text.color(level.color_code()).to_string()
            } else {
                text
            }
        })
    }

    #[cfg(not(feature = "console"))]
    fn format_colored(resolved: &[ScopedAttr], _level: LogLevel) -> String {
        OutputFormat::Text.encode(resolved)
    }
}

impl Handler for StreamHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        self.options.enabled(level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        let line = self.format_record(record);
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attr::{attr, ScopedAttr};
    use crate::core::replace::level_replacer;
    use std::fs;
    use tempfile::tempdir;

    fn text_options() -> HandlerOptions {
        HandlerOptions::new(LogLevel::Debug).with_replace_attr(level_replacer())
    }

    #[test]
    fn test_file_handler_text() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test.log");

        let handler = StreamHandler::file(&log_path, OutputFormat::Text, text_options())?;
        let record = Record::new(LogLevel::Info, "User logged in")
            .with_attrs(vec![ScopedAttr::top_level(attr("user_id", 123))]);
        handler.handle(&record)?;
        handler.flush()?;

        let content = fs::read_to_string(&log_path)?;
        assert!(content.contains("level=INFO"));
        assert!(content.contains("msg=\"User logged in\""));
        assert!(content.ends_with("user_id=123\n"));
        Ok(())
    }

    #[test]
    fn test_file_handler_json_lines() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test.jsonl");

        let handler = StreamHandler::file(&log_path, OutputFormat::Json, text_options())?;
        for i in 0..5 {
            let record = Record::new(LogLevel::Debug, &format!("Iteration {}", i))
                .with_attrs(vec![ScopedAttr::top_level(attr("iteration", i))]);
            handler.handle(&record)?;
        }
        handler.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);

        for (i, line) in lines.iter().enumerate() {
            let parsed: serde_json::Value = serde_json::from_str(line)?;
            assert_eq!(parsed["level"], "DEBUG");
            assert_eq!(parsed["iteration"], i as i64);
        }
        Ok(())
    }

    #[test]
    fn test_file_open_error_has_context() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no_such_dir").join("x.log");
        let err = StreamHandler::file(&missing, OutputFormat::Text, text_options())
            .err()
            .unwrap();
        assert!(err.to_string().contains("opening log file"));
    }

    #[test]
    fn test_enabled_uses_options() {
        let handler = StreamHandler::new(io::sink(), OutputFormat::Text, text_options());
        assert!(!handler.enabled(LogLevel::Trace));
        assert!(handler.enabled(LogLevel::Debug));
        assert_eq!(handler.name(), "stream");
    }

    #[cfg(feature = "console")]
    #[test]
    fn test_colors_only_touch_level() {
        colored::control::set_override(true);
        let handler = StreamHandler::new(io::sink(), OutputFormat::Text, text_options())
            .with_colors(true);
        let line = handler.format_record(&Record::new(LogLevel::Warn, "careful"));
        assert!(line.contains("\u{1b}["));
        assert!(line.contains("msg=careful"));
    }
}
