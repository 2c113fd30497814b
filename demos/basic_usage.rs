//! Basic logger usage example
//!
//! Demonstrates level filtering, bound attributes, groups and the two output
//! formats. Every line carries a `source` pointing back into this file.
//!
//! Run with: cargo run --example basic_usage

use structured_logger_system::prelude::*;
use structured_logger_system::{info, warn};

fn main() -> Result<()> {
    println!("=== Structured Logger System - Basic Usage Example ===\n");

    // Text logger on stdout with stack-resolved source
    let logger = Logger::builder()
        .min_level(LogLevel::Trace)
        .colors(true)
        .build();

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message", &[]);
    logger.debug("This is a debug message", &[]);
    logger.info("This is an info message", &[attr("port", 8080)]);
    logger.warn("This is a warning message", &[]);
    logger.error("This is an error message", &[]);

    println!("\n2. Minimum level INFO - trace and debug won't show:");
    let logger = Logger::builder().min_level(LogLevel::Info).build();
    logger.trace("Trace message (hidden)", &[]);
    logger.debug("Debug message (hidden)", &[]);
    logger.info("Info message (visible)", &[]);

    println!("\n3. Derived loggers and groups:");
    let request = logger
        .with(&[attr("request_id", "abc-123")])
        .with_group("db");
    request.info("query finished", &[attr("table", "orders"), attr("rows", 12)]);
    info!(logger, "Formatted through a macro: {} items", 3);
    warn!(logger, "Slow request"; "ms" => 1250, "path" => "/orders");

    println!("\n4. JSON output from configuration:");
    let config = LoggerConfig::from_json(r#"{"level": "debug", "format": "json"}"#)?;
    let json = Logger::builder()
        .min_level(config.min_level()?)
        .format(config.format)
        .build();
    json.with_group("http")
        .debug("request", &[attr("method", "GET"), attr("status", 200)]);

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
