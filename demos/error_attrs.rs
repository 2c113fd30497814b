//! Attribute-carrying errors example
//!
//! Each layer wraps the error with its own context. When the error is finally
//! logged, every attribute collected on the way up ends up in the record, and
//! `source` still points at the line that logged it.
//!
//! Run with: cargo run --example error_attrs

use std::io;
use structured_logger_system::prelude::*;
use structured_logger_system::{init_default, init_default_errorer};

struct Storage {
    errorer: Errorer,
}

impl Storage {
    fn read(&self, key: &str) -> std::result::Result<String, StructuredError> {
        let missing: std::result::Result<String, io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "no such key"));
        self.errorer.bind(missing, &[attr("key", key)])
    }
}

struct Service {
    storage: Storage,
    errorer: Errorer,
}

impl Service {
    fn load_profile(&self, user_id: u64) -> std::result::Result<String, StructuredError> {
        self.storage
            .read(&format!("profile/{}", user_id))
            .map_err(|err| self.errorer.wrap(err, &[attr("user_id", user_id)]))
    }
}

fn main() {
    init_default("debug", OutputFormat::Text);
    init_default_errorer(OutputFormat::Json);

    let service = Service {
        storage: Storage {
            errorer: Errorer::new(vec![attr("component", "storage")]),
        },
        errorer: Errorer::new(vec![attr("component", "profile-service")]),
    };

    match service.load_profile(42) {
        Ok(profile) => println!("loaded {}", profile),
        Err(err) => {
            println!("Display is unchanged: {}", err);
            err_error("profile lookup failed", &err, &[attr("attempt", 1)]);
        }
    }

    let plain = io::Error::new(io::ErrorKind::TimedOut, "upstream timed out");
    err_warn("retrying", &plain, &[attr("backoff_ms", 200)]);
}
