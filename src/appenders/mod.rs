//! Handler implementations

pub mod capture;
pub mod stream;

pub use capture::{Capture, CaptureHandler, CapturedRecord};
pub use stream::StreamHandler;

// Re-export the trait for convenience
pub use crate::core::Handler;
