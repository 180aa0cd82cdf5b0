//! # Periscope Utilities
//!
//! Shared utilities and logging for Periscope.
//!
//! This crate provides common functionality used across the Periscope
//! workspace, most importantly logging infrastructure built on `tracing`
//! that stays out of the host debugger's console.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{LogFormat, LogLevel, init_logging, init_logging_for_host, init_logging_with_level};
pub use tracing::{debug, error, info, trace, warn};
