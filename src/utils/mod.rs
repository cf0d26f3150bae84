//! Utilities module for error handling and logging
//!
//! This module provides:
//! - Structured logging with tracing
//! - Error handling types

pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use error::{DeepClusterError, Result};
pub use logging::init_logging;
