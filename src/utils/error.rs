//! Error Handling Module
//!
//! Defines custom error types for the deep-clustering network library.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Main error type for network construction and configuration
#[derive(Error, Debug)]
pub enum DeepClusterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No trunk configuration table exists for this input spatial size
    #[error("Unsupported input spatial size: {0} (expected 24 or 64)")]
    UnsupportedInputSize(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience Result type for network operations
pub type Result<T> = std::result::Result<T, DeepClusterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeepClusterError::Config("test error".to_string());
        assert_eq!(format!("{}", err), "Configuration error: test error");
    }

    #[test]
    fn test_unsupported_input_size() {
        let err = DeepClusterError::UnsupportedInputSize(32);
        let msg = format!("{}", err);
        assert!(msg.contains("32"));
        assert!(msg.contains("24 or 64"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DeepClusterError = io.into();
        assert!(matches!(err, DeepClusterError::Io(_)));
    }
}
