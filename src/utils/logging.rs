//! Logging Module
//!
//! Provides structured logging utilities using the `tracing` crate.
//! Network construction and head renewal emit `debug` events; pipelines
//! embedding this crate call `init_logging` once at startup.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: LogLevel,
    /// Whether to include target (module path)
    pub include_target: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            include_target: false,
            ansi_colors: true,
        }
    }
}

impl LogConfig {
    /// Create a verbose logging config for debugging
    pub fn verbose() -> Self {
        Self {
            level: LogLevel::Debug,
            include_target: true,
            ansi_colors: true,
        }
    }

    /// Create a quiet logging config (errors only)
    pub fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            include_target: false,
            ansi_colors: true,
        }
    }
}

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing Level
    pub fn to_tracing_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    /// Create from string
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

/// Initialize logging with the given configuration
pub fn init_logging(config: &LogConfig) -> Result<(), String> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level.to_tracing_level())
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Initialize logging with default settings
pub fn init_default_logging() -> Result<(), String> {
    init_logging(&LogConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("INFO"), LogLevel::Info);
        assert_eq!(LogLevel::from_str("Warning"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("unknown"), LogLevel::Info);
    }

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert!(config.ansi_colors);
    }

    #[test]
    fn test_verbose_config() {
        let config = LogConfig::verbose();
        assert_eq!(config.level, LogLevel::Debug);
        assert!(config.include_target);
    }
}
