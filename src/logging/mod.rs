//! Leveled logging and output control
//!
//! This module provides the [`Logger`] used for all user-visible output. The
//! threshold comes from [`LogLevel`], normally read from `LOG_LEVEL`.

use std::str::FromStr;

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

impl LogLevel {
    /// Parse a raw `LOG_LEVEL` value, falling back to `Info`
    pub fn from_env_value(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

/// Logger responsible for all user-visible output
#[derive(Debug, Clone)]
pub struct Logger {
    pub level: LogLevel,
}

impl Logger {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Logger that only reports errors
    pub fn new_quiet() -> Self {
        Self::new(LogLevel::Error)
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    pub fn trace(&self, message: &str) {
        if self.enabled(LogLevel::Trace) {
            println!("TRACE: {}", message);
        }
    }

    pub fn debug(&self, message: &str) {
        if self.enabled(LogLevel::Debug) {
            println!("DEBUG: {}", message);
        }
    }

    /// Detailed information (only shown at debug level)
    pub fn detail(&self, message: &str) {
        if self.enabled(LogLevel::Debug) {
            println!("   {}", message);
        }
    }

    /// Information message
    pub fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            println!("ℹ️  {}", message);
        }
    }

    /// Success message
    pub fn success(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            println!("✅ {}", message);
        }
    }

    /// Step information
    pub fn step(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            println!("▶️  {}", message);
        }
    }

    /// Error message
    pub fn error(&self, message: &str) {
        if self.enabled(LogLevel::Error) {
            eprintln!("❌ ERROR: {}", message);
        }
    }

    // Key-value listing for summaries
    pub fn summary_kv(&self, title: &str, items: &[(&str, String)]) {
        if self.enabled(LogLevel::Info) {
            println!("\n--- {} ---", title);
            for (key, value) in items {
                println!("  {}: {}", key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!("TRACE".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(" warning ".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_env_value_falls_back_to_info() {
        assert_eq!(LogLevel::from_env_value(None), LogLevel::Info);
        assert_eq!(LogLevel::from_env_value(Some("nonsense")), LogLevel::Info);
        assert_eq!(LogLevel::from_env_value(Some("error")), LogLevel::Error);
    }

    #[test]
    fn test_threshold() {
        let logger = Logger::new(LogLevel::Warn);
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Warn));
        assert!(logger.enabled(LogLevel::Error));
        assert!(Logger::new_quiet().enabled(LogLevel::Error));
        assert!(!Logger::new_quiet().enabled(LogLevel::Warn));
    }
}
