//! Logging configuration from environment variables

use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "voting_client=info,lib_evm=info,lib_core=info,warn";
pub const LOG_FILE_NAME: &str = "voting-client.log";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// Log level filter (e.g., "voting_client=debug,info")
    pub log_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_level: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_values(std::env::var("VOTING_LOG_DIR").ok(), std::env::var("RUST_LOG").ok())
    }

    fn from_values(log_dir: Option<String>, log_level: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_dir: log_dir.filter(|v| !v.is_empty()).map(PathBuf::from).unwrap_or(defaults.log_dir),
            log_level: log_level.filter(|v| !v.is_empty()).unwrap_or(defaults.log_level),
        }
    }

    /// Path of today's file is `<log_dir>/voting-client.log.<date>`.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}
