//! # Logging Infrastructure
//!
//! File-based structured logging for the console client. The console itself
//! is reserved for the interactive view, so everything goes to a
//! daily-rotated file.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (e.g., `voting_client=debug,lib_evm=debug`)
//! - `VOTING_LOG_DIR`: Log directory (default: `logs`)

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::init as init_logger;

/// Initialize logging. Call once at startup.
pub fn init() {
    init_logger();
}
