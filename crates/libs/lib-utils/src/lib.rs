//! # Utilities Library
//!
//! Shared helpers for environment variables, time stamps and input validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env_opt, get_env_parse_or};
pub use time::{format_clock, now_utc};
pub use validation::{validate_evm_address, validate_http_url, validate_not_empty};
