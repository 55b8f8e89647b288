//! # Core Library
//!
//! Configuration, the error taxonomy and the boundary traits shared by the
//! EVM backend and the client core.

pub mod config;
pub mod error;
pub mod service;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use service::{
    SubscriptionHandle, UserPrompt, VotingContract, WalletEvent, WalletProvider, WalletSubscription,
};
