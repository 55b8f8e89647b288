//! # Centralized Error Handling
//!
//! This module defines the error type [`AppError`] used by every boundary of
//! the voting client. It follows the `thiserror` pattern for ergonomic error
//! handling.
//!
//! ## Error Categories
//!
//! 1. **Wallet** - connecting an account
//!    - [`WalletUnavailable`](AppError::WalletUnavailable): no provider, or provider unreachable
//!    - [`UserRejected`](AppError::UserRejected): account request declined
//!
//! 2. **Reads** - contract queries
//!    - [`ReadFailure`](AppError::ReadFailure): RPC or ABI-decoding failure
//!
//! 3. **Writes** - the vote transaction
//!    - [`SubmissionRejected`](AppError::SubmissionRejected): signing declined
//!    - [`TransactionReverted`](AppError::TransactionReverted): rejected on chain (e.g. cap exceeded)
//!    - [`NetworkFailure`](AppError::NetworkFailure): transport failure or confirmation timeout
//!
//! 4. **Client** - local preconditions
//!    - [`NotConnected`](AppError::NotConnected), [`InvalidCandidate`](AppError::InvalidCandidate), [`Config`](AppError::Config)
//!
//! Every variant is recoverable: the session stays intact and the user may
//! retry the operation. Only a chain change tears the session down, and that
//! is an event, not an error.
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn check_index(index: u64, known: usize) -> Result<()> {
//!     if index as usize >= known {
//!         return Err(AppError::InvalidCandidate(format!("no candidate at index {index}")));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_index(3, 3).is_err());
//! ```

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error taxonomy of the voting client.
///
/// Each variant includes a descriptive `String` for context.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// No wallet provider is present, or it cannot be reached.
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// The account request was declined by the user.
    #[error("Request rejected: {0}")]
    UserRejected(String),

    /// A read-only contract query failed (RPC error or undecodable result).
    #[error("Read failure: {0}")]
    ReadFailure(String),

    /// The user declined to sign the vote transaction.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// The transaction was rejected on chain.
    #[error("Transaction reverted: {0}")]
    TransactionReverted(String),

    /// Connectivity failure, including expiry of the confirmation wait.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// An operation needed a session and there is none.
    #[error("Not connected: {0}")]
    NotConnected(String),

    /// Candidate index outside the last fetched candidate list.
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Stable variant name, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::WalletUnavailable(_) => "WalletUnavailable",
            AppError::UserRejected(_) => "UserRejected",
            AppError::ReadFailure(_) => "ReadFailure",
            AppError::SubmissionRejected(_) => "SubmissionRejected",
            AppError::TransactionReverted(_) => "TransactionReverted",
            AppError::NetworkFailure(_) => "NetworkFailure",
            AppError::NotConnected(_) => "NotConnected",
            AppError::InvalidCandidate(_) => "InvalidCandidate",
            AppError::Config(_) => "Config",
        }
    }
}

/// Convert environment lookup errors to `AppError`.
impl From<lib_utils::envs::Error> for AppError {
    fn from(err: lib_utils::envs::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AppError::TransactionReverted("vote limit reached".to_string());
        assert_eq!(err.to_string(), "Transaction reverted: vote limit reached");
        assert_eq!(err.code(), "TransactionReverted");

        let err = AppError::WalletUnavailable("no provider".to_string());
        assert_eq!(err.to_string(), "Wallet unavailable: no provider");
    }

    #[test]
    fn test_from_env_error() {
        let err: AppError = lib_utils::envs::Error::WrongFormat("VOTING_VOTE_CAP").into();
        assert_eq!(err.code(), "Config");
        assert!(err.to_string().contains("VOTING_VOTE_CAP"));
    }
}
