//! # Shared Voting Types
//!
//! Domain values exchanged between the contract backend, the client core and
//! whatever renders the client state.
//!
//! ## Structure
//!
//! - **[`dto`]**: Candidate, winner and raw contract records
//! - **[`utils`]**: Address formatting for display
//!   - **[`utils::format_address`]**: Keep a prefix and a suffix around an ellipsis
//!   - **[`utils::short_account`]**: The `0x1234...abcd` form used for connected accounts
//!
//! ## Wire Format
//!
//! All DTOs serialize with the default `serde` behavior (snake_case fields),
//! so a snapshot can be dumped as JSON by a renderer or a log line.
//!
//! ```rust
//! use shared::dto::{Candidate, Winner};
//! use shared::utils::short_account;
//!
//! let candidate = Candidate::new(0, "Tarik Tambang", 3);
//! let winner = Winner::new("Tarik Tambang", 3);
//!
//! assert_eq!(winner.display_text(), "Tarik Tambang with 3 votes");
//! assert_eq!(short_account("0x1234567890123456789012345678901234567890"), "0x1234...7890");
//! # let _ = candidate;
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
