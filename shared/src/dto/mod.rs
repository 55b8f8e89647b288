//! # Data Transfer Objects (DTOs)
//!
//! Normalized values produced by the contract adapter.
//!
//! ## Module Organization
//!
//! - [`voting`] - Candidates, winner and the raw on-chain candidate record
//!
//! ## Serialization Format
//!
//! ```text
//! {
//!   "index": 1,
//!   "name": "Balap Karung",
//!   "vote_count": 4
//! }
//! ```

pub mod voting;

pub use voting::*;
