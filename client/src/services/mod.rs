//! # Services
//!
//! - `session`: wallet session lifecycle
//! - `contract`: normalized reads and the bounded vote write

pub mod contract;
pub mod session;

pub use contract::ContractAdapter;
pub use session::{Session, SessionManager};
