//! # Voting Client - Library Root
//!
//! Client core for a capped on-chain voting dApp: wallet session lifecycle,
//! a normalized adapter over the voting contract and the coordinator that
//! keeps the UI-facing state in sync with both.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              voting-client (this crate)                │
//! ├────────────────────────────────────────────────────────┤
//! │  app        - Coordinator, AppState, AppEvent          │
//! │  services   - SessionManager, ContractAdapter          │
//! │  ui         - console view, commands, prompt           │
//! │  debug      - file logging                             │
//! └────────────────────────────────────────────────────────┘
//!          │ WalletProvider / VotingContract (lib-core)
//!          ▼
//! ┌────────────────────────────────────────────────────────┐
//! │  lib-evm    - JSON-RPC wallet + contract, deployment   │
//! └────────────────────────────────────────────────────────┘
//!          │ HTTP JSON-RPC
//!          ▼
//!    Hardhat / Anvil / geth node with managed accounts
//! ```
//!
//! ## Core Concepts
//!
//! ### Session
//!
//! A connected account and its signer-bound contract handle exist together
//! or not at all. Every connect starts a new session generation; results of
//! work started under an older generation are dropped.
//!
//! ### State Management
//!
//! State is wrapped in `RwLock<AppState>` inside the coordinator:
//! - **Thread-safe**: Multiple readers, exclusive writers
//! - **Locked briefly**: never held across an `.await`
//! - **Observable**: every change is published as `AppEvent::SnapshotChanged`
//!
//! ## Usage
//!
//! ```bash
//! VOTING_CONTRACT_ADDRESS=0x5FbDB2315678afecb367f032d93F642f64180aa3 cargo run --bin voting-client -- run
//! cargo run --bin voting-client -- deploy --artifact artifacts/contracts/Voting.sol/Voting.json
//! ```

pub mod app;
pub mod debug;
pub mod services;
pub mod ui;

pub use app::{AppEvent, AppState, Coordinator, Phase};
pub use lib_core::{AppError, Result};
