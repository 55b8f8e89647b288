//! # EVM Library
//!
//! JSON-RPC implementation of the wallet and contract boundaries for the
//! voting client.
//!
//! - [`rpc`]: HTTP JSON-RPC client (`eth_call`, `eth_sendTransaction`, receipts)
//! - [`abi`]: ABI of the voting contract, generated with `alloy-sol-types`
//! - [`contract`]: [`EvmVotingContract`], the contract handle
//! - [`wallet`]: [`RpcWallet`], a wallet provider backed by node-managed accounts
//! - [`deploy`]: one-shot deployment from a Hardhat artifact
//!
//! Signing is delegated to the node: writes are sent with `eth_sendTransaction`
//! from an account the node unlocks (a Hardhat or Anvil dev node).

pub mod abi;
pub mod contract;
pub mod deploy;
pub mod rpc;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types from root for convenience
pub use contract::EvmVotingContract;
pub use deploy::{deploy_voting, load_artifact_bytecode, DeployOutcome};
pub use rpc::{RpcClient, RpcError, TransactionReceipt, TransactionRequest};
pub use wallet::RpcWallet;
