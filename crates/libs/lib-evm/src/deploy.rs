//! # Deployment
//!
//! Deploys the voting contract from a compiled Hardhat artifact
//! (`artifacts/contracts/Voting.sol/Voting.json`) with a list of candidate
//! names, signed by the node's first account.

use std::path::Path;
use std::time::Duration;

use lib_core::{AppError, Result};
use lib_utils::validation::validate_not_empty;
use serde::Deserialize;
use tracing::{info, warn};

use crate::abi;
use crate::contract::submission_error;
use crate::rpc::{decode_hex, RpcClient, TransactionRequest};

/// Result of a successful deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub address: String,
    pub transaction_hash: String,
    pub deployer: String,
}

#[derive(Deserialize)]
struct Artifact {
    bytecode: String,
}

/// Read the creation bytecode out of a Hardhat artifact file.
pub fn load_artifact_bytecode(path: &Path) -> Result<Vec<u8>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read artifact {}: {}", path.display(), e)))?;
    let artifact: Artifact = serde_json::from_str(&raw)
        .map_err(|e| AppError::Config(format!("invalid artifact {}: {}", path.display(), e)))?;

    let bytecode = decode_hex(&artifact.bytecode)
        .map_err(|e| AppError::Config(format!("invalid bytecode in {}: {}", path.display(), e)))?;
    if bytecode.is_empty() {
        return Err(AppError::Config(format!("artifact {} has no bytecode", path.display())));
    }
    Ok(bytecode)
}

/// Deploy with `candidates` as constructor arguments and wait for the receipt.
///
/// The receipt wait is bounded by `tx_timeout`; expiry is a `NetworkFailure`.
pub async fn deploy_voting(
    rpc: &RpcClient,
    bytecode: &[u8],
    candidates: &[String],
    poll_interval: Duration,
    tx_timeout: Duration,
) -> Result<DeployOutcome> {
    if candidates.is_empty() {
        return Err(AppError::Config("at least one candidate is required".to_string()));
    }
    for name in candidates {
        validate_not_empty(name, "candidate name").map_err(AppError::Config)?;
    }

    let deployer = rpc
        .accounts()
        .await
        .map_err(|e| AppError::WalletUnavailable(e.to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::WalletUnavailable("node exposes no accounts".to_string()))?;

    let mut init_code = bytecode.to_vec();
    init_code.extend(abi::encode_constructor_args(candidates));

    let hash = rpc
        .send_transaction(&TransactionRequest::create(&deployer, &init_code))
        .await
        .map_err(submission_error)?;
    info!(tx_hash = %hash, deployer = %deployer, candidates = candidates.len(), "Deployment submitted");

    let receipt = match tokio::time::timeout(tx_timeout, rpc.wait_for_receipt(&hash, poll_interval)).await {
        Ok(receipt) => receipt.map_err(|e| AppError::NetworkFailure(e.to_string()))?,
        Err(_) => {
            warn!(tx_hash = %hash, timeout_secs = tx_timeout.as_secs(), "Deployment receipt timed out");
            return Err(AppError::NetworkFailure(format!(
                "deployment {} not mined within {}s",
                hash,
                tx_timeout.as_secs()
            )));
        }
    };

    if !receipt.succeeded() {
        return Err(AppError::TransactionReverted(format!("deployment {} reverted", hash)));
    }
    let address = receipt
        .contract_address
        .ok_or_else(|| AppError::NetworkFailure(format!("receipt for {} has no contract address", hash)))?;

    info!(address = %address, "Voting contract deployed");
    Ok(DeployOutcome {
        address,
        transaction_hash: hash,
        deployer,
    })
}
