//! # Voting Contract Handle
//!
//! [`EvmVotingContract`] implements [`VotingContract`] over JSON-RPC. Reads
//! go through `eth_call`; `vote` goes through `eth_sendTransaction` from the
//! bound signer and waits for the receipt.
//!
//! ## Error Mapping
//!
//! | Source | Error |
//! |---|---|
//! | any read failure | `ReadFailure` |
//! | code 4001 on send | `SubmissionRejected` |
//! | revert at gas estimation, or receipt status `0x0` | `TransactionReverted` |
//! | transport or other node error | `NetworkFailure` |

use std::time::Duration;

use async_trait::async_trait;
use lib_core::{AppError, Result, VotingContract};
use shared::dto::{CandidateRecord, Winner};
use tracing::{debug, info, warn};

use crate::abi;
use crate::rpc::{RpcClient, RpcError, TransactionRequest};

/// Contract handle, optionally bound to a signing account.
#[derive(Debug, Clone)]
pub struct EvmVotingContract {
    rpc: RpcClient,
    address: String,
    signer: Option<String>,
    poll_interval: Duration,
}

impl EvmVotingContract {
    /// Read-only handle.
    pub fn new(rpc: RpcClient, address: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            rpc,
            address: address.into(),
            signer: None,
            poll_interval,
        }
    }

    /// Bind writes to `account`.
    pub fn with_signer(mut self, account: impl Into<String>) -> Self {
        self.signer = Some(account.into());
        self
    }

    async fn read(&self, method: &str, data: Vec<u8>) -> Result<Vec<u8>> {
        self.rpc.call(&self.address, &data).await.map_err(|e| {
            warn!(method, error = %e, "Contract read failed");
            AppError::ReadFailure(format!("{}: {}", method, e))
        })
    }
}

/// Map an `eth_sendTransaction` failure into the write taxonomy.
pub(crate) fn submission_error(err: RpcError) -> AppError {
    if err.is_user_rejection() {
        AppError::SubmissionRejected(err.to_string())
    } else if err.is_revert() {
        AppError::TransactionReverted(err.to_string())
    } else {
        AppError::NetworkFailure(err.to_string())
    }
}

#[async_trait]
impl VotingContract for EvmVotingContract {
    async fn get_candidates(&self) -> Result<Vec<CandidateRecord>> {
        let data = self.read("getCandidates", abi::encode_get_candidates()).await?;
        abi::decode_candidates(&data)
    }

    async fn get_vote_count(&self, account: &str) -> Result<u64> {
        let call = abi::encode_get_vote_count(account)?;
        let data = self.read("getVoteCount", call).await?;
        abi::decode_vote_count(&data)
    }

    async fn get_winner(&self) -> Result<Winner> {
        let data = self.read("getWinner", abi::encode_get_winner()).await?;
        abi::decode_winner(&data)
    }

    async fn vote(&self, candidate_index: u64) -> Result<()> {
        let from = self
            .signer
            .as_deref()
            .ok_or_else(|| AppError::NotConnected("contract handle has no signer".to_string()))?;

        let tx = TransactionRequest::call(from, &self.address, &abi::encode_vote(candidate_index));
        let hash = self.rpc.send_transaction(&tx).await.map_err(submission_error)?;
        info!(tx_hash = %hash, candidate_index, from, "Vote submitted, waiting for confirmation");

        let receipt = self
            .rpc
            .wait_for_receipt(&hash, self.poll_interval)
            .await
            .map_err(|e| AppError::NetworkFailure(e.to_string()))?;

        if !receipt.succeeded() {
            warn!(tx_hash = %hash, "Vote transaction reverted");
            return Err(AppError::TransactionReverted(format!("transaction {} reverted", hash)));
        }

        debug!(tx_hash = %hash, block = ?receipt.block_number, "Vote confirmed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubNode;

    async fn bound_contract(node: &StubNode) -> EvmVotingContract {
        let rpc = RpcClient::builder().url(node.url()).build();
        EvmVotingContract::new(rpc, node.contract_address(), Duration::from_millis(10))
            .with_signer(node.accounts()[0].clone())
    }

    #[tokio::test]
    async fn test_reads_decode_node_state() {
        let node = StubNode::start().await;
        node.set_vote_count(2);
        node.set_winner("Balap Karung", 4);
        let contract = bound_contract(&node).await;

        let candidates = contract.get_candidates().await.unwrap();
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Tarik Tambang", "Balap Karung", "Panjat Pinang"]);

        let count = contract.get_vote_count(&node.accounts()[0]).await.unwrap();
        assert_eq!(count, 2);

        assert_eq!(contract.get_winner().await.unwrap(), Winner::new("Balap Karung", 4));
    }

    #[tokio::test]
    async fn test_vote_waits_for_receipt() {
        let node = StubNode::start().await;
        node.set_pending_polls(2);
        let contract = bound_contract(&node).await;

        contract.vote(1).await.unwrap();

        assert_eq!(node.votes(), vec![1]);
        assert!(node.receipt_polls() >= 3);
    }

    #[tokio::test]
    async fn test_reverted_receipt() {
        let node = StubNode::start().await;
        node.set_revert_votes(true);
        let contract = bound_contract(&node).await;

        let err = contract.vote(0).await.unwrap_err();

        assert!(matches!(err, AppError::TransactionReverted(_)));
    }

    #[tokio::test]
    async fn test_rejected_signature() {
        let node = StubNode::start().await;
        node.set_reject_signing(true);
        let contract = bound_contract(&node).await;

        let err = contract.vote(0).await.unwrap_err();

        assert!(matches!(err, AppError::SubmissionRejected(_)));
        assert!(node.votes().is_empty());
    }

    #[tokio::test]
    async fn test_vote_without_signer() {
        let node = StubNode::start().await;
        let rpc = RpcClient::builder().url(node.url()).build();
        let contract = EvmVotingContract::new(rpc, node.contract_address(), Duration::from_millis(10));

        assert!(matches!(contract.vote(0).await, Err(AppError::NotConnected(_))));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_read_failure() {
        let rpc = RpcClient::builder()
            .url("http://127.0.0.1:9")
            .timeout(Duration::from_millis(500))
            .build();
        let contract = EvmVotingContract::new(rpc, "0x5FbDB2315678afecb367f032d93F642f64180aa3", Duration::from_millis(10));

        assert!(matches!(contract.get_winner().await, Err(AppError::ReadFailure(_))));
    }

    #[test]
    fn test_submission_error_mapping() {
        assert!(matches!(
            submission_error(RpcError::Rpc { code: 4001, message: "denied".into() }),
            AppError::SubmissionRejected(_)
        ));
        assert!(matches!(
            submission_error(RpcError::Rpc { code: 3, message: "execution reverted".into() }),
            AppError::TransactionReverted(_)
        ));
        assert!(matches!(
            submission_error(RpcError::Transport("timed out".into())),
            AppError::NetworkFailure(_)
        ));
    }
}
