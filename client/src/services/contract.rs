//! # Contract Adapter
//!
//! Normalizes the raw [`VotingContract`] boundary into domain values:
//! candidates get their fetch-time index, and votes are bounds-checked
//! against the last fetched list and bounded in time.

use std::sync::Arc;
use std::time::Duration;

use lib_core::{AppError, Result, VotingContract};
use shared::dto::{Candidate, Winner};
use tracing::{debug, warn};

/// Signer-bound contract handle plus the confirmation bound.
#[derive(Clone)]
pub struct ContractAdapter {
    contract: Arc<dyn VotingContract>,
    tx_timeout: Duration,
}

impl std::fmt::Debug for ContractAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractAdapter")
            .field("tx_timeout", &self.tx_timeout)
            .finish_non_exhaustive()
    }
}

impl ContractAdapter {
    pub fn new(contract: Arc<dyn VotingContract>, tx_timeout: Duration) -> Self {
        Self { contract, tx_timeout }
    }

    /// Candidates indexed `0..n-1` in contract order.
    pub async fn get_candidates(&self) -> Result<Vec<Candidate>> {
        let records = self.contract.get_candidates().await?;
        debug!(count = records.len(), "Candidates fetched");
        Ok(Candidate::from_records(records))
    }

    pub async fn get_vote_count(&self, account: &str) -> Result<u64> {
        self.contract.get_vote_count(account).await
    }

    pub async fn get_winner(&self) -> Result<Winner> {
        self.contract.get_winner().await
    }

    /// Submit a vote and wait for one confirmation.
    ///
    /// `known_candidates` is the length of the last fetched candidate list;
    /// indices outside it are rejected without submitting.
    pub async fn cast_vote(&self, candidate_index: u64, known_candidates: usize) -> Result<()> {
        if candidate_index >= known_candidates as u64 {
            return Err(AppError::InvalidCandidate(format!(
                "index {} is outside the {} known candidates",
                candidate_index, known_candidates
            )));
        }

        match tokio::time::timeout(self.tx_timeout, self.contract.vote(candidate_index)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(candidate_index, timeout_secs = self.tx_timeout.as_secs(), "Vote confirmation timed out");
                Err(AppError::NetworkFailure(format!(
                    "no confirmation within {}s",
                    self.tx_timeout.as_secs()
                )))
            }
        }
    }
}
