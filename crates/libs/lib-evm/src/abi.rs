//! # Voting Contract ABI
//!
//! Call and return types for the fixed voting contract, generated by
//! `alloy_sol_types::sol!`, plus conversions into the shared DTOs.
//!
//! ```text
//! vote(uint256 candidateIndex)
//! getCandidates() view returns ((string name, uint256 voteCount)[])
//! getVoteCount(address voter) view returns (uint256)
//! getWinner() view returns (string winnerName, uint256 maxVotes)
//! constructor(string[] candidateNames)
//! ```

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall, SolValue};
use lib_core::{AppError, Result};
use shared::dto::{CandidateRecord, Winner};

sol! {
    struct Candidate {
        string name;
        uint256 voteCount;
    }

    function vote(uint256 candidateIndex) external;
    function getCandidates() external view returns (Candidate[] memory);
    function getVoteCount(address voter) external view returns (uint256);
    function getWinner() external view returns (string memory winnerName, uint256 maxVotes);
}

pub fn encode_vote(candidate_index: u64) -> Vec<u8> {
    voteCall {
        candidateIndex: U256::from(candidate_index),
    }
    .abi_encode()
}

pub fn encode_get_candidates() -> Vec<u8> {
    getCandidatesCall {}.abi_encode()
}

pub fn encode_get_vote_count(account: &str) -> Result<Vec<u8>> {
    let voter: Address = account
        .parse()
        .map_err(|e| AppError::ReadFailure(format!("invalid account address {}: {}", account, e)))?;
    Ok(getVoteCountCall { voter }.abi_encode())
}

pub fn encode_get_winner() -> Vec<u8> {
    getWinnerCall {}.abi_encode()
}

/// Constructor arguments appended to the creation bytecode.
pub fn encode_constructor_args(candidate_names: &[String]) -> Vec<u8> {
    (candidate_names.to_vec(),).abi_encode_params()
}

pub fn decode_candidates(data: &[u8]) -> Result<Vec<CandidateRecord>> {
    let decoded = getCandidatesCall::abi_decode_returns(data, true)
        .map_err(|e| AppError::ReadFailure(format!("cannot decode getCandidates result: {}", e)))?;

    decoded
        ._0
        .into_iter()
        .map(|candidate| {
            Ok(CandidateRecord {
                vote_count: to_u64(candidate.voteCount, "voteCount")?,
                name: candidate.name,
            })
        })
        .collect()
}

pub fn decode_vote_count(data: &[u8]) -> Result<u64> {
    let decoded = getVoteCountCall::abi_decode_returns(data, true)
        .map_err(|e| AppError::ReadFailure(format!("cannot decode getVoteCount result: {}", e)))?;
    to_u64(decoded._0, "getVoteCount")
}

pub fn decode_winner(data: &[u8]) -> Result<Winner> {
    let decoded = getWinnerCall::abi_decode_returns(data, true)
        .map_err(|e| AppError::ReadFailure(format!("cannot decode getWinner result: {}", e)))?;
    Ok(Winner {
        name: decoded.winnerName,
        votes: to_u64(decoded.maxVotes, "maxVotes")?,
    })
}

fn to_u64(value: U256, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| AppError::ReadFailure(format!("{} does not fit in u64: {}", field, value)))
}
