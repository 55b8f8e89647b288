//! # Voting DTOs
//!
//! Candidate and winner snapshots. Every refresh replaces these values
//! wholesale; nothing here is patched in place.

use serde::{Deserialize, Serialize};

/// One `(name, voteCount)` entry exactly as the contract returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub vote_count: u64,
}

impl CandidateRecord {
    pub fn new(name: impl Into<String>, vote_count: u64) -> Self {
        Self {
            name: name.into(),
            vote_count,
        }
    }
}

/// A candidate with the index it was assigned at fetch time.
///
/// The index is the position in the contract's return order and is the
/// argument passed to `vote(uint256)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub index: u64,
    pub name: String,
    pub vote_count: u64,
}

impl Candidate {
    pub fn new(index: u64, name: impl Into<String>, vote_count: u64) -> Self {
        Self {
            index,
            name: name.into(),
            vote_count,
        }
    }

    /// Assign indices `0..n-1` in the order the records were received.
    pub fn from_records(records: Vec<CandidateRecord>) -> Vec<Candidate> {
        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| Candidate {
                index: index as u64,
                name: record.name,
                vote_count: record.vote_count,
            })
            .collect()
    }
}

/// Current leader as reported by the contract.
///
/// An empty name means no vote has been cast yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub name: String,
    pub votes: u64,
}

impl Winner {
    pub fn new(name: impl Into<String>, votes: u64) -> Self {
        Self {
            name: name.into(),
            votes,
        }
    }

    pub fn is_decided(&self) -> bool {
        !self.name.is_empty()
    }

    /// Line shown in the winner section.
    pub fn display_text(&self) -> String {
        if self.is_decided() {
            format!("{} with {} votes", self.name, self.votes)
        } else {
            "No winner yet".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_records_assigns_sequential_indices() {
        let records = vec![
            CandidateRecord::new("Tarik Tambang", 2),
            CandidateRecord::new("Balap Karung", 0),
            CandidateRecord::new("Panjat Pinang", 7),
        ];

        let candidates = Candidate::from_records(records);

        let indices: Vec<u64> = candidates.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(candidates[0].name, "Tarik Tambang");
        assert_eq!(candidates[2].vote_count, 7);
    }

    #[test]
    fn test_from_records_empty() {
        assert!(Candidate::from_records(Vec::new()).is_empty());
    }

    #[test]
    fn test_winner_display() {
        assert_eq!(Winner::default().display_text(), "No winner yet");
        assert!(!Winner::default().is_decided());
        assert_eq!(Winner::new("Balap Karung", 4).display_text(), "Balap Karung with 4 votes");
    }

    #[test]
    fn test_candidate_json_shape() {
        let json = serde_json::to_value(Candidate::new(1, "Balap Karung", 4)).unwrap();
        assert_eq!(json["index"], 1);
        assert_eq!(json["name"], "Balap Karung");
        assert_eq!(json["vote_count"], 4);
    }
}
