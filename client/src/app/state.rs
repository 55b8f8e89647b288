//! # Application State Types
//!
//! The UI-facing snapshot held by the coordinator. Renderers receive clones
//! of [`AppState`]; only the coordinator mutates it.

use chrono::{DateTime, Utc};
use shared::dto::{Candidate, Winner};
use shared::short_account;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No account connected
    Disconnected,
    /// Account access requested, waiting for the wallet
    Connecting,
    /// Session established, idle
    Connected,
    /// A vote transaction is outstanding
    Voting,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Disconnected => "disconnected",
            Phase::Connecting => "connecting",
            Phase::Connected => "connected",
            Phase::Voting => "voting",
        }
    }
}

/// Complete application state
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub phase: Phase,
    pub account: Option<String>,
    pub chain_id: Option<u64>,
    pub candidates: Vec<Candidate>,
    /// Votes already cast by `account`, as reported by the contract.
    pub vote_count: u64,
    pub vote_cap: u64,
    pub winner: Winner,
    /// Last error message; a later failure replaces it.
    pub error: Option<String>,
    /// Set while a connect or vote is outstanding.
    pub loading: bool,
    pub last_refreshed: Option<DateTime<Utc>>,
    /// Generation of the session this state belongs to.
    pub session_id: Option<u64>,
}

impl AppState {
    /// Initial disconnected state.
    pub fn new(vote_cap: u64) -> Self {
        Self {
            phase: Phase::Disconnected,
            account: None,
            chain_id: None,
            candidates: Vec::new(),
            vote_count: 0,
            vote_cap,
            winner: Winner::default(),
            error: None,
            loading: false,
            last_refreshed: None,
            session_id: None,
        }
    }

    pub fn remaining_votes(&self) -> u64 {
        self.vote_cap.saturating_sub(self.vote_count)
    }

    pub fn votes_exhausted(&self) -> bool {
        self.vote_count >= self.vote_cap
    }

    /// Whether the vote action is offered.
    pub fn can_vote(&self) -> bool {
        self.phase == Phase::Connected && !self.loading && !self.votes_exhausted()
    }

    /// `0x1234...abcd`
    pub fn short_account(&self) -> Option<String> {
        self.account.as_deref().map(short_account)
    }

    pub fn winner_text(&self) -> String {
        self.winner.display_text()
    }
}
