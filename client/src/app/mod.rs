//! # Application State Coordinator
//!
//! [`Coordinator`] ties the session manager and the contract adapter
//! together and owns the UI-facing [`AppState`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  connect/vote/refresh/disconnect   ┌──────────────────┐
//! │  Host (REPL) │ ─────────────────────────────────▶ │   Coordinator    │
//! └──────▲───────┘                                    │  Arc<RwLock<..>> │
//!        │ AppEvent (async_channel)                   └───┬──────────┬───┘
//!        └────────────────────────────────────────────────┘          │
//!                                      SessionManager ◀──────────────┤
//!                                      ContractAdapter ◀─────────────┘
//!                                      wallet event pump (tokio task)
//! ```
//!
//! ## State Management Pattern
//!
//! State lives in `parking_lot::RwLock<AppState>`. Locks are held only for
//! short synchronous sections and always released before an `.await`. Every
//! mutation publishes [`AppEvent::SnapshotChanged`] to all subscribers.
//!
//! Results are applied only while the session they were started under is
//! still current (same generation and account); anything else is dropped.
//!
//! ## Error Handling
//!
//! No operation returns an error. Failures become the `error` message in
//! the snapshot, prefixed with the operation that failed.

pub mod events;
pub mod state;


use std::sync::Arc;

use async_channel::{Receiver, Sender};
use lib_core::{Config, UserPrompt, WalletEvent, WalletProvider};
use lib_utils::now_utc;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::services::{Session, SessionManager};

pub use events::AppEvent;
pub use state::{AppState, Phase};

pub const VOTE_SUCCESS_NOTICE: &str = "Vote cast successfully";

/// Orchestrates session, reads and votes. Cheap to clone.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

struct Inner {
    state: RwLock<AppState>,
    sessions: SessionManager,
    prompt: Arc<dyn UserPrompt>,
    subscribers: Mutex<Vec<Sender<AppEvent>>>,
}

impl Coordinator {
    pub fn new(wallet: Option<Arc<dyn WalletProvider>>, prompt: Arc<dyn UserPrompt>, config: &Config) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(AppState::new(config.vote_cap)),
                sessions: SessionManager::new(wallet, config.tx_timeout),
                prompt,
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> AppState {
        self.inner.state.read().clone()
    }

    /// Register an observer. Dropped receivers are pruned on the next publish.
    pub fn subscribe(&self) -> Receiver<AppEvent> {
        let (tx, rx) = async_channel::unbounded();
        self.inner.subscribers.lock().push(tx);
        rx
    }

    fn broadcast(&self, event: AppEvent) {
        self.inner
            .subscribers
            .lock()
            .retain(|tx| tx.try_send(event.clone()).is_ok());
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.broadcast(AppEvent::SnapshotChanged(snapshot));
    }

    /// Mutate state unconditionally and publish.
    fn update(&self, f: impl FnOnce(&mut AppState)) {
        {
            let mut state = self.inner.state.write();
            f(&mut state);
        }
        self.publish();
    }

    /// Mutate state only if `session` is still the live one. Returns whether it was applied.
    fn apply(&self, session: &Session, what: &str, f: impl FnOnce(&mut AppState)) -> bool {
        {
            let mut state = self.inner.state.write();
            let current = state.session_id == Some(session.id)
                && state.account.as_deref() == Some(session.account.as_str());
            if !current {
                debug!(session_id = session.id, what, "Discarding result from stale session");
                return false;
            }
            f(&mut state);
        }
        self.publish();
        true
    }

    /// Move a freshly connected session into the snapshot, unless it was
    /// torn down in the meantime.
    fn install(&self, session: &Session) -> bool {
        {
            let mut state = self.inner.state.write();
            let live = self.inner.sessions.current().map(|s| s.id) == Some(session.id);
            if state.phase != Phase::Connecting {
                drop(state);
                if live {
                    self.inner.sessions.teardown();
                }
                return false;
            }
            if !live {
                return false;
            }
            state.phase = Phase::Connected;
            state.loading = false;
            state.account = Some(session.account.clone());
            state.chain_id = Some(session.chain_id);
            state.session_id = Some(session.id);
        }
        self.publish();
        true
    }

    fn reset(&self) {
        self.update(|state| *state = AppState::new(state.vote_cap));
    }

    /// Connect the wallet and load the contract data.
    ///
    /// Ignored unless disconnected. A disconnect confirmed while the wallet
    /// is still answering cancels the attempt.
    pub async fn connect(&self) {
        {
            let mut state = self.inner.state.write();
            if state.phase != Phase::Disconnected {
                debug!(phase = state.phase.label(), "Connect ignored");
                return;
            }
            state.phase = Phase::Connecting;
            state.loading = true;
            state.error = None;
        }
        self.publish();

        match self.inner.sessions.connect().await {
            Ok(Some((session, events))) => {
                if !self.install(&session) {
                    debug!(session_id = session.id, "Session ended before it was installed");
                    return;
                }
                self.spawn_event_pump(session.id, events);
                self.refresh_session(&session).await;
            }
            Ok(None) => debug!("Connect attempt cancelled"),
            Err(e) => {
                warn!(error = %e, code = e.code(), "Wallet connection failed");
                self.update(|state| {
                    state.phase = Phase::Disconnected;
                    state.loading = false;
                    state.error = Some(format!("Failed to connect wallet: {}", e));
                });
            }
        }
    }

    /// Confirm with the user, then drop the session and clear all data.
    pub async fn disconnect(&self) {
        if self.inner.sessions.disconnect(self.inner.prompt.as_ref()).await {
            info!("Wallet disconnected");
            self.reset();
        }
    }

    /// Re-run all three reads for the current session.
    pub async fn refresh(&self) {
        match self.inner.sessions.current() {
            Some(session) => self.refresh_session(&session).await,
            None => debug!("Refresh ignored, not connected"),
        }
    }

    /// Vote for the candidate at `candidate_index`.
    ///
    /// A no-op unless connected, idle and below the vote cap.
    pub async fn vote(&self, candidate_index: u64) {
        let Some(session) = self.inner.sessions.current() else {
            debug!("Vote ignored, not connected");
            return;
        };

        let known_candidates = {
            let mut state = self.inner.state.write();
            if !state.can_vote() {
                debug!(
                    phase = state.phase.label(),
                    loading = state.loading,
                    vote_count = state.vote_count,
                    "Vote ignored"
                );
                return;
            }
            state.phase = Phase::Voting;
            state.loading = true;
            state.error = None;
            state.candidates.len()
        };
        self.publish();

        info!(candidate_index, account = %session.account, "Casting vote");
        let result = session.contract.cast_vote(candidate_index, known_candidates).await;

        match result {
            Ok(()) => {
                if !self.is_current(&session) {
                    debug!(session_id = session.id, "Vote settled after session ended");
                    return;
                }
                self.inner.prompt.notify(VOTE_SUCCESS_NOTICE);
                self.refresh_session(&session).await;
                self.apply(&session, "vote", |state| {
                    state.phase = Phase::Connected;
                    state.loading = false;
                });
            }
            Err(e) => {
                warn!(candidate_index, error = %e, code = e.code(), "Vote failed");
                self.apply(&session, "vote", |state| {
                    state.phase = Phase::Connected;
                    state.loading = false;
                    state.error = Some(format!("Failed to cast vote: {}", e));
                });
            }
        }
    }

    fn current_session_id(&self) -> Option<u64> {
        self.inner.state.read().session_id
    }

    fn is_current(&self, session: &Session) -> bool {
        let state = self.inner.state.read();
        state.session_id == Some(session.id) && state.account.as_deref() == Some(session.account.as_str())
    }

    /// Concurrent reads; each applies its own outcome as it resolves.
    async fn refresh_session(&self, session: &Session) {
        let candidates = async {
            let result = session.contract.get_candidates().await;
            self.apply(session, "candidates", |state| match result {
                Ok(candidates) => {
                    state.candidates = candidates;
                    state.last_refreshed = Some(now_utc());
                }
                Err(e) => state.error = Some(format!("Failed to load candidates: {}", e)),
            });
        };

        tokio::join!(candidates, self.refresh_vote_count(session), self.refresh_winner(session));
    }

    async fn refresh_vote_count(&self, session: &Session) {
        let result = session.contract.get_vote_count(&session.account).await;
        self.apply(session, "vote count", |state| match result {
            Ok(count) => {
                state.vote_count = count;
                state.last_refreshed = Some(now_utc());
            }
            Err(e) => state.error = Some(format!("Failed to load vote count: {}", e)),
        });
    }

    async fn refresh_winner(&self, session: &Session) {
        let result = session.contract.get_winner().await;
        self.apply(session, "winner", |state| match result {
            Ok(winner) => {
                state.winner = winner;
                state.last_refreshed = Some(now_utc());
            }
            Err(e) => state.error = Some(format!("Failed to load winner: {}", e)),
        });
    }

    /// Forward wallet notifications for session `session_id` until its
    /// subscription closes or the session ends.
    fn spawn_event_pump(&self, session_id: u64, events: Receiver<WalletEvent>) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                coordinator.handle_wallet_event(session_id, event).await;
                if coordinator.current_session_id() != Some(session_id) {
                    break;
                }
            }
            debug!(session_id, "Wallet event pump stopped");
        });
    }

    /// React to an account or chain change reported for session `session_id`.
    pub async fn handle_wallet_event(&self, session_id: u64, event: WalletEvent) {
        if self.current_session_id() != Some(session_id) {
            debug!(session_id, ?event, "Wallet event for stale session");
            return;
        }

        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts.first() {
                None => {
                    info!("Account access revoked");
                    self.inner.sessions.teardown();
                    self.reset();
                }
                Some(account) => self.switch_account(account).await,
            },
            WalletEvent::ChainChanged(chain_id) => {
                info!(chain_id, "Chain changed, resetting client");
                self.inner.sessions.teardown();
                self.reset();
                self.broadcast(AppEvent::Reloaded);
            }
        }
    }

    async fn switch_account(&self, account: &str) {
        let unchanged = self.inner.state.read().account.as_deref() == Some(account);
        if unchanged {
            return;
        }

        match self.inner.sessions.switch_account(account) {
            Ok(Some(session)) => {
                // An outstanding vote belongs to the old account and is dropped.
                self.update(|state| {
                    state.account = Some(session.account.clone());
                    state.phase = Phase::Connected;
                    state.loading = false;
                });
                self.refresh_vote_count(&session).await;
            }
            Ok(None) => debug!("Account switch ignored, not connected"),
            Err(e) => {
                warn!(error = %e, "Account switch failed");
                self.inner.sessions.teardown();
                self.update(|state| {
                    *state = AppState::new(state.vote_cap);
                    state.error = Some(format!("Failed to switch account: {}", e));
                });
            }
        }
    }
}
