//! # Service Traits
//!
//! The three seams between the client core and its environment:
//!
//! - [`WalletProvider`]: account access, chain identity, change notifications
//!   and signer-bound contract handles (a browser wallet, a node with managed
//!   accounts, or a test double)
//! - [`VotingContract`]: the fixed ABI of the deployed voting contract
//! - [`UserPrompt`]: interactive confirmation and notices, injected so the
//!   core runs without a real UI surface
//!
//! Listener registration is explicit: [`WalletProvider::subscribe`] returns a
//! [`WalletSubscription`] whose [`SubscriptionHandle`] unregisters the
//! listener when dropped.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use shared::dto::{CandidateRecord, Winner};

use crate::error::Result;

/// Notification pushed by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The exposed account list changed. Empty means access was revoked.
    AccountsChanged(Vec<String>),
    /// The provider switched to another chain.
    ChainChanged(u64),
}

/// Owned registration of a wallet listener.
///
/// Dropping the handle runs the cancel action exactly once.
pub struct SubscriptionHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle with nothing to unregister.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Unregister now instead of at drop.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Event stream plus the handle that keeps it registered.
#[derive(Debug)]
pub struct WalletSubscription {
    pub events: async_channel::Receiver<WalletEvent>,
    pub handle: SubscriptionHandle,
}

/// Host wallet boundary.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether the provider can currently be reached.
    async fn is_available(&self) -> bool;

    /// Ask for account access. The first entry is the active account.
    async fn request_accounts(&self) -> Result<Vec<String>>;

    /// Chain the provider is connected to.
    async fn chain_id(&self) -> Result<u64>;

    /// Register for account and chain change notifications.
    fn subscribe(&self) -> Result<WalletSubscription>;

    /// Contract handle whose writes are signed by `account`.
    fn contract_for(&self, account: &str) -> Result<Arc<dyn VotingContract>>;
}

/// Public methods of the deployed voting contract.
#[async_trait]
pub trait VotingContract: Send + Sync {
    /// `getCandidates()`, in contract order.
    async fn get_candidates(&self) -> Result<Vec<CandidateRecord>>;

    /// `getVoteCount(address)`.
    async fn get_vote_count(&self, account: &str) -> Result<u64>;

    /// `getWinner()`.
    async fn get_winner(&self) -> Result<Winner>;

    /// `vote(uint256)`: submit and wait for one confirmation.
    async fn vote(&self, candidate_index: u64) -> Result<()>;
}

/// Interactive capability injected by the host.
#[async_trait]
pub trait UserPrompt: Send + Sync {
    /// Ask a yes/no question.
    async fn confirm(&self, prompt: &str) -> bool;

    /// Show a non-blocking notice.
    fn notify(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_handle_cancels_once_on_drop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handle = SubscriptionHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        handle.unsubscribe();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_noop_handle() {
        let handle = SubscriptionHandle::noop();
        assert_eq!(format!("{:?}", handle), "SubscriptionHandle { active: false }");
    }

    #[tokio::test]
    async fn test_subscription_stream_closes_with_sender() {
        let (tx, rx) = async_channel::unbounded();
        let subscription = WalletSubscription {
            events: rx,
            handle: SubscriptionHandle::noop(),
        };

        tx.send(WalletEvent::ChainChanged(11155111)).await.unwrap();
        drop(tx);

        assert_eq!(subscription.events.recv().await, Ok(WalletEvent::ChainChanged(11155111)));
        assert!(subscription.events.recv().await.is_err());
    }
}
