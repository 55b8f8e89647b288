//! # Wallet Session Manager
//!
//! Owns the connected account, its signer-bound contract handle and the
//! wallet-event subscription. A [`Session`] exists exactly when an account is
//! connected; there is no state with an account but no contract handle.
//!
//! Each successful connect starts a new generation (`Session::id`). Work
//! started under one generation is discarded by the coordinator once the
//! generation is gone.
//!
//! A connect attempt is superseded by a teardown or by a newer attempt while
//! it waits on the wallet; a superseded attempt never installs its session.

use std::sync::Arc;
use std::time::Duration;

use lib_core::{AppError, Result, SubscriptionHandle, UserPrompt, WalletEvent, WalletProvider};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::contract::ContractAdapter;

pub const DISCONNECT_PROMPT: &str = "Disconnect wallet?";

/// Live association between an account and its contract handle.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: u64,
    pub account: String,
    pub chain_id: u64,
    pub contract: ContractAdapter,
}

#[derive(Default)]
struct Slot {
    session: Option<Session>,
    subscription: Option<SubscriptionHandle>,
    generation: u64,
    attempt: u64,
}

pub struct SessionManager {
    wallet: Option<Arc<dyn WalletProvider>>,
    tx_timeout: Duration,
    slot: Mutex<Slot>,
}

impl SessionManager {
    /// `wallet` is `None` when no provider is installed.
    pub fn new(wallet: Option<Arc<dyn WalletProvider>>, tx_timeout: Duration) -> Self {
        Self {
            wallet,
            tx_timeout,
            slot: Mutex::new(Slot::default()),
        }
    }

    fn wallet(&self) -> Result<&Arc<dyn WalletProvider>> {
        self.wallet
            .as_ref()
            .ok_or_else(|| AppError::WalletUnavailable("no wallet provider installed".to_string()))
    }

    /// Request account access and establish a new session.
    ///
    /// Returns the session and the wallet event stream registered for it, or
    /// `Ok(None)` when the attempt was superseded before it finished. A
    /// superseded attempt reports neither its session nor its error.
    pub async fn connect(&self) -> Result<Option<(Session, async_channel::Receiver<WalletEvent>)>> {
        let attempt = {
            let mut slot = self.slot.lock();
            slot.attempt += 1;
            slot.attempt
        };

        match self.establish(attempt).await {
            Err(e) if self.is_superseded(attempt) => {
                debug!(attempt, error = %e, "Superseded connect attempt failed");
                Ok(None)
            }
            other => other,
        }
    }

    fn is_superseded(&self, attempt: u64) -> bool {
        self.slot.lock().attempt != attempt
    }

    async fn establish(&self, attempt: u64) -> Result<Option<(Session, async_channel::Receiver<WalletEvent>)>> {
        let wallet = self.wallet()?.clone();

        if !wallet.is_available().await {
            return Err(AppError::WalletUnavailable("wallet provider is not reachable".to_string()));
        }

        let account = wallet
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::UserRejected("no account was granted".to_string()))?;

        let chain_id = wallet.chain_id().await?;
        let contract = ContractAdapter::new(wallet.contract_for(&account)?, self.tx_timeout);
        let subscription = wallet.subscribe()?;

        let session = {
            let mut slot = self.slot.lock();
            if slot.attempt != attempt {
                drop(slot);
                // Dropping the handle unregisters the listener.
                drop(subscription);
                debug!(attempt, account = %account, "Connect attempt superseded, discarding");
                return Ok(None);
            }
            slot.generation += 1;
            let session = Session {
                id: slot.generation,
                account,
                chain_id,
                contract,
            };
            slot.session = Some(session.clone());
            // Replaces any previous registration.
            slot.subscription = Some(subscription.handle);
            session
        };

        info!(session_id = session.id, account = %session.account, chain_id, "Wallet connected");
        Ok(Some((session, subscription.events)))
    }

    /// Ask for confirmation, then tear the session down.
    ///
    /// Returns whether the user confirmed. Prompts even when nothing is connected.
    pub async fn disconnect(&self, prompt: &dyn UserPrompt) -> bool {
        if !prompt.confirm(DISCONNECT_PROMPT).await {
            debug!("Disconnect declined");
            return false;
        }
        self.teardown();
        true
    }

    /// Drop the session and its subscription without prompting. Also
    /// supersedes any connect attempt still in flight.
    pub fn teardown(&self) -> Option<Session> {
        let (session, subscription) = {
            let mut slot = self.slot.lock();
            slot.attempt += 1;
            (slot.session.take(), slot.subscription.take())
        };
        // Unregister outside the lock; cancel actions may do arbitrary work.
        drop(subscription);

        if let Some(session) = &session {
            info!(session_id = session.id, account = %session.account, "Session torn down");
        }
        session
    }

    /// Point the current session at another account and rebind its contract.
    ///
    /// Keeps the session generation and subscription. Returns `Ok(None)` when
    /// nothing is connected.
    pub fn switch_account(&self, account: &str) -> Result<Option<Session>> {
        let wallet = self.wallet()?;
        if self.slot.lock().session.is_none() {
            return Ok(None);
        }

        let contract = ContractAdapter::new(wallet.contract_for(account)?, self.tx_timeout);

        let mut slot = self.slot.lock();
        let Some(session) = slot.session.as_mut() else {
            return Ok(None);
        };
        session.account = account.to_string();
        session.contract = contract;
        info!(session_id = session.id, account, "Active account switched");
        Ok(Some(session.clone()))
    }

    pub fn current(&self) -> Option<Session> {
        self.slot.lock().session.clone()
    }
}
