//! # RPC Wallet
//!
//! [`RpcWallet`] implements [`WalletProvider`] on top of a node that manages
//! its own accounts (Hardhat, Anvil, or geth with unlocked keys).
//!
//! A node cannot push account or chain changes over HTTP, so
//! [`WalletProvider::subscribe`] spawns a watcher that polls `eth_accounts`
//! and `eth_chainId` and emits a [`WalletEvent`] whenever either differs from
//! the previous poll. Dropping the returned handle aborts the watcher.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lib_core::{AppError, Result, SubscriptionHandle, VotingContract, WalletEvent, WalletProvider, WalletSubscription};
use lib_utils::validation::validate_evm_address;
use tracing::{debug, info, warn};

use crate::contract::EvmVotingContract;
use crate::rpc::{RpcClient, RpcError};

/// Wallet provider backed by node-managed accounts.
#[derive(Debug, Clone)]
pub struct RpcWallet {
    rpc: RpcClient,
    contract_address: String,
    poll_interval: Duration,
}

impl RpcWallet {
    pub fn new(rpc: RpcClient, contract_address: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            rpc,
            contract_address: contract_address.into(),
            poll_interval,
        }
    }
}

fn access_error(err: RpcError) -> AppError {
    if err.is_user_rejection() {
        AppError::UserRejected(err.to_string())
    } else {
        AppError::WalletUnavailable(err.to_string())
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn is_available(&self) -> bool {
        match self.rpc.chain_id().await {
            Ok(_) => true,
            Err(e) => {
                debug!(url = self.rpc.url(), error = %e, "Wallet node unreachable");
                false
            }
        }
    }

    async fn request_accounts(&self) -> Result<Vec<String>> {
        let accounts = self.rpc.request_accounts().await.map_err(access_error)?;
        debug!(count = accounts.len(), "Accounts granted");
        Ok(accounts)
    }

    async fn chain_id(&self) -> Result<u64> {
        self.rpc
            .chain_id()
            .await
            .map_err(|e| AppError::NetworkFailure(e.to_string()))
    }

    fn subscribe(&self) -> Result<WalletSubscription> {
        let (tx, rx) = async_channel::unbounded();
        let task = tokio::spawn(watch_wallet(self.rpc.clone(), self.poll_interval, tx));

        Ok(WalletSubscription {
            events: rx,
            handle: SubscriptionHandle::new(move || task.abort()),
        })
    }

    fn contract_for(&self, account: &str) -> Result<Arc<dyn VotingContract>> {
        validate_evm_address(&self.contract_address, "contract address").map_err(AppError::Config)?;
        validate_evm_address(account, "account").map_err(AppError::WalletUnavailable)?;

        let contract = EvmVotingContract::new(self.rpc.clone(), self.contract_address.clone(), self.poll_interval)
            .with_signer(account);
        Ok(Arc::new(contract))
    }
}

/// Poll the node and forward account/chain changes until the receiver goes away.
async fn watch_wallet(rpc: RpcClient, poll_interval: Duration, tx: async_channel::Sender<WalletEvent>) {
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last_accounts: Option<Vec<String>> = None;
    let mut last_chain: Option<u64> = None;

    info!(interval_ms = poll_interval.as_millis() as u64, "Wallet watcher started");

    loop {
        interval.tick().await;

        match rpc.chain_id().await {
            Ok(chain_id) => {
                let changed = last_chain.is_some_and(|previous| previous != chain_id);
                last_chain = Some(chain_id);
                if changed {
                    info!(chain_id, "Chain changed");
                    if tx.send(WalletEvent::ChainChanged(chain_id)).await.is_err() {
                        break;
                    }
                    // A chain switch resets the session; account diffs restart from the new chain.
                    last_accounts = None;
                    continue;
                }
            }
            Err(e) => {
                warn!(error = %e, "Wallet watcher could not read chain id");
                continue;
            }
        }

        match rpc.accounts().await {
            Ok(accounts) => {
                let changed = last_accounts.as_ref().is_some_and(|previous| *previous != accounts);
                if changed {
                    info!(count = accounts.len(), "Accounts changed");
                    if tx.send(WalletEvent::AccountsChanged(accounts.clone())).await.is_err() {
                        break;
                    }
                }
                last_accounts = Some(accounts);
            }
            Err(e) => warn!(error = %e, "Wallet watcher could not read accounts"),
        }

        if tx.is_closed() {
            break;
        }
    }

    debug!("Wallet watcher stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubNode;

    fn wallet(node: &StubNode) -> RpcWallet {
        let rpc = RpcClient::builder().url(node.url()).build();
        RpcWallet::new(rpc, node.contract_address(), Duration::from_millis(20))
    }

    async fn next_event(sub: &WalletSubscription) -> WalletEvent {
        tokio::time::timeout(Duration::from_secs(5), sub.events.recv())
            .await
            .expect("no wallet event within timeout")
            .expect("wallet event stream closed")
    }

    #[tokio::test]
    async fn test_availability_and_accounts() {
        let node = StubNode::start().await;
        let wallet = wallet(&node);

        assert!(wallet.is_available().await);
        assert_eq!(wallet.request_accounts().await.unwrap(), node.accounts());
        assert_eq!(wallet.chain_id().await.unwrap(), 31337);
    }

    #[tokio::test]
    async fn test_unreachable_node() {
        let rpc = RpcClient::builder()
            .url("http://127.0.0.1:9")
            .timeout(Duration::from_millis(500))
            .build();
        let wallet = RpcWallet::new(rpc, "0x5FbDB2315678afecb367f032d93F642f64180aa3", Duration::from_millis(20));

        assert!(!wallet.is_available().await);
        assert!(matches!(wallet.request_accounts().await, Err(AppError::WalletUnavailable(_))));
    }

    #[test]
    fn test_access_error_mapping() {
        let rejected = RpcError::Rpc { code: 4001, message: "User rejected the request.".into() };
        assert!(matches!(access_error(rejected), AppError::UserRejected(_)));
        assert!(matches!(
            access_error(RpcError::Transport("refused".into())),
            AppError::WalletUnavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_watcher_reports_account_change() {
        let node = StubNode::start().await;
        let wallet = wallet(&node);
        let sub = wallet.subscribe().unwrap();

        // Let the watcher record its baseline.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = node.accounts()[1].clone();
        node.set_accounts(vec![second.clone()]);

        assert_eq!(next_event(&sub).await, WalletEvent::AccountsChanged(vec![second]));

        node.set_accounts(Vec::new());
        assert_eq!(next_event(&sub).await, WalletEvent::AccountsChanged(Vec::new()));
    }

    #[tokio::test]
    async fn test_watcher_reports_chain_change() {
        let node = StubNode::start().await;
        let wallet = wallet(&node);
        let sub = wallet.subscribe().unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        node.set_chain_id(11155111);

        assert_eq!(next_event(&sub).await, WalletEvent::ChainChanged(11155111));
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_watcher() {
        let node = StubNode::start().await;
        let wallet = wallet(&node);
        let WalletSubscription { events, handle } = wallet.subscribe().unwrap();

        handle.unsubscribe();

        let closed = tokio::time::timeout(Duration::from_secs(5), events.recv()).await.unwrap();
        assert!(closed.is_err());
    }

    #[test]
    fn test_contract_for_validates_addresses() {
        let rpc = RpcClient::builder().build();
        let wallet = RpcWallet::new(rpc.clone(), "0x5FbDB2315678afecb367f032d93F642f64180aa3", Duration::from_millis(20));
        assert!(wallet.contract_for("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").is_ok());
        assert!(wallet.contract_for("nope").is_err());

        let misconfigured = RpcWallet::new(rpc, "", Duration::from_millis(20));
        assert!(matches!(
            misconfigured.contract_for("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            Err(AppError::Config(_))
        ));
    }
}
