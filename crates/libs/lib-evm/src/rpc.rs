//! # JSON-RPC Client
//!
//! Thin async wrapper over an Ethereum JSON-RPC endpoint.
//!
//! ## Features
//!
//! - **Typed requests**: `request::<T>(method, params)` decodes `result` into `T`
//! - **Account access**: `eth_requestAccounts` with an `eth_accounts` fallback
//!   for dev nodes that do not implement the EIP-1102 method
//! - **Reads**: `eth_call` against `latest`
//! - **Writes**: `eth_sendTransaction` plus receipt polling
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_evm::rpc::RpcClient;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), lib_evm::RpcError> {
//! let client = RpcClient::builder()
//!     .url("http://127.0.0.1:8545")
//!     .timeout(Duration::from_secs(10))
//!     .build();
//!
//! let chain_id = client.chain_id().await?;
//! let accounts = client.accounts().await?;
//! println!("chain {chain_id}, {} accounts", accounts.len());
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// EIP-1193 "user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC "method not found".
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;

/// Geth-style "execution reverted".
pub const EXECUTION_REVERTED_CODE: i64 = 3;

/// Errors produced by the JSON-RPC layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    /// The HTTP request failed or timed out.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, RpcError::Rpc { code, .. } if *code == USER_REJECTED_CODE)
    }

    pub fn is_method_not_found(&self) -> bool {
        matches!(self, RpcError::Rpc { code, .. } if *code == METHOD_NOT_FOUND_CODE)
    }

    /// Whether the node refused the call because execution reverted.
    ///
    /// Geth reports code 3; Hardhat reports an internal error whose message
    /// mentions the revert.
    pub fn is_revert(&self) -> bool {
        match self {
            RpcError::Rpc { code, message } => {
                *code == EXECUTION_REVERTED_CODE || message.to_ascii_lowercase().contains("revert")
            }
            _ => false,
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Transaction object for `eth_sendTransaction`.
///
/// `to` is omitted for contract creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub data: String,
}

impl TransactionRequest {
    pub fn call(from: &str, to: &str, data: &[u8]) -> Self {
        Self {
            from: from.to_string(),
            to: Some(to.to_string()),
            data: encode_hex(data),
        }
    }

    pub fn create(from: &str, init_code: &[u8]) -> Self {
        Self {
            from: from.to_string(),
            to: None,
            data: encode_hex(init_code),
        }
    }
}

/// Subset of `eth_getTransactionReceipt` used by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub block_number: Option<String>,
}

impl TransactionReceipt {
    /// `status` is `0x1` on success and `0x0` on revert. Receipts without a
    /// status field predate Byzantium and are treated as successful.
    pub fn succeeded(&self) -> bool {
        !matches!(self.status.as_deref(), Some("0x0"))
    }
}

/// Builder for configuring [`RpcClient`].
#[derive(Debug, Clone)]
pub struct RpcClientBuilder {
    url: String,
    timeout: Duration,
}

impl Default for RpcClientBuilder {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8545".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl RpcClientBuilder {
    /// Set the endpoint URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> RpcClient {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "HTTP client setup failed, using defaults without request timeout");
                Client::new()
            });

        RpcClient {
            http,
            url: Arc::from(self.url),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

/// JSON-RPC client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: Client,
    url: Arc<str>,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    pub fn builder() -> RpcClientBuilder {
        RpcClientBuilder::default()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and decode its `result`.
    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        trace!(id, method, "JSON-RPC request");

        let response = self
            .http
            .post(&*self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        let payload: RpcResponse = response.json().await.map_err(|e| {
            if status.is_success() {
                RpcError::InvalidResponse(format!("{}: {}", method, e))
            } else {
                RpcError::Transport(format!("HTTP {} from {}", status, self.url))
            }
        })?;

        if let Some(error) = payload.error {
            debug!(id, method, code = error.code, message = %error.message, "JSON-RPC error");
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        serde_json::from_value(payload.result.unwrap_or(Value::Null))
            .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", method, e)))
    }

    /// `eth_chainId`.
    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let quantity: String = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&quantity)
    }

    /// `eth_accounts`: accounts the node exposes without prompting.
    pub async fn accounts(&self) -> Result<Vec<String>, RpcError> {
        self.request("eth_accounts", json!([])).await
    }

    /// `eth_requestAccounts`, falling back to `eth_accounts` when the node
    /// does not know the method.
    pub async fn request_accounts(&self) -> Result<Vec<String>, RpcError> {
        match self.request("eth_requestAccounts", json!([])).await {
            Err(err) if err.is_method_not_found() => {
                debug!("eth_requestAccounts not supported, using eth_accounts");
                self.accounts().await
            }
            other => other,
        }
    }

    /// `eth_call` against the latest block; returns the raw return data.
    pub async fn call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, RpcError> {
        let result: String = self
            .request("eth_call", json!([{ "to": to, "data": encode_hex(data) }, "latest"]))
            .await?;
        decode_hex(&result)
    }

    /// `eth_sendTransaction`; returns the transaction hash.
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, RpcError> {
        self.request("eth_sendTransaction", json!([tx])).await
    }

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending.
    pub async fn transaction_receipt(&self, hash: &str) -> Result<Option<TransactionReceipt>, RpcError> {
        self.request("eth_getTransactionReceipt", json!([hash])).await
    }

    /// Poll until the receipt exists, i.e. the transaction has one confirmation.
    ///
    /// Does not time out on its own; callers bound the wait.
    pub async fn wait_for_receipt(&self, hash: &str, poll_interval: Duration) -> Result<TransactionReceipt, RpcError> {
        loop {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// `0x`-prefixed lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode `0x`-prefixed (or bare) hex.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, RpcError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|e| RpcError::InvalidResponse(format!("bad hex data: {}", e)))
}

/// Parse a JSON-RPC quantity such as `0x7a69`.
pub fn parse_quantity(value: &str) -> Result<u64, RpcError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    u64::from_str_radix(digits, 16).map_err(|e| RpcError::InvalidResponse(format!("bad quantity {}: {}", value, e)))
}
