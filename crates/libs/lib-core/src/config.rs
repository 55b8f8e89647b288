//! # Client Configuration
//!
//! Settings loaded from environment variables (and an optional `.env` file).
//! All values are validated before the client starts so a misconfigured
//! endpoint or contract address fails fast.
//!
//! | Variable | Default |
//! |---|---|
//! | `VOTING_RPC_URL` (or `SEPOLIA_RPC_URL`) | `http://127.0.0.1:8545` |
//! | `VOTING_CONTRACT_ADDRESS` | unset |
//! | `VOTING_VOTE_CAP` | `5` |
//! | `VOTING_TX_TIMEOUT_SECS` | `120` |
//! | `VOTING_RPC_TIMEOUT_SECS` | `10` |
//! | `VOTING_POLL_INTERVAL_MS` | `1000` |
//!
//! ```rust,no_run
//! use lib_core::config::Config;
//!
//! let config = Config::load()?;
//! println!("talking to {}", config.rpc_url);
//! # Ok::<(), lib_core::AppError>(())
//! ```

use std::time::Duration;

use lib_utils::envs::{get_env_opt, get_env_parse_or};
use lib_utils::validation::{validate_evm_address, validate_http_url};

use crate::error::{AppError, Result};

/// Local Hardhat node.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Per-account vote cap assumed by the display gate.
pub const DEFAULT_VOTE_CAP: u64 = 5;

/// Candidates passed to the constructor by the deploy helper.
pub const DEFAULT_CANDIDATES: [&str; 3] = ["Tarik Tambang", "Balap Karung", "Panjat Pinang"];

/// Client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// JSON-RPC endpoint of the node that also manages the signing accounts.
    pub rpc_url: String,

    /// Address of the deployed voting contract.
    ///
    /// Optional so the deploy helper can run before anything is deployed.
    pub contract_address: Option<String>,

    /// Vote count at which the vote action is disabled.
    ///
    /// The contract enforces its own cap; this value only mirrors it.
    pub vote_cap: u64,

    /// Upper bound on waiting for a vote transaction to confirm.
    pub tx_timeout: Duration,

    /// Per-request HTTP timeout.
    pub rpc_timeout: Duration,

    /// Interval for wallet-event and receipt polling.
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            contract_address: None,
            vote_cap: DEFAULT_VOTE_CAP,
            tx_timeout: Duration::from_secs(120),
            rpc_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(1000),
        }
    }
}

impl Config {
    /// Load `.env` (if present), read the environment and validate.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let rpc_url = get_env_opt("VOTING_RPC_URL")
            .or_else(|| get_env_opt("SEPOLIA_RPC_URL"))
            .unwrap_or(defaults.rpc_url);

        let contract_address = get_env_opt("VOTING_CONTRACT_ADDRESS");

        let vote_cap = get_env_parse_or("VOTING_VOTE_CAP", defaults.vote_cap)?;
        let tx_timeout_secs = get_env_parse_or("VOTING_TX_TIMEOUT_SECS", defaults.tx_timeout.as_secs())?;
        let rpc_timeout_secs = get_env_parse_or("VOTING_RPC_TIMEOUT_SECS", defaults.rpc_timeout.as_secs())?;
        let poll_interval_ms = get_env_parse_or(
            "VOTING_POLL_INTERVAL_MS",
            defaults.poll_interval.as_millis() as u64,
        )?;

        Ok(Self {
            rpc_url,
            contract_address,
            vote_cap,
            tx_timeout: Duration::from_secs(tx_timeout_secs),
            rpc_timeout: Duration::from_secs(rpc_timeout_secs),
            poll_interval: Duration::from_millis(poll_interval_ms),
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        validate_http_url(&self.rpc_url, "VOTING_RPC_URL").map_err(AppError::Config)?;

        if let Some(address) = &self.contract_address {
            validate_evm_address(address, "VOTING_CONTRACT_ADDRESS").map_err(AppError::Config)?;
        }

        if self.vote_cap == 0 {
            return Err(AppError::Config("VOTING_VOTE_CAP must be at least 1".to_string()));
        }

        if self.tx_timeout.is_zero() || self.rpc_timeout.is_zero() || self.poll_interval.is_zero() {
            return Err(AppError::Config("timeouts and poll interval must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Contract address, required by everything except deployment.
    pub fn require_contract_address(&self) -> Result<&str> {
        self.contract_address
            .as_deref()
            .ok_or_else(|| AppError::Config("VOTING_CONTRACT_ADDRESS must be set in environment".to_string()))
    }
}
