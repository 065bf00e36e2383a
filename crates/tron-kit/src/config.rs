//! Chain configuration.
//!
//! A [`ChainConfig`] carries everything that differs between networks and
//! deployments: the node endpoint, the address version byte, the transaction
//! hash algorithm, the fee limit and the polling budget.

use std::time::Duration;

use crate::address::TRON_ADDRESS_VERSION;
use crate::client::TxHashAlgorithm;
use crate::types::Network;

/// Default fee limit in sun (10 TRX).
pub const DEFAULT_FEE_LIMIT: i64 = 10_000_000;

/// Default number of transaction-info queries before giving up.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 8;

/// Default delay between transaction-info queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Receipt polling budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Number of queries, each preceded by one interval.
    pub max_attempts: u32,
    /// Fixed delay between queries.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollConfig {
    /// Upper bound on the time spent polling.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// Per-network settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainConfig {
    pub network: Network,
    /// Base URL of the node's HTTP API, without a trailing `/wallet`.
    pub node_url: String,
    pub address_version: u8,
    /// Fee limit in sun for state-changing calls.
    pub fee_limit: i64,
    pub hash_algorithm: TxHashAlgorithm,
    pub poll: PollConfig,
    /// Sent as `TRON-PRO-API-KEY` when set.
    pub api_key: Option<String>,
}

impl ChainConfig {
    fn preset(network: Network, node_url: impl Into<String>) -> Self {
        Self {
            network,
            node_url: node_url.into(),
            address_version: TRON_ADDRESS_VERSION,
            fee_limit: DEFAULT_FEE_LIMIT,
            hash_algorithm: TxHashAlgorithm::default(),
            poll: PollConfig::default(),
            api_key: None,
        }
    }

    /// Tron mainnet through TronGrid.
    pub fn mainnet() -> Self {
        Self::preset(Network::Mainnet, "https://api.trongrid.io")
    }

    /// Shasta testnet.
    pub fn shasta() -> Self {
        Self::preset(Network::Shasta, "https://api.shasta.trongrid.io")
    }

    /// Nile testnet.
    pub fn nile() -> Self {
        Self::preset(Network::Nile, "https://nile.trongrid.io")
    }

    /// Any node speaking the same HTTP API.
    pub fn custom(node_url: impl Into<String>) -> Self {
        Self::preset(Network::Custom, node_url)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}
