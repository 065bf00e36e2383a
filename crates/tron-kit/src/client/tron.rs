//! The main Tron client.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;

use super::node::BroadcastClient;
use super::pipeline::{CallOutcome, CallPipeline};
use super::preflight::{DecimalsCache, PreflightChecker, PreflightLine};
use super::receipt::{PollOutcome, ReceiptPoller};
use super::signer::TxHashAlgorithm;
use super::transport::{HttpTransport, ReqwestTransport};
use crate::abi::{EncodedCall, FunctionDescriptor, ParameterCodec};
use crate::address::{Address, AddressCodec};
use crate::config::{ChainConfig, PollConfig};
use crate::error::Error;
use crate::types::{Network, SecretKey, TransactionInfo, TransferRequest};

/// Client for contract calls against a Tron node.
///
/// One client shares a single HTTP transport and decimals cache across all
/// calls. Clones are cheap and share both.
///
/// # Example
///
/// ```rust,no_run
/// use tron_kit::*;
///
/// # async fn example() -> Result<(), tron_kit::Error> {
/// let client = TronClient::nile().api_key("...").build();
///
/// let key: SecretKey = "0000000000000000000000000000000000000000000000000000000000000001".parse()?;
/// let contract = client.parse_address("41a614f803b6fd780986a42c78ec9c7f77e6ded13c")?;
/// let token: Address = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t".parse()?;
///
/// let batch = [TransferRequest::new(key.address(), contract, token, U256::from(1_000u64))];
/// for line in client.preflight(&batch, &contract, &key.address()).await {
///     println!("{} {}", line.from, line.status);
/// }
///
/// let outcome = client.batch_transfer_token(&contract, &batch, &key).await?;
/// println!("{} {}", outcome.tx_id, outcome.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TronClient {
    config: Arc<ChainConfig>,
    node: BroadcastClient,
    pipeline: CallPipeline,
    poller: ReceiptPoller,
    preflight: PreflightChecker,
}

impl TronClient {
    /// Create a builder for mainnet.
    pub fn mainnet() -> TronClientBuilder {
        TronClientBuilder::new(ChainConfig::mainnet())
    }

    /// Create a builder for the Shasta testnet.
    pub fn shasta() -> TronClientBuilder {
        TronClientBuilder::new(ChainConfig::shasta())
    }

    /// Create a builder for the Nile testnet.
    pub fn nile() -> TronClientBuilder {
        TronClientBuilder::new(ChainConfig::nile())
    }

    /// Create a builder for a custom node URL.
    pub fn custom(node_url: impl Into<String>) -> TronClientBuilder {
        TronClientBuilder::new(ChainConfig::custom(node_url))
    }

    /// Create a builder from a full configuration.
    pub fn with_config(config: ChainConfig) -> TronClientBuilder {
        TronClientBuilder::new(config)
    }

    /// Create a client from environment variables.
    ///
    /// | Variable | Meaning |
    /// |----------|---------|
    /// | `TRON_NETWORK` | `mainnet`, `shasta`, `nile` or a node URL; defaults to `nile` |
    /// | `TRON_API_KEY` | sent as `TRON-PRO-API-KEY` |
    /// | `TRON_FEE_LIMIT` | fee limit in sun |
    /// | `TRON_POLL_ATTEMPTS` | receipt queries before giving up |
    /// | `TRON_POLL_INTERVAL_MS` | delay between receipt queries |
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a numeric variable does not parse or is
    /// not positive.
    pub fn from_env() -> Result<TronClient, Error> {
        let mut builder = match std::env::var("TRON_NETWORK").ok().as_deref() {
            Some("mainnet") => TronClient::mainnet(),
            Some("shasta") => TronClient::shasta(),
            Some("nile") | None => TronClient::nile(),
            Some(url) => TronClient::custom(url),
        };

        if let Ok(key) = std::env::var("TRON_API_KEY") {
            builder = builder.api_key(key);
        }
        if let Some(fee_limit) = env_positive::<i64>("TRON_FEE_LIMIT")? {
            builder = builder.fee_limit(fee_limit);
        }
        if let Some(attempts) = env_positive::<u32>("TRON_POLL_ATTEMPTS")? {
            builder = builder.poll_attempts(attempts);
        }
        if let Some(interval) = env_positive::<u64>("TRON_POLL_INTERVAL_MS")? {
            builder = builder.poll_interval(Duration::from_millis(interval));
        }

        Ok(builder.build())
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn network(&self) -> Network {
        self.config.network
    }

    pub fn node_url(&self) -> &str {
        &self.config.node_url
    }

    /// The node API client, for calls the high-level methods do not cover.
    pub fn node(&self) -> &BroadcastClient {
        &self.node
    }

    pub fn codec(&self) -> &ParameterCodec {
        self.pipeline.codec()
    }

    pub fn address_codec(&self) -> &AddressCodec {
        self.pipeline.codec().address_codec()
    }

    /// Parse an address in any accepted text form for this client's network.
    pub fn parse_address(&self, text: &str) -> Result<Address, Error> {
        Ok(self.address_codec().parse(text)?)
    }

    /// Build a transfer request whose addresses use this client's version byte.
    pub fn parse_request(
        &self,
        from: &str,
        to: &str,
        token: &str,
        amount: &str,
    ) -> Result<TransferRequest, Error> {
        Ok(TransferRequest::parse_with(
            self.address_codec(),
            from,
            to,
            token,
            amount,
        )?)
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// Submit an encoded call and wait for its outcome.
    pub async fn call(
        &self,
        contract: &Address,
        call: &EncodedCall,
        key: &SecretKey,
    ) -> Result<CallOutcome, Error> {
        self.pipeline.call(contract, call, key).await
    }

    /// Call `batchTransferToken` on `contract` and wait for its outcome.
    pub async fn batch_transfer_token(
        &self,
        contract: &Address,
        requests: &[TransferRequest],
        key: &SecretKey,
    ) -> Result<CallOutcome, Error> {
        self.pipeline
            .batch_transfer_token(contract, requests, key)
            .await
    }

    /// Batch transfer through a custom descriptor, e.g.
    /// [`batch_transfer_token_with_business_id`](crate::abi::batch_transfer_token_with_business_id).
    pub async fn batch_transfer_with(
        &self,
        descriptor: &FunctionDescriptor,
        contract: &Address,
        requests: &[TransferRequest],
        key: &SecretKey,
    ) -> Result<CallOutcome, Error> {
        self.pipeline
            .batch_transfer_with(descriptor, contract, requests, key)
            .await
    }

    /// Approve `spender` to move `amount` of `token` on behalf of the key's
    /// address.
    pub async fn approve(
        &self,
        token: &Address,
        spender: &Address,
        amount: U256,
        key: &SecretKey,
    ) -> Result<CallOutcome, Error> {
        self.pipeline.approve(token, spender, amount, key).await
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Check balances and allowances for a batch before submitting it.
    pub async fn preflight(
        &self,
        batch: &[TransferRequest],
        spender: &Address,
        caller: &Address,
    ) -> Vec<PreflightLine> {
        self.preflight.evaluate(batch, spender, caller).await
    }

    pub fn decimals_cache(&self) -> &Arc<DecimalsCache> {
        self.preflight.decimals_cache()
    }

    pub async fn transaction_info(&self, tx_id: &str) -> Result<TransactionInfo, Error> {
        Ok(self.node.transaction_info(tx_id).await?)
    }

    /// Poll a previously broadcast transaction with the configured budget.
    pub async fn wait_for(&self, tx_id: &str) -> PollOutcome {
        let poll = self.config.poll;
        self.poller
            .poll(tx_id, poll.max_attempts, poll.interval, None)
            .await
    }
}

impl std::fmt::Debug for TronClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TronClient")
            .field("network", &self.config.network)
            .field("node_url", &self.config.node_url)
            .finish()
    }
}

fn env_positive<T>(name: &str) -> Result<Option<T>, Error>
where
    T: FromStr + PartialOrd + Default,
    T::Err: Display,
{
    let Ok(raw) = std::env::var(name) else {
        return Ok(None);
    };
    let value: T = raw
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{name}={raw:?}: {e}")))?;
    if value <= T::default() {
        return Err(Error::Config(format!("{name} must be positive, got {raw:?}")));
    }
    Ok(Some(value))
}

/// Builder for creating a [`TronClient`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tron_kit::TronClient;
///
/// let client = TronClient::custom("http://127.0.0.1:8090")
///     .fee_limit(50_000_000)
///     .poll_attempts(20)
///     .poll_interval(Duration::from_secs(3))
///     .build();
/// assert_eq!(client.config().fee_limit, 50_000_000);
/// ```
pub struct TronClientBuilder {
    config: ChainConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    http_client: Option<reqwest::Client>,
    decimals: Option<Arc<DecimalsCache>>,
}

impl TronClientBuilder {
    fn new(config: ChainConfig) -> Self {
        Self {
            config,
            transport: None,
            http_client: None,
            decimals: None,
        }
    }

    /// Send `TRON-PRO-API-KEY` with every request.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    /// Fee limit in sun for state-changing calls.
    pub fn fee_limit(mut self, fee_limit: i64) -> Self {
        self.config.fee_limit = fee_limit;
        self
    }

    pub fn poll(mut self, poll: PollConfig) -> Self {
        self.config.poll = poll;
        self
    }

    pub fn poll_attempts(mut self, max_attempts: u32) -> Self {
        self.config.poll.max_attempts = max_attempts;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll.interval = interval;
        self
    }

    pub fn hash_algorithm(mut self, algorithm: TxHashAlgorithm) -> Self {
        self.config.hash_algorithm = algorithm;
        self
    }

    pub fn address_version(mut self, version: u8) -> Self {
        self.config.address_version = version;
        self
    }

    /// Use a preconfigured `reqwest::Client` for the default transport.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Replace the HTTP transport entirely.
    ///
    /// The API key and HTTP client settings are ignored when a transport is
    /// supplied.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Share a decimals cache with other clients.
    pub fn decimals_cache(mut self, cache: Arc<DecimalsCache>) -> Self {
        self.decimals = Some(cache);
        self
    }

    /// Build the client.
    pub fn build(self) -> TronClient {
        let config = self.config;
        let transport = self.transport.unwrap_or_else(|| {
            let mut transport = ReqwestTransport::new(config.node_url.clone());
            if let Some(client) = self.http_client {
                transport = transport.with_client(client);
            }
            if let Some(key) = &config.api_key {
                transport = transport.with_api_key(key.clone());
            }
            Arc::new(transport)
        });

        let node = BroadcastClient::new(transport);
        let pipeline = CallPipeline::new(node.clone(), &config);
        let addresses = AddressCodec::new(config.address_version);

        TronClient {
            poller: ReceiptPoller::new(node.clone(), addresses),
            preflight: PreflightChecker::new(
                node.clone(),
                ParameterCodec::new(addresses),
                self.decimals.unwrap_or_default(),
            ),
            pipeline,
            node,
            config: Arc::new(config),
        }
    }
}

impl From<TronClientBuilder> for TronClient {
    fn from(builder: TronClientBuilder) -> Self {
        builder.build()
    }
}
