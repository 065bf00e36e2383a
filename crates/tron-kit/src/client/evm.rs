//! Contract calls on EVM chains through an external provider.
//!
//! This crate does not sign or send EVM transactions itself. A host plugs in
//! an [`EvmCallPath`] backed by its own SDK and gets the same
//! estimate-then-send sequence and the same call data encoding as the Tron
//! pipeline.

use std::future::Future;
use std::pin::Pin;

use alloy_primitives::{Address as EvmAddress, B256, Bytes, U256};
use tracing::{debug, info, warn};

use crate::abi::EncodedCall;
use crate::error::Error;
use crate::types::ReceiptStatus;

/// Boxed future returned by [`EvmCallPath`] methods.
pub type EvmFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'a>>;

/// A contract call to submit on an EVM chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmCall {
    pub to: EvmAddress,
    /// Selector followed by the encoded arguments.
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
}

impl EvmCall {
    pub fn new(to: EvmAddress, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
            value: U256::ZERO,
            gas_limit: None,
            gas_price: None,
        }
    }

    /// A call carrying the full call data of `call`.
    pub fn from_encoded(to: EvmAddress, call: &EncodedCall) -> Self {
        Self::new(to, call.to_bytes())
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Fill gas fields from `estimate` where none were set explicitly.
    pub fn with_estimate(mut self, estimate: &GasEstimate) -> Self {
        self.gas_limit.get_or_insert(estimate.gas_limit);
        self.gas_price.get_or_insert(estimate.gas_price);
        self
    }
}

/// Gas figures reported by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasEstimate {
    pub gas_limit: u64,
    /// Price per gas unit in wei.
    pub gas_price: u128,
}

impl GasEstimate {
    /// Upper bound on the fee in wei.
    pub fn max_cost(&self) -> U256 {
        U256::from(self.gas_limit).saturating_mul(U256::from(self.gas_price))
    }
}

/// Receipt of a mined EVM transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
}

impl EvmReceipt {
    pub fn status(&self) -> ReceiptStatus {
        match (self.block_number, self.success) {
            (None, _) => ReceiptStatus::Pending,
            (Some(_), true) => ReceiptStatus::Confirmed,
            (Some(_), false) => ReceiptStatus::Reverted,
        }
    }
}

/// Provider that estimates, signs, sends and waits for EVM transactions.
pub trait EvmCallPath: Send + Sync {
    fn estimate_gas<'a>(&'a self, call: &'a EvmCall) -> EvmFuture<'a, GasEstimate>;

    /// Send `call` and resolve once it is mined.
    fn send_and_wait<'a>(&'a self, call: &'a EvmCall) -> EvmFuture<'a, EvmReceipt>;
}

/// Estimate gas, attach the estimate and send.
pub async fn estimate_and_send(path: &dyn EvmCallPath, call: EvmCall) -> Result<EvmReceipt, Error> {
    let estimate = path.estimate_gas(&call).await?;
    debug!(
        to = %call.to,
        gas_limit = estimate.gas_limit,
        gas_price = estimate.gas_price,
        max_cost = %estimate.max_cost(),
        "gas estimated"
    );

    let call = call.with_estimate(&estimate);
    let receipt = path.send_and_wait(&call).await?;

    match receipt.status() {
        ReceiptStatus::Reverted => {
            warn!(tx_hash = %receipt.tx_hash, gas_used = receipt.gas_used, "evm transaction reverted")
        }
        status => info!(
            tx_hash = %receipt.tx_hash,
            %status,
            block = receipt.block_number.unwrap_or_default(),
            gas_used = receipt.gas_used,
            "evm transaction finished"
        ),
    }
    Ok(receipt)
}
