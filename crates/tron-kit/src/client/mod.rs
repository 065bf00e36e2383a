//! Client module for talking to a Tron node.
//!
//! This module provides the call pipeline and the pieces it is built from:
//!
//! - [`TronClient`] — The main client, the single entry point for all operations
//! - [`TronClientBuilder`] — Fluent builder for configuring the client
//! - [`BroadcastClient`] — Typed access to the node's wallet endpoints
//!
//! # Pipeline
//!
//! A state-changing call runs these stages strictly in order:
//!
//! | Stage | Type |
//! |-------|------|
//! | Encode arguments | [`ParameterCodec`](crate::abi::ParameterCodec) |
//! | Build skeleton | [`BroadcastClient::trigger_contract`] |
//! | Sign | [`TransactionSigner`] |
//! | Submit | [`BroadcastClient::broadcast`] |
//! | Confirm | [`ReceiptPoller`] |
//!
//! [`CallPipeline`] wires them together. [`PreflightChecker`] runs the
//! read-only balance and allowance checks a caller may want first.
//!
//! # EVM chains
//!
//! [`EvmCallPath`] is the seam for hosts that submit the same call data
//! through an EVM provider.

mod evm;
mod node;
mod pipeline;
mod preflight;
mod receipt;
mod signer;
mod transport;
mod tron;

#[cfg(test)]
pub(crate) mod test_support;

pub use evm::{EvmCall, EvmCallPath, EvmFuture, EvmReceipt, GasEstimate, estimate_and_send};
pub use node::{
    BROADCAST_TRANSACTION, BroadcastClient, BroadcastResult, ChainError, ChainResponse,
    GET_TRANSACTION_INFO_BY_ID, TRIGGER_CONSTANT_CONTRACT, TRIGGER_SMART_CONTRACT,
};
pub use pipeline::{CallOutcome, CallPipeline, MIN_VALIDITY_MS};
pub use preflight::{
    DecimalsCache, PreflightChecker, PreflightLine, PreflightStatus, PreflightSummary,
};
pub use receipt::{
    ERROR_STRING_SELECTOR, EXPIRATION_GRACE_MS, PollOutcome, ReceiptPoller, decode_revert_data,
};
pub use signer::{TransactionSigner, TxHashAlgorithm, normalize_recovery_id};
pub use transport::{API_KEY_HEADER, HttpResponse, HttpTransport, ReqwestTransport, TransportFuture};
pub use tron::{TronClient, TronClientBuilder};
