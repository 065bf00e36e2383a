//! A Rust client for batch token transfers on Tron.
//!
//! **tron-kit** builds smart-contract calls, signs them with a secp256k1 key
//! and drives them through a node's HTTP wallet API until they settle.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tron_kit::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tron_kit::Error> {
//!     let client = TronClient::from_env()?;
//!     let key: SecretKey = std::env::var("TRON_PRIVATE_KEY").unwrap_or_default().parse()?;
//!
//!     let contract: Address = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t".parse()?;
//!     let batch = [TransferRequest::parse(
//!         "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
//!         "0x0000000000000000000000000000000000000002",
//!         "0x0000000000000000000000000000000000000003",
//!         "1000",
//!     )?];
//!
//!     let outcome = client.batch_transfer_token(&contract, &batch, &key).await?;
//!     println!("{}: {}", outcome.tx_id, outcome.status);
//!     Ok(())
//! }
//! ```
//!
//! # Layers
//!
//! - [`address`] - Base-58 check and hex address forms
//! - [`abi`] - Function descriptors and the parameter codec
//! - [`types`] - Transfer requests, transactions, signatures, receipts
//! - [`client`] - Transport, node API, signer, receipt poller, preflight and pipeline
//! - [`config`] - Per-network settings
//!
//! Every stage logs through `tracing`; installing a subscriber is left to
//! the application.

pub mod abi;
pub mod address;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use alloy_primitives::U256;

// Re-export commonly used types at crate root
pub use address::{Address, AddressCodec};
pub use config::{ChainConfig, PollConfig};
pub use error::{
    AddressFormatError, DecodingError, EncodingError, Error, NodeError, SignatureError,
};
pub use types::*;

// Re-export client types
pub use client::{
    BroadcastClient, BroadcastResult, CallOutcome, CallPipeline, DecimalsCache, EvmCall,
    EvmCallPath, EvmReceipt, GasEstimate, HttpResponse, HttpTransport, PollOutcome,
    PreflightChecker, PreflightLine, PreflightStatus, PreflightSummary, ReceiptPoller,
    ReqwestTransport, TransactionSigner, TronClient, TronClientBuilder, TxHashAlgorithm,
};

// Re-export ABI entry points
pub use abi::{AbiValue, EncodedCall, FunctionDescriptor, ParameterCodec};
