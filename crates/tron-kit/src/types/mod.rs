//! Core types.
//!
//! Hand-written request and response types for the node's HTTP API, plus the
//! value types that flow through the call pipeline.

mod key;
mod network;
mod receipt;
mod signature;
mod transaction;
mod transfer;
mod units;

pub use key::SecretKey;
pub use network::Network;
pub use receipt::{
    LogEntry, ReceiptStatus, ResourceReceipt, SUCCESS, TransactionInfo, TransferLogView,
};
pub use signature::Signature;
pub(crate) use transaction::now_millis;
pub use transaction::{SignedTransaction, TransactionMetadata, UnsignedTransaction};
pub use transfer::{TransferRequest, TransferRequestView};
pub use units::{DEFAULT_DECIMALS, format_units};
