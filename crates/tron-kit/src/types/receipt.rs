//! Transaction info and settlement status.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::decode_chain_message;

/// Result string the node uses for successful execution.
pub const SUCCESS: &str = "SUCCESS";

/// Settlement status of a broadcast transaction.
///
/// `Confirmed`, `Reverted` and `Expired` are terminal. `Unknown` means the
/// polling budget ran out before the node reported anything; the transaction
/// may still land.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Pending,
    Confirmed,
    Reverted,
    Expired,
    Unknown,
}

impl ReceiptStatus {
    /// Returns true once the status can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReceiptStatus::Confirmed | ReceiptStatus::Reverted | ReceiptStatus::Expired
        )
    }

    /// Returns true if the transaction executed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, ReceiptStatus::Confirmed)
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReceiptStatus::Pending => "pending",
            ReceiptStatus::Confirmed => "confirmed",
            ReceiptStatus::Reverted => "reverted",
            ReceiptStatus::Expired => "expired",
            ReceiptStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Resource receipt attached to executed transactions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReceipt {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub energy_usage_total: Option<i64>,
    #[serde(default)]
    pub energy_fee: Option<i64>,
    #[serde(default)]
    pub net_usage: Option<i64>,
    #[serde(default)]
    pub net_fee: Option<i64>,
}

/// An event log entry.
///
/// `address` is the emitting contract in 40-hex ABI form; `topics` and
/// `data` are hex without a prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
}

/// Response of `/wallet/gettransactioninfobyid`.
///
/// Every field is optional: the node answers `{}` for transactions it has
/// not yet put in a block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub fee: Option<i64>,
    #[serde(default, rename = "blockNumber")]
    pub block_number: Option<i64>,
    #[serde(default, rename = "blockTimeStamp")]
    pub block_timestamp: Option<i64>,
    #[serde(default, rename = "contractResult")]
    pub contract_result: Vec<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub receipt: Option<ResourceReceipt>,
    #[serde(default)]
    pub log: Vec<LogEntry>,
    /// `FAILED` on failure; absent on success.
    #[serde(default)]
    pub result: Option<String>,
    /// Hex-encoded failure message.
    #[serde(default, rename = "resMessage")]
    pub res_message: Option<String>,
}

impl TransactionInfo {
    /// Returns true once the transaction is in a block.
    pub fn is_settled(&self) -> bool {
        self.block_number.is_some()
    }

    /// The execution result from the resource receipt, e.g. `SUCCESS` or `REVERT`.
    pub fn receipt_result(&self) -> Option<&str> {
        self.receipt.as_ref().and_then(|r| r.result.as_deref())
    }

    /// Returns true if the node reports a failed execution.
    pub fn is_failed(&self) -> bool {
        let receipt_failed = self.receipt_result().is_some_and(|r| r != SUCCESS);
        let result_failed = self.result.as_deref().is_some_and(|r| r != SUCCESS);
        receipt_failed || result_failed
    }

    /// Status implied by this response alone.
    pub fn status(&self) -> ReceiptStatus {
        match (self.is_settled(), self.is_failed()) {
            (false, _) => ReceiptStatus::Pending,
            (true, false) => ReceiptStatus::Confirmed,
            (true, true) => ReceiptStatus::Reverted,
        }
    }

    /// The node's failure message, hex-decoded when possible.
    pub fn failure_message(&self) -> Option<String> {
        self.res_message
            .as_deref()
            .filter(|m| !m.is_empty())
            .map(decode_chain_message)
    }
}

/// A decoded `Transfer(address,address,uint256)` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferLogView {
    /// The emitting token contract.
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
}
