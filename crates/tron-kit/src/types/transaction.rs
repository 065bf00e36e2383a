//! Transaction types.

use serde::{Deserialize, Serialize};

use super::Signature;
use crate::error::SignatureError;

/// A transaction skeleton prepared by the node, ready to be signed.
///
/// `raw_data` is kept as the node returned it so it can be echoed back
/// unchanged on broadcast; [`metadata`](Self::metadata) reads the typed fields
/// out of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    #[serde(default)]
    pub visible: bool,
    /// Transaction id as reported by the node.
    #[serde(rename = "txID")]
    pub tx_id: String,
    /// Human-readable mirror of `raw_data_hex`.
    pub raw_data: serde_json::Value,
    /// The bytes that are hashed and signed.
    pub raw_data_hex: String,
}

/// Typed view of the fields of `raw_data` this crate uses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionMetadata {
    /// Milliseconds since the epoch after which the chain drops the transaction.
    #[serde(default)]
    pub expiration: Option<i64>,
    /// Milliseconds since the epoch at which the node built the skeleton.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Maximum fee in sun.
    #[serde(default)]
    pub fee_limit: Option<i64>,
    #[serde(default)]
    pub ref_block_bytes: Option<String>,
    #[serde(default)]
    pub ref_block_hash: Option<String>,
}

impl UnsignedTransaction {
    /// Decode `raw_data_hex`.
    pub fn raw_bytes(&self) -> Result<Vec<u8>, SignatureError> {
        if self.raw_data_hex.is_empty() {
            return Err(SignatureError::InvalidPayload("raw_data_hex is empty".into()));
        }
        hex::decode(&self.raw_data_hex)
            .map_err(|e| SignatureError::InvalidPayload(format!("raw_data_hex: {e}")))
    }

    /// Typed metadata; missing or unreadable fields come back as `None`.
    pub fn metadata(&self) -> TransactionMetadata {
        TransactionMetadata::deserialize(&self.raw_data).unwrap_or_default()
    }

    /// Expiration timestamp in milliseconds, if present.
    pub fn expiration(&self) -> Option<i64> {
        self.metadata().expiration
    }

    /// Milliseconds of validity left at `now_ms`, negative once expired.
    pub fn remaining_validity_ms(&self, now_ms: i64) -> Option<i64> {
        self.expiration().map(|exp| exp - now_ms)
    }

    /// Attach a signature.
    pub fn with_signature(self, signature: Signature) -> SignedTransaction {
        SignedTransaction {
            transaction: self,
            signature,
        }
    }
}

/// A signed transaction in the shape `/wallet/broadcasttransaction` accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct SignedTransaction {
    pub transaction: UnsignedTransaction,
    pub signature: Signature,
}

impl SignedTransaction {
    pub fn tx_id(&self) -> &str {
        &self.transaction.tx_id
    }
}

impl Serialize for SignedTransaction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            visible: bool,
            #[serde(rename = "txID")]
            tx_id: &'a str,
            raw_data: &'a serde_json::Value,
            raw_data_hex: &'a str,
            signature: [String; 1],
        }

        Body {
            visible: self.transaction.visible,
            tx_id: &self.transaction.tx_id,
            raw_data: &self.transaction.raw_data,
            raw_data_hex: &self.transaction.raw_data_hex,
            signature: [self.signature.to_hex()],
        }
        .serialize(serializer)
    }
}

/// Current time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
