//! Error types for tron-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) — Main error type, returned by pipeline operations
//!   - [`AddressFormatError`] — Bad base-58 text, checksum, version or length
//!   - [`EncodingError`] — Call arguments that cannot be ABI-encoded
//!   - [`DecodingError`] — Call data or node responses that cannot be decoded
//!   - [`SignatureError`] — Malformed keys or signing failures
//!   - [`NodeError`] — Transport failures and chain-level rejections
//!
//! Codec and address errors happen before anything is sent. A [`NodeError`]
//! from triggering or broadcasting is terminal for that attempt; nothing is
//! retried automatically.
//!
//! # Example
//!
//! ```rust,no_run
//! use tron_kit::*;
//!
//! # async fn example(client: TronClient, key: SecretKey, contract: Address) -> Result<(), Error> {
//! match client.batch_transfer_token(&contract, &[], &key).await {
//!     Ok(outcome) => println!("settled: {:?}", outcome.status),
//!     Err(Error::Node(NodeError::BroadcastRejected { code, message })) => {
//!         println!("chain rejected the transaction: {code}: {message}");
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Error decoding or normalizing an address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressFormatError {
    #[error("Invalid base58 character '{character}' at index {index}")]
    InvalidCharacter { character: char, index: usize },

    #[error("Invalid address length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Address checksum mismatch")]
    ChecksumMismatch,

    #[error("Unexpected address version byte: expected 0x{expected:02x}, got 0x{actual:02x}")]
    UnexpectedVersion { expected: u8, actual: u8 },

    #[error("Invalid hex address: '{0}'")]
    InvalidHex(String),

    #[error("Invalid base58 text: {0}")]
    InvalidBase58(String),
}

/// Error encoding call arguments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Amount must not be negative: '{0}'")]
    NegativeAmount(String),

    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),

    #[error("Invalid address in field '{field}': {source}")]
    Address {
        field: String,
        #[source]
        source: AddressFormatError,
    },

    #[error("Function '{function}' cannot be encoded by this codec: {reason}")]
    UnsupportedDescriptor { function: String, reason: String },

    #[error("Argument count mismatch for '{function}': expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("Argument {index} of '{function}' does not match ABI type {expected}")]
    ArgumentType {
        function: String,
        index: usize,
        expected: String,
    },
}

/// Error decoding call data or a node response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodingError {
    #[error("Buffer too short: need {needed} bytes, have {actual}")]
    TooShort { needed: usize, actual: usize },

    #[error("Selector mismatch: expected {expected}, got {actual}")]
    SelectorMismatch { expected: String, actual: String },

    #[error("Offset {0} is not a multiple of 32")]
    MisalignedOffset(u64),

    #[error("Offset {offset} points outside a {len}-byte buffer")]
    OffsetOutOfBounds { offset: u64, len: usize },

    #[error("Array length {length} exceeds the remaining buffer")]
    LengthOutOfBounds { length: u64 },

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Missing field in node response: {0}")]
    MissingField(&'static str),

    #[error("Function '{function}' cannot be decoded by this codec: {reason}")]
    UnsupportedDescriptor { function: String, reason: String },
}

/// Error during signing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Signature component '{component}' does not fit in 32 bytes ({len} bytes)")]
    ComponentOverflow { component: &'static str, len: usize },

    #[error("Recovery id {0} is outside the supported domain (0, 1, 27, 28)")]
    InvalidRecoveryId(u8),

    #[error("Invalid transaction payload: {0}")]
    InvalidPayload(String),
}

// ============================================================================
// Node Errors
// ============================================================================

/// Errors talking to the chain node.
#[derive(Debug, Error)]
pub enum NodeError {
    // ─── Network/Transport ───
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed node response: {0}")]
    Malformed(String),

    // ─── Chain ───
    #[error("Chain error {code}: {message}")]
    ChainBusiness { code: String, message: String },

    #[error("Broadcast rejected ({code}): {message}")]
    BroadcastRejected { code: String, message: String },
}

impl NodeError {
    /// Returns true for failures below the chain's business logic (connection,
    /// non-2xx status, unreadable body).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            NodeError::Http(_) | NodeError::Transport { .. } | NodeError::Malformed(_)
        )
    }

    /// Returns true if the node understood the request and refused it.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            NodeError::ChainBusiness { .. } | NodeError::BroadcastRejected { .. }
        )
    }

    /// Create a business error, decoding a hex-encoded message when possible.
    pub fn chain_business(code: impl Into<String>, message: impl AsRef<str>) -> Self {
        NodeError::ChainBusiness {
            code: code.into(),
            message: decode_chain_message(message.as_ref()),
        }
    }

    /// Create a broadcast rejection, decoding a hex-encoded message when possible.
    pub fn broadcast_rejected(code: impl Into<String>, message: impl AsRef<str>) -> Self {
        NodeError::BroadcastRejected {
            code: code.into(),
            message: decode_chain_message(message.as_ref()),
        }
    }
}

/// Decode a node message that may be hex-encoded UTF-8.
///
/// Falls back to the raw text when it is not hex or not valid UTF-8, so a
/// rejection is never hidden behind a decoding failure.
pub fn decode_chain_message(message: &str) -> String {
    let trimmed = message.trim();
    let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if body.is_empty() || body.len() % 2 != 0 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return message.to_string();
    }
    match hex::decode(body) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) if !text.chars().any(|c| c.is_control() && c != '\n') => text,
            _ => message.to_string(),
        },
        Err(_) => message.to_string(),
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for tron-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ─── Codecs ───
    #[error(transparent)]
    Address(#[from] AddressFormatError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Decoding(#[from] DecodingError),

    // ─── Signing ───
    #[error("Signing failed: {0}")]
    Signature(#[from] SignatureError),

    // ─── Node ───
    #[error(transparent)]
    Node(#[from] NodeError),

    // ─── EVM provider ───
    #[error("EVM provider error: {0}")]
    Evm(String),
}
