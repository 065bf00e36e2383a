//! Transaction signing.
//!
//! Signing is one hash over the node-supplied `raw_data_hex` bytes followed
//! by a recoverable secp256k1 signature over that digest. The hash function
//! depends on the chain and is configuration, not code.
//!
//! # Example
//!
//! ```rust
//! use tron_kit::{SecretKey, TransactionSigner, TxHashAlgorithm};
//!
//! let key: SecretKey = "0000000000000000000000000000000000000000000000000000000000000001"
//!     .parse()
//!     .unwrap();
//! let signer = TransactionSigner::new(TxHashAlgorithm::Sha256);
//!
//! let digest = signer.hash(b"raw transaction bytes");
//! let signature = signer.sign_digest(&digest, &key).unwrap();
//! assert!(signature.v() == 27 || signature.v() == 28);
//! ```

use sha2::{Digest, Sha256};
use sha3::Keccak256;
use tracing::{debug, warn};

use crate::error::SignatureError;
use crate::types::{SecretKey, Signature, SignedTransaction, UnsignedTransaction};

/// Offset added to a raw recovery id to reach the 27/28 domain.
const RECOVERY_ID_OFFSET: u8 = 27;

/// Hash applied to raw transaction bytes before signing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TxHashAlgorithm {
    /// SHA-256, as on Tron.
    #[default]
    Sha256,
    /// Keccak-256.
    Keccak256,
}

impl TxHashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxHashAlgorithm::Sha256 => "sha256",
            TxHashAlgorithm::Keccak256 => "keccak256",
        }
    }
}

/// Map a raw recovery id into the 27/28 domain.
///
/// 0 and 1 become 27 and 28; 27 and 28 are returned unchanged, so applying
/// this twice is the same as applying it once. Anything else is an error.
pub fn normalize_recovery_id(v: u8) -> Result<u8, SignatureError> {
    match v {
        0 | 1 => Ok(v + RECOVERY_ID_OFFSET),
        27 | 28 => Ok(v),
        other => Err(SignatureError::InvalidRecoveryId(other)),
    }
}

/// Hashes and signs transaction payloads.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionSigner {
    algorithm: TxHashAlgorithm,
}

impl TransactionSigner {
    pub fn new(algorithm: TxHashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> TxHashAlgorithm {
        self.algorithm
    }

    /// One pass of the configured hash over `raw`.
    pub fn hash(&self, raw: &[u8]) -> [u8; 32] {
        match self.algorithm {
            TxHashAlgorithm::Sha256 => Sha256::digest(raw).into(),
            TxHashAlgorithm::Keccak256 => Keccak256::digest(raw).into(),
        }
    }

    /// Sign a 32-byte digest.
    pub fn sign_digest(
        &self,
        digest: &[u8; 32],
        key: &SecretKey,
    ) -> Result<Signature, SignatureError> {
        let (signature, recovery_id) = key
            .signing_key()
            .sign_prehash_recoverable(digest)
            .map_err(|e| SignatureError::SigningFailed(e.to_string()))?;

        let v = normalize_recovery_id(recovery_id.to_byte())?;
        let bytes = signature.to_bytes();
        let (r, s) = bytes.split_at(32);
        Signature::from_components(r, s, v)
    }

    /// Sign a node-built transaction skeleton.
    ///
    /// The transaction id is recomputed from `raw_data_hex`; a disagreement
    /// with the node's `txID` is logged but does not stop signing.
    pub fn sign(
        &self,
        transaction: UnsignedTransaction,
        key: &SecretKey,
    ) -> Result<SignedTransaction, SignatureError> {
        let raw = transaction.raw_bytes()?;
        let digest = self.hash(&raw);
        let computed = hex::encode(digest);

        if !computed.eq_ignore_ascii_case(&transaction.tx_id) {
            warn!(
                node_tx_id = %transaction.tx_id,
                computed_tx_id = %computed,
                algorithm = self.algorithm.as_str(),
                "transaction id from node does not match hash of raw_data_hex"
            );
        }

        let signature = self.sign_digest(&digest, key)?;
        debug!(tx_id = %transaction.tx_id, v = signature.v(), "signed transaction");
        Ok(transaction.with_signature(signature))
    }
}
