//! secp256k1 private keys.

use std::fmt::{self, Debug};
use std::str::FromStr;

use k256::ecdsa::{SigningKey, VerifyingKey};

use crate::address::{Address, TRON_ADDRESS_VERSION};
use crate::error::SignatureError;

/// A raw secp256k1 private key.
///
/// This crate does not store keys; the caller hands one in for each call.
/// `Debug` output never shows key material.
#[derive(Clone)]
pub struct SecretKey {
    inner: SigningKey,
}

impl SecretKey {
    /// Create from 32 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != 32 {
            return Err(SignatureError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let inner =
            SigningKey::from_slice(bytes).map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        Ok(Self { inner })
    }

    /// The public half.
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.inner.verifying_key()
    }

    /// The address this key controls under the given version byte.
    pub fn address_with_version(&self, version: u8) -> Address {
        Address::from_verifying_key(self.verifying_key(), version)
    }

    /// The Tron address this key controls.
    pub fn address(&self) -> Address {
        self.address_with_version(TRON_ADDRESS_VERSION)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl FromStr for SecretKey {
    type Err = SignatureError;

    /// Parse 64 hex characters, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let body = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(body)
            .map_err(|e| SignatureError::InvalidKey(format!("invalid hex: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

impl TryFrom<&str> for SecretKey {
    type Error = SignatureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(secp256k1:***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_parse_and_derive_address() {
        let key: SecretKey = KEY_ONE.parse().unwrap();
        assert_eq!(key.address().to_string(), "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC");

        let prefixed: SecretKey = format!("0x{KEY_ONE}").parse().unwrap();
        assert_eq!(prefixed.address(), key.address());
    }

    #[test]
    fn test_rejects_malformed_keys() {
        assert!(matches!(
            "zz".parse::<SecretKey>(),
            Err(SignatureError::InvalidKey(_))
        ));
        assert!(matches!(
            "0102".parse::<SecretKey>(),
            Err(SignatureError::InvalidKey(_))
        ));
        // Zero is not a valid scalar.
        assert!("00".repeat(32).parse::<SecretKey>().is_err());
        // Neither is the group order.
        assert!(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
                .parse::<SecretKey>()
                .is_err()
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let key: SecretKey = KEY_ONE.parse().unwrap();
        let debug = format!("{key:?}");
        assert_eq!(debug, "SecretKey(secp256k1:***)");
        assert!(!debug.contains("0001"));
    }
}
