//! Address codec.
//!
//! A Tron-style address is a 20-byte payload tagged with a one-byte network
//! version (`0x41` on Tron). The textual form is base-58 over
//! `version || payload || checksum`, where the checksum is the first four bytes
//! of `SHA-256(SHA-256(version || payload))`.
//!
//! Three byte shapes are in play:
//!
//! | Shape | Length | Used by |
//! |-------|--------|---------|
//! | ABI | 20 bytes | call parameters, event topics |
//! | network | 21 bytes | node API `owner_address` / `contract_address` |
//! | text | 25 bytes before base-58 | users, explorers |
//!
//! # Example
//!
//! ```
//! use tron_kit::{Address, AddressCodec};
//!
//! let usdt: Address = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t".parse().unwrap();
//! assert_eq!(usdt.to_hex(), "41a614f803b6fd780986a42c78ec9c7f77e6ded13c");
//!
//! let codec = AddressCodec::tron();
//! let same = codec.parse("0xa614f803b6fd780986a42c78ec9c7f77e6ded13c").unwrap();
//! assert_eq!(usdt, same);
//! ```

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::error::AddressFormatError;

/// Version byte of Tron addresses.
pub const TRON_ADDRESS_VERSION: u8 = 0x41;

/// Length of the ABI form of an address.
pub const ABI_ADDRESS_LEN: usize = 20;

/// Length of the version-tagged network form of an address.
pub const NETWORK_ADDRESS_LEN: usize = ABI_ADDRESS_LEN + 1;

const CHECKSUM_LEN: usize = 4;
const DECODED_LEN: usize = NETWORK_ADDRESS_LEN + CHECKSUM_LEN;

// ============================================================================
// Address
// ============================================================================

/// A 20-byte account or contract address tagged with its network version.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    version: u8,
    payload: [u8; ABI_ADDRESS_LEN],
}

impl Address {
    /// Create an address from a version byte and a 20-byte payload.
    pub const fn new(version: u8, payload: [u8; ABI_ADDRESS_LEN]) -> Self {
        Self { version, payload }
    }

    /// Create a Tron (`0x41`) address from a 20-byte payload.
    pub const fn tron(payload: [u8; ABI_ADDRESS_LEN]) -> Self {
        Self::new(TRON_ADDRESS_VERSION, payload)
    }

    /// Derive the address controlled by a secp256k1 public key.
    ///
    /// The payload is the last 20 bytes of Keccak-256 over the uncompressed
    /// point without its `0x04` prefix.
    pub fn from_verifying_key(key: &VerifyingKey, version: u8) -> Self {
        let point = key.to_encoded_point(false);
        let digest = Keccak256::digest(&point.as_bytes()[1..]);
        let mut payload = [0u8; ABI_ADDRESS_LEN];
        payload.copy_from_slice(&digest[12..]);
        Self::new(version, payload)
    }

    /// The network version byte.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The 20-byte ABI payload.
    pub fn payload(&self) -> &[u8; ABI_ADDRESS_LEN] {
        &self.payload
    }

    /// The 21-byte version-tagged form.
    pub fn to_network_bytes(&self) -> [u8; NETWORK_ADDRESS_LEN] {
        let mut out = [0u8; NETWORK_ADDRESS_LEN];
        out[0] = self.version;
        out[1..].copy_from_slice(&self.payload);
        out
    }

    /// The payload left-padded to a 32-byte ABI word.
    pub fn to_abi_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.payload);
        word
    }

    /// Lowercase 42-hex network form, as the node API expects it.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_network_bytes())
    }

    /// Lowercase 40-hex ABI form.
    pub fn to_abi_hex(&self) -> String {
        hex::encode(self.payload)
    }

    /// Base-58 check text.
    pub fn to_base58(&self) -> String {
        encode(&self.payload, self.version)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = AddressFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AddressCodec::tron().parse(s)
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressFormatError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// AddressCodec
// ============================================================================

/// Translates between textual addresses and their byte forms for one network.
///
/// The codec is stateless apart from the version byte it expects; every
/// decoding path checks it before trusting the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressCodec {
    version: u8,
}

impl Default for AddressCodec {
    fn default() -> Self {
        Self::tron()
    }
}

impl AddressCodec {
    /// Create a codec for the given version byte.
    pub const fn new(version: u8) -> Self {
        Self { version }
    }

    /// Codec for Tron (`0x41`) addresses.
    pub const fn tron() -> Self {
        Self::new(TRON_ADDRESS_VERSION)
    }

    /// The version byte this codec expects and produces.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Decode base-58 check text.
    ///
    /// Fails on characters outside the alphabet, a decoded length other than
    /// 25 bytes, a checksum mismatch, or a version byte other than this codec's.
    pub fn decode(&self, text: &str) -> Result<Address, AddressFormatError> {
        let raw = bs58::decode(text).into_vec().map_err(|e| match e {
            bs58::decode::Error::InvalidCharacter { character, index } => {
                AddressFormatError::InvalidCharacter { character, index }
            }
            other => AddressFormatError::InvalidBase58(other.to_string()),
        })?;

        if raw.len() != DECODED_LEN {
            return Err(AddressFormatError::InvalidLength {
                expected: DECODED_LEN,
                actual: raw.len(),
            });
        }

        let (body, checksum) = raw.split_at(NETWORK_ADDRESS_LEN);
        if checksum != &double_sha256(body)[..CHECKSUM_LEN] {
            return Err(AddressFormatError::ChecksumMismatch);
        }

        self.from_network_bytes(body)
    }

    /// Encode a payload under this codec's version byte.
    pub fn encode(&self, payload: &[u8; ABI_ADDRESS_LEN]) -> String {
        encode(payload, self.version)
    }

    /// Reduce a 20-byte or version-tagged 21-byte value to its ABI form.
    pub fn normalize_to_abi(&self, bytes: &[u8]) -> Result<[u8; ABI_ADDRESS_LEN], AddressFormatError> {
        match bytes.len() {
            ABI_ADDRESS_LEN => {
                let mut out = [0u8; ABI_ADDRESS_LEN];
                out.copy_from_slice(bytes);
                Ok(out)
            }
            NETWORK_ADDRESS_LEN => Ok(self.from_network_bytes(bytes)?.payload),
            actual => Err(AddressFormatError::InvalidLength {
                expected: ABI_ADDRESS_LEN,
                actual,
            }),
        }
    }

    /// Re-add the version byte to a 20-byte ABI value.
    ///
    /// Already-tagged 21-byte input is accepted when its version matches.
    pub fn normalize_to_network(
        &self,
        bytes: &[u8],
    ) -> Result<[u8; NETWORK_ADDRESS_LEN], AddressFormatError> {
        let payload = self.normalize_to_abi(bytes)?;
        Ok(Address::new(self.version, payload).to_network_bytes())
    }

    /// Parse any textual address form.
    ///
    /// Accepts base-58 check text, 40-hex ABI form and 42-hex network form,
    /// the hex forms with or without a `0x` prefix.
    pub fn parse(&self, text: &str) -> Result<Address, AddressFormatError> {
        let text = text.trim();
        let hex_body = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);

        let is_hex_form = matches!(hex_body.len(), 40 | 42)
            && hex_body.bytes().all(|b| b.is_ascii_hexdigit());

        if is_hex_form {
            let bytes = hex::decode(hex_body)
                .map_err(|_| AddressFormatError::InvalidHex(text.to_string()))?;
            let payload = self.normalize_to_abi(&bytes)?;
            return Ok(Address::new(self.version, payload));
        }

        if hex_body.len() != text.len() {
            // A 0x prefix promised hex.
            return Err(AddressFormatError::InvalidHex(text.to_string()));
        }

        self.decode(text)
    }

    fn from_network_bytes(&self, bytes: &[u8]) -> Result<Address, AddressFormatError> {
        if bytes.len() != NETWORK_ADDRESS_LEN {
            return Err(AddressFormatError::InvalidLength {
                expected: NETWORK_ADDRESS_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[0] != self.version {
            return Err(AddressFormatError::UnexpectedVersion {
                expected: self.version,
                actual: bytes[0],
            });
        }
        let mut payload = [0u8; ABI_ADDRESS_LEN];
        payload.copy_from_slice(&bytes[1..]);
        Ok(Address::new(bytes[0], payload))
    }
}

/// Encode a payload and version byte as base-58 check text.
pub fn encode(payload: &[u8; ABI_ADDRESS_LEN], version: u8) -> String {
    let mut buf = Vec::with_capacity(DECODED_LEN);
    buf.push(version);
    buf.extend_from_slice(payload);
    let checksum = double_sha256(&buf);
    buf.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    bs58::encode(buf).into_string()
}

fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}
