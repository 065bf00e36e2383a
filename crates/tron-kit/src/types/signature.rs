//! Recoverable secp256k1 signatures.

use std::fmt;

use crate::error::SignatureError;

/// A recoverable signature `{r, s, v}` with `v` in the 27/28 domain.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
    v: u8,
}

impl Signature {
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Self { r, s, v }
    }

    /// Build from variable-length `r` and `s` components, left-padding each to
    /// 32 bytes.
    pub fn from_components(r: &[u8], s: &[u8], v: u8) -> Result<Self, SignatureError> {
        Ok(Self::new(pad32(r, "r")?, pad32(s, "s")?, v))
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn v(&self) -> u8 {
        self.v
    }

    /// `r || s || v`, 65 bytes.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Lowercase hex of [`to_bytes`](Self::to_bytes), as the broadcast API wants it.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(v={}, {}..)", self.v, &hex::encode(self.r)[..8])
    }
}

fn pad32(component: &[u8], name: &'static str) -> Result<[u8; 32], SignatureError> {
    // Leading zeros beyond 32 bytes are harmless.
    let significant = match component.iter().position(|b| *b != 0) {
        Some(first) => &component[first..],
        None => &[],
    };
    if significant.len() > 32 {
        return Err(SignatureError::ComponentOverflow {
            component: name,
            len: significant.len(),
        });
    }
    let mut out = [0u8; 32];
    out[32 - significant.len()..].copy_from_slice(significant);
    Ok(out)
}
