//! Declarative function descriptors.
//!
//! A [`FunctionDescriptor`] is built once per contract function and is the
//! single source for both the canonical signature text (and so the selector)
//! and the argument layout the encoder walks.

use std::fmt;
use std::sync::OnceLock;

use sha3::{Digest, Keccak256};

/// ABI types understood by the parameter codec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiType {
    /// 20-byte address, one left-padded word.
    Address,
    /// Unsigned 256-bit integer, one big-endian word.
    Uint256,
    /// Static tuple of named members.
    Tuple(Vec<Param>),
    /// Dynamic array of the inner type.
    Array(Box<AbiType>),
}

impl AbiType {
    /// Tuple type from `(name, type)` pairs.
    pub fn tuple<N: Into<String>>(members: impl IntoIterator<Item = (N, AbiType)>) -> Self {
        AbiType::Tuple(
            members
                .into_iter()
                .map(|(name, ty)| Param::new(name, ty))
                .collect(),
        )
    }

    /// Dynamic array of `inner`.
    pub fn array(inner: AbiType) -> Self {
        AbiType::Array(Box::new(inner))
    }

    /// Canonical type text, as it appears inside a function signature.
    pub fn canonical(&self) -> String {
        match self {
            AbiType::Address => "address".to_string(),
            AbiType::Uint256 => "uint256".to_string(),
            AbiType::Tuple(members) => {
                let inner: Vec<String> = members.iter().map(|p| p.ty.canonical()).collect();
                format!("({})", inner.join(","))
            }
            AbiType::Array(inner) => format!("{}[]", inner.canonical()),
        }
    }

    /// Returns true if the type is encoded out of line (behind an offset word).
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Address | AbiType::Uint256 => false,
            AbiType::Tuple(members) => members.iter().any(|p| p.ty.is_dynamic()),
            AbiType::Array(_) => true,
        }
    }

    /// Number of 32-byte words a static value of this type occupies inline.
    ///
    /// Returns `None` for dynamic types.
    pub fn static_words(&self) -> Option<usize> {
        match self {
            AbiType::Address | AbiType::Uint256 => Some(1),
            AbiType::Tuple(members) => members.iter().map(|p| p.ty.static_words()).sum(),
            AbiType::Array(_) => None,
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// A named parameter or tuple member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: AbiType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: AbiType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A contract function: its name and ordered inputs.
///
/// # Example
///
/// ```
/// use tron_kit::abi::{AbiType, FunctionDescriptor};
///
/// let transfer = FunctionDescriptor::new("transfer")
///     .input("to", AbiType::Address)
///     .input("value", AbiType::Uint256);
///
/// assert_eq!(transfer.signature(), "transfer(address,uint256)");
/// assert_eq!(hex::encode(transfer.selector()), "a9059cbb");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDescriptor {
    name: String,
    inputs: Vec<Param>,
}

impl FunctionDescriptor {
    /// Start a descriptor with no inputs.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
        }
    }

    /// Append an input parameter.
    pub fn input(mut self, name: impl Into<String>, ty: AbiType) -> Self {
        self.inputs.push(Param::new(name, ty));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[Param] {
        &self.inputs
    }

    /// Canonical signature text, e.g. `balanceOf(address)`.
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|p| p.ty.canonical()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// First four bytes of Keccak-256 over [`signature`](Self::signature).
    pub fn selector(&self) -> [u8; 4] {
        compute_selector(&self.signature())
    }

    /// Returns the member list when the only input is a dynamic array of tuples.
    pub fn tuple_array_members(&self) -> Option<&[Param]> {
        match self.inputs.as_slice() {
            [Param {
                ty: AbiType::Array(inner),
                ..
            }] => match inner.as_ref() {
                AbiType::Tuple(members) => Some(members),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// First four bytes of Keccak-256 of a canonical signature.
pub fn compute_selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&digest[..4]);
    selector
}

// ============================================================================
// Known functions
// ============================================================================

/// Tuple member names recognised by the batch encoder.
pub mod field_names {
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const TOKEN: &str = "token";
    pub const AMOUNT: &str = "amount";
    pub const BUSINESS_ID: &str = "businessId";
}

fn transfer_tuple(with_business_id: bool) -> AbiType {
    let mut fields = vec![
        (field_names::FROM, AbiType::Address),
        (field_names::TO, AbiType::Address),
        (field_names::TOKEN, AbiType::Address),
        (field_names::AMOUNT, AbiType::Uint256),
    ];
    if with_business_id {
        fields.push((field_names::BUSINESS_ID, AbiType::Uint256));
    }
    AbiType::tuple(fields)
}

/// `batchTransferToken((address,address,address,uint256)[])`
pub fn batch_transfer_token() -> &'static FunctionDescriptor {
    static DESCRIPTOR: OnceLock<FunctionDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        FunctionDescriptor::new("batchTransferToken")
            .input("requests", AbiType::array(transfer_tuple(false)))
    })
}

/// `batchTransferToken((address,address,address,uint256,uint256)[])`, the
/// variant whose tuples carry a business id.
pub fn batch_transfer_token_with_business_id() -> &'static FunctionDescriptor {
    static DESCRIPTOR: OnceLock<FunctionDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        FunctionDescriptor::new("batchTransferToken")
            .input("requests", AbiType::array(transfer_tuple(true)))
    })
}

/// `decimals()`
pub fn decimals() -> &'static FunctionDescriptor {
    static DESCRIPTOR: OnceLock<FunctionDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| FunctionDescriptor::new("decimals"))
}

/// `balanceOf(address)`
pub fn balance_of() -> &'static FunctionDescriptor {
    static DESCRIPTOR: OnceLock<FunctionDescriptor> = OnceLock::new();
    DESCRIPTOR
        .get_or_init(|| FunctionDescriptor::new("balanceOf").input("owner", AbiType::Address))
}

/// `allowance(address,address)`
pub fn allowance() -> &'static FunctionDescriptor {
    static DESCRIPTOR: OnceLock<FunctionDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        FunctionDescriptor::new("allowance")
            .input("owner", AbiType::Address)
            .input("spender", AbiType::Address)
    })
}

/// `approve(address,uint256)`
pub fn approve() -> &'static FunctionDescriptor {
    static DESCRIPTOR: OnceLock<FunctionDescriptor> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        FunctionDescriptor::new("approve")
            .input("spender", AbiType::Address)
            .input("value", AbiType::Uint256)
    })
}

/// Topic of `Transfer(address,address,uint256)`.
pub fn transfer_event_topic() -> [u8; 32] {
    Keccak256::digest(b"Transfer(address,address,uint256)").into()
}
