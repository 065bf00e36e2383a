//! Batch transfer requests.

use std::fmt;

use alloy_primitives::U256;

use crate::abi::parse_amount;
use crate::address::{Address, AddressCodec};
use crate::error::EncodingError;

/// One element of a batch transfer call.
///
/// Fields are fixed at construction; a list of requests is the single
/// argument of `batchTransferToken`.
///
/// # Example
///
/// ```
/// use tron_kit::TransferRequest;
///
/// let req = TransferRequest::parse(
///     "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC",
///     "T9yD14Nj9j7xAB4dbGeiX9h8unkKLxmGkn",
///     "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
///     "1000",
/// ).unwrap();
/// assert_eq!(req.amount().to_string(), "1000");
///
/// assert!(TransferRequest::parse(
///     "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC",
///     "T9yD14Nj9j7xAB4dbGeiX9h8unkKLxmGkn",
///     "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
///     "-5",
/// ).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransferRequest {
    from: Address,
    to: Address,
    token: Address,
    amount: U256,
    business_id: U256,
}

impl TransferRequest {
    /// Create a request with a zero business id.
    pub fn new(from: Address, to: Address, token: Address, amount: U256) -> Self {
        Self {
            from,
            to,
            token,
            amount,
            business_id: U256::ZERO,
        }
    }

    /// Return a copy carrying the given business id.
    pub fn with_business_id(self, business_id: U256) -> Self {
        Self {
            business_id,
            ..self
        }
    }

    /// Build a request from textual addresses and a decimal amount.
    ///
    /// Addresses may be in any form [`AddressCodec::parse`] accepts and use
    /// the Tron version byte. See [`parse_with`](Self::parse_with) for other
    /// networks.
    pub fn parse(from: &str, to: &str, token: &str, amount: &str) -> Result<Self, EncodingError> {
        Self::parse_with(&AddressCodec::tron(), from, to, token, amount)
    }

    /// Like [`parse`](Self::parse), with addresses read by `codec`.
    pub fn parse_with(
        codec: &AddressCodec,
        from: &str,
        to: &str,
        token: &str,
        amount: &str,
    ) -> Result<Self, EncodingError> {
        let field = |name: &str, text: &str| {
            codec.parse(text).map_err(|source| EncodingError::Address {
                field: name.to_string(),
                source,
            })
        };
        Ok(Self::new(
            field("from", from)?,
            field("to", to)?,
            field("token", token)?,
            parse_amount(amount)?,
        ))
    }

    pub fn from(&self) -> &Address {
        &self.from
    }

    pub fn to(&self) -> &Address {
        &self.to
    }

    pub fn token(&self) -> &Address {
        &self.token
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn business_id(&self) -> U256 {
        self.business_id
    }
}

impl fmt::Display for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} : {} of {}",
            self.from, self.to, self.amount, self.token
        )
    }
}

/// A transfer tuple decoded back out of call data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequestView {
    pub from: Address,
    pub to: Address,
    pub token: Address,
    pub amount: U256,
    /// Present only when the tuple layout carries a business id.
    pub business_id: Option<U256>,
}

impl TransferRequestView {
    /// Returns true if the view matches the request it was encoded from.
    pub fn matches(&self, request: &TransferRequest) -> bool {
        self.from.payload() == request.from.payload()
            && self.to.payload() == request.to.payload()
            && self.token.payload() == request.token.payload()
            && self.amount == request.amount
            && self.business_id.is_none_or(|id| id == request.business_id)
    }
}
