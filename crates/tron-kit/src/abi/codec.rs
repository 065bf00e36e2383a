//! Parameter codec.
//!
//! Encodes call arguments into the packed 32-byte word layout and decodes
//! them back. Two shapes are supported: a single dynamic array of static
//! tuples (the batch transfer call) and a flat list of static `address` /
//! `uint256` arguments (the token reads and `approve`).
//!
//! A batch call with `N` tuples of `M` members is laid out as:
//!
//! ```text
//! selector (4) | offset = 0x20 (32) | length = N (32) | N x M words (32 each)
//! ```

use std::fmt;

use alloy_primitives::U256;

use super::descriptor::{AbiType, FunctionDescriptor, Param, field_names};
use crate::address::{Address, AddressCodec};
use crate::error::{DecodingError, EncodingError};
use crate::types::{TransferRequest, TransferRequestView};

/// Size of one ABI word.
pub const WORD: usize = 32;

const SELECTOR_LEN: usize = 4;

// ============================================================================
// EncodedCall
// ============================================================================

/// A selector followed by packed arguments.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedCall {
    signature: String,
    selector: [u8; 4],
    params: Vec<u8>,
}

impl EncodedCall {
    fn new(descriptor: &FunctionDescriptor, params: Vec<u8>) -> Self {
        Self {
            signature: descriptor.signature(),
            selector: descriptor.selector(),
            params,
        }
    }

    /// Canonical signature, sent to the node as `function_selector`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    /// Packed arguments without the selector.
    pub fn params(&self) -> &[u8] {
        &self.params
    }

    /// Hex of the packed arguments, sent to the node as `parameter`.
    pub fn params_hex(&self) -> String {
        hex::encode(&self.params)
    }

    /// Number of 32-byte words after the selector.
    pub fn word_count(&self) -> usize {
        self.params.len() / WORD
    }

    /// Selector and arguments as one byte string.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SELECTOR_LEN + self.params.len());
        out.extend_from_slice(&self.selector);
        out.extend_from_slice(&self.params);
        out
    }

    /// Hex of [`to_bytes`](Self::to_bytes).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Debug for EncodedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedCall")
            .field("signature", &self.signature)
            .field("selector", &hex::encode(self.selector))
            .field("words", &self.word_count())
            .finish()
    }
}

/// A static argument value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Uint(U256),
}

impl From<Address> for AbiValue {
    fn from(a: Address) -> Self {
        AbiValue::Address(a)
    }
}

impl From<U256> for AbiValue {
    fn from(v: U256) -> Self {
        AbiValue::Uint(v)
    }
}

// ============================================================================
// Tuple layout
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransferField {
    From,
    To,
    Token,
    Amount,
    BusinessId,
}

impl TransferField {
    fn resolve(param: &Param) -> Result<Self, String> {
        let (field, expected) = match param.name.as_str() {
            field_names::FROM => (TransferField::From, AbiType::Address),
            field_names::TO => (TransferField::To, AbiType::Address),
            field_names::TOKEN => (TransferField::Token, AbiType::Address),
            field_names::AMOUNT => (TransferField::Amount, AbiType::Uint256),
            field_names::BUSINESS_ID => (TransferField::BusinessId, AbiType::Uint256),
            other => return Err(format!("unknown tuple member '{other}'")),
        };
        if param.ty != expected {
            return Err(format!(
                "member '{}' must be {}, found {}",
                param.name, expected, param.ty
            ));
        }
        Ok(field)
    }
}

/// Resolve the tuple members of a batch descriptor into the fields they carry.
fn transfer_layout(descriptor: &FunctionDescriptor) -> Result<Vec<TransferField>, String> {
    let members = descriptor
        .tuple_array_members()
        .ok_or_else(|| "expected a single dynamic array of tuples".to_string())?;

    let layout = members
        .iter()
        .map(TransferField::resolve)
        .collect::<Result<Vec<_>, _>>()?;

    for required in [
        TransferField::From,
        TransferField::To,
        TransferField::Token,
        TransferField::Amount,
    ] {
        if !layout.contains(&required) {
            return Err(format!("missing tuple member {required:?}"));
        }
    }
    Ok(layout)
}

// ============================================================================
// ParameterCodec
// ============================================================================

/// Encodes and decodes function arguments.
///
/// The codec holds only the [`AddressCodec`] used to normalize address
/// arguments and to tag decoded addresses.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParameterCodec {
    addresses: AddressCodec,
}

impl ParameterCodec {
    pub fn new(addresses: AddressCodec) -> Self {
        Self { addresses }
    }

    pub fn address_codec(&self) -> &AddressCodec {
        &self.addresses
    }

    /// Encode a batch of transfer requests as the single tuple-array argument
    /// of `descriptor`.
    ///
    /// The descriptor's tuple members decide which request fields are written
    /// and in what order, one word each.
    pub fn encode_batch(
        &self,
        descriptor: &FunctionDescriptor,
        requests: &[TransferRequest],
    ) -> Result<EncodedCall, EncodingError> {
        let layout =
            transfer_layout(descriptor).map_err(|reason| EncodingError::UnsupportedDescriptor {
                function: descriptor.signature(),
                reason,
            })?;

        let mut params = Vec::with_capacity(WORD * (2 + requests.len() * layout.len()));
        params.extend_from_slice(&usize_word(WORD));
        params.extend_from_slice(&usize_word(requests.len()));

        for (i, request) in requests.iter().enumerate() {
            for field in &layout {
                let word = match field {
                    TransferField::From => self.address_word(request.from(), i, "from")?,
                    TransferField::To => self.address_word(request.to(), i, "to")?,
                    TransferField::Token => self.address_word(request.token(), i, "token")?,
                    TransferField::Amount => request.amount().to_be_bytes::<32>(),
                    TransferField::BusinessId => request.business_id().to_be_bytes::<32>(),
                };
                params.extend_from_slice(&word);
            }
        }

        Ok(EncodedCall::new(descriptor, params))
    }

    /// Decode call data produced by [`encode_batch`](Self::encode_batch).
    ///
    /// `data` starts with the selector. Address words contribute their low 20
    /// bytes; amount words are read as unsigned big-endian integers.
    pub fn decode_batch(
        &self,
        descriptor: &FunctionDescriptor,
        data: &[u8],
    ) -> Result<Vec<TransferRequestView>, DecodingError> {
        let layout =
            transfer_layout(descriptor).map_err(|reason| DecodingError::UnsupportedDescriptor {
                function: descriptor.signature(),
                reason,
            })?;

        if data.len() < SELECTOR_LEN {
            return Err(DecodingError::TooShort {
                needed: SELECTOR_LEN,
                actual: data.len(),
            });
        }
        let (selector, body) = data.split_at(SELECTOR_LEN);
        let expected = descriptor.selector();
        if selector != expected {
            return Err(DecodingError::SelectorMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(selector),
            });
        }

        let offset = read_word(body, 0)?;
        let offset = word_to_u64(offset).ok_or(DecodingError::OffsetOutOfBounds {
            offset: u64::MAX,
            len: body.len(),
        })?;
        if offset % WORD as u64 != 0 {
            return Err(DecodingError::MisalignedOffset(offset));
        }
        let array_start = usize::try_from(offset)
            .ok()
            .filter(|start| start.saturating_add(WORD) <= body.len())
            .ok_or(DecodingError::OffsetOutOfBounds {
                offset,
                len: body.len(),
            })?;

        let length_word = read_word(body, array_start)?;
        let length = word_to_u64(length_word).ok_or(DecodingError::LengthOutOfBounds {
            length: u64::MAX,
        })?;
        let items_start = array_start + WORD;
        let tuple_size = layout.len() * WORD;
        let available = (body.len() - items_start) / tuple_size;
        if length > available as u64 {
            return Err(DecodingError::LengthOutOfBounds { length });
        }

        let version = self.addresses.version();
        let mut views = Vec::with_capacity(length as usize);
        for i in 0..length as usize {
            let base = items_start + i * tuple_size;
            let mut from = None;
            let mut to = None;
            let mut token = None;
            let mut amount = None;
            let mut business_id = None;

            for (j, field) in layout.iter().enumerate() {
                let word = read_word(body, base + j * WORD)?;
                match field {
                    TransferField::From => from = Some(word_to_address(word, version)),
                    TransferField::To => to = Some(word_to_address(word, version)),
                    TransferField::Token => token = Some(word_to_address(word, version)),
                    TransferField::Amount => amount = Some(U256::from_be_slice(word)),
                    TransferField::BusinessId => business_id = Some(U256::from_be_slice(word)),
                }
            }

            views.push(TransferRequestView {
                from: from.ok_or(DecodingError::MissingField("from"))?,
                to: to.ok_or(DecodingError::MissingField("to"))?,
                token: token.ok_or(DecodingError::MissingField("token"))?,
                amount: amount.ok_or(DecodingError::MissingField("amount"))?,
                business_id,
            });
        }

        Ok(views)
    }

    /// Hex wrapper over [`decode_batch`](Self::decode_batch); accepts an
    /// optional `0x` prefix.
    pub fn decode_batch_hex(
        &self,
        descriptor: &FunctionDescriptor,
        data: &str,
    ) -> Result<Vec<TransferRequestView>, DecodingError> {
        self.decode_batch(descriptor, &decode_hex(data)?)
    }

    /// Encode a call whose inputs are all static `address` / `uint256` values.
    pub fn encode_call(
        &self,
        descriptor: &FunctionDescriptor,
        args: &[AbiValue],
    ) -> Result<EncodedCall, EncodingError> {
        let inputs = descriptor.inputs();
        if inputs.len() != args.len() {
            return Err(EncodingError::ArgumentCount {
                function: descriptor.signature(),
                expected: inputs.len(),
                actual: args.len(),
            });
        }

        let mut params = Vec::with_capacity(WORD * args.len());
        for (index, (param, arg)) in inputs.iter().zip(args).enumerate() {
            let word = match (&param.ty, arg) {
                (AbiType::Address, AbiValue::Address(addr)) => {
                    let payload = self
                        .addresses
                        .normalize_to_abi(&addr.to_network_bytes())
                        .map_err(|source| EncodingError::Address {
                            field: param.name.clone(),
                            source,
                        })?;
                    pad_left(&payload)
                }
                (AbiType::Uint256, AbiValue::Uint(value)) => value.to_be_bytes::<32>(),
                (AbiType::Address | AbiType::Uint256, _) => {
                    return Err(EncodingError::ArgumentType {
                        function: descriptor.signature(),
                        index,
                        expected: param.ty.canonical(),
                    });
                }
                (other, _) => {
                    return Err(EncodingError::UnsupportedDescriptor {
                        function: descriptor.signature(),
                        reason: format!("input '{}' has non-static type {}", param.name, other),
                    });
                }
            };
            params.extend_from_slice(&word);
        }

        Ok(EncodedCall::new(descriptor, params))
    }

    fn address_word(
        &self,
        address: &Address,
        index: usize,
        member: &str,
    ) -> Result<[u8; 32], EncodingError> {
        let payload = self
            .addresses
            .normalize_to_abi(&address.to_network_bytes())
            .map_err(|source| EncodingError::Address {
                field: format!("requests[{index}].{member}"),
                source,
            })?;
        Ok(pad_left(&payload))
    }
}

// ============================================================================
// Word helpers
// ============================================================================

/// Parse a non-negative decimal amount.
pub fn parse_amount(text: &str) -> Result<U256, EncodingError> {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return Err(EncodingError::NegativeAmount(text.to_string()));
    }
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EncodingError::InvalidAmount(text.to_string()));
    }
    U256::from_str_radix(trimmed, 10).map_err(|_| EncodingError::InvalidAmount(text.to_string()))
}

/// Decode the first word of a hex return value as `uint256`.
pub fn decode_uint_word(data: &str) -> Result<U256, DecodingError> {
    let bytes = decode_hex(data)?;
    Ok(U256::from_be_slice(read_word(&bytes, 0)?))
}

/// Decode hex text with an optional `0x` prefix.
pub fn decode_hex(data: &str) -> Result<Vec<u8>, DecodingError> {
    let data = data.trim();
    let body = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(body).map_err(|e| DecodingError::InvalidHex(e.to_string()))
}

/// Borrow the 32-byte word at `offset`.
pub fn read_word(data: &[u8], offset: usize) -> Result<&[u8], DecodingError> {
    let end = offset.checked_add(WORD).ok_or(DecodingError::TooShort {
        needed: usize::MAX,
        actual: data.len(),
    })?;
    data.get(offset..end).ok_or(DecodingError::TooShort {
        needed: end,
        actual: data.len(),
    })
}

/// Read a word as `u64`, or `None` if any of its high 24 bytes are set.
pub fn word_to_u64(word: &[u8]) -> Option<u64> {
    let (high, low) = word.split_at(WORD - 8);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(low);
    Some(u64::from_be_bytes(buf))
}

fn word_to_address(word: &[u8], version: u8) -> Address {
    let mut payload = [0u8; 20];
    payload.copy_from_slice(&word[WORD - 20..]);
    Address::new(version, payload)
}

fn usize_word(value: usize) -> [u8; 32] {
    U256::from(value).to_be_bytes::<32>()
}

fn pad_left(payload: &[u8; 20]) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[WORD - 20..].copy_from_slice(payload);
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::descriptor::{
        allowance, approve, balance_of, batch_transfer_token,
        batch_transfer_token_with_business_id, decimals,
    };

    fn addr(last: u8) -> Address {
        let mut p = [0u8; 20];
        p[19] = last;
        Address::tron(p)
    }

    fn request(amount: u64) -> TransferRequest {
        TransferRequest::new(addr(1), addr(2), addr(3), U256::from(amount))
    }

    fn word_hex(value: u64) -> String {
        format!("{value:064x}")
    }

    #[test]
    fn test_single_request_layout() {
        let codec = ParameterCodec::default();
        let call = codec
            .encode_batch(batch_transfer_token(), &[request(1000)])
            .unwrap();

        let hex = call.params_hex();
        assert_eq!(hex.len(), 6 * 64);
        assert_eq!(call.word_count(), 6);
        assert_eq!(&hex[0..64], word_hex(0x20));
        assert_eq!(&hex[64..128], word_hex(1));
        assert_eq!(&hex[128..192], word_hex(1));
        assert_eq!(&hex[192..256], word_hex(2));
        assert_eq!(&hex[256..320], word_hex(3));
        assert_eq!(&hex[320..384], word_hex(1000));

        assert_eq!(call.to_hex().len(), 8 + 6 * 64);
        assert_eq!(&call.to_hex()[..8], hex::encode(batch_transfer_token().selector()));

        let views = codec
            .decode_batch(batch_transfer_token(), &call.to_bytes())
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].amount, U256::from(1000u64));
        assert_eq!(views[0].business_id, None);
    }

    #[test]
    fn test_single_request_with_business_id_layout() {
        let codec = ParameterCodec::default();
        let req = request(1000).with_business_id(U256::from(77u64));
        let call = codec
            .encode_batch(batch_transfer_token_with_business_id(), &[req])
            .unwrap();

        let hex = call.params_hex();
        assert_eq!(hex.len(), 448);
        assert_eq!(&hex[384..448], word_hex(77));

        let views = codec
            .decode_batch(batch_transfer_token_with_business_id(), &call.to_bytes())
            .unwrap();
        assert_eq!(views[0].amount, U256::from(1000u64));
        assert_eq!(views[0].business_id, Some(U256::from(77u64)));
        assert!(views[0].matches(&req));
    }

    #[test]
    fn test_batch_roundtrip_sizes() {
        let codec = ParameterCodec::default();
        for n in [0usize, 1, 2, 5] {
            let requests: Vec<_> = (0..n)
                .map(|i| {
                    TransferRequest::new(
                        addr(i as u8 + 10),
                        addr(i as u8 + 20),
                        addr(3),
                        U256::from(i as u64) * U256::from(10u64).pow(U256::from(30u64)),
                    )
                })
                .collect();
            let call = codec.encode_batch(batch_transfer_token(), &requests).unwrap();
            assert_eq!(call.word_count(), 2 + 4 * n);

            let views = codec
                .decode_batch_hex(batch_transfer_token(), &format!("0x{}", call.to_hex()))
                .unwrap();
            assert_eq!(views.len(), n);
            for (view, req) in views.iter().zip(&requests) {
                assert!(view.matches(req));
            }
        }
    }

    #[test]
    fn test_encode_max_amount() {
        let codec = ParameterCodec::default();
        let req = TransferRequest::new(addr(1), addr(2), addr(3), U256::MAX);
        let call = codec.encode_batch(batch_transfer_token(), &[req]).unwrap();
        assert_eq!(&call.params_hex()[320..384], "f".repeat(64));
    }

    #[test]
    fn test_encode_rejects_foreign_version() {
        let codec = ParameterCodec::default();
        let foreign = Address::new(0xa0, [1u8; 20]);
        let req = TransferRequest::new(addr(1), foreign, addr(3), U256::from(1u64));
        let err = codec.encode_batch(batch_transfer_token(), &[req]).unwrap_err();
        match err {
            EncodingError::Address { field, .. } => assert_eq!(field, "requests[0].to"),
            other => panic!("Expected Address error, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_rejects_non_batch_descriptor() {
        let codec = ParameterCodec::default();
        let err = codec.encode_batch(approve(), &[request(1)]).unwrap_err();
        assert!(matches!(err, EncodingError::UnsupportedDescriptor { .. }));

        let odd = FunctionDescriptor::new("weird").input(
            "items",
            AbiType::array(AbiType::tuple([
                ("from", AbiType::Address),
                ("to", AbiType::Address),
                ("token", AbiType::Address),
                ("amount", AbiType::Address),
            ])),
        );
        assert!(matches!(
            codec.encode_batch(&odd, &[]).unwrap_err(),
            EncodingError::UnsupportedDescriptor { .. }
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_selector() {
        let codec = ParameterCodec::default();
        let mut data = codec
            .encode_batch(batch_transfer_token(), &[request(1)])
            .unwrap()
            .to_bytes();
        data[0] ^= 0xff;
        assert!(matches!(
            codec.decode_batch(batch_transfer_token(), &data).unwrap_err(),
            DecodingError::SelectorMismatch { .. }
        ));
        assert!(matches!(
            codec.decode_batch(batch_transfer_token(), &data[..2]).unwrap_err(),
            DecodingError::TooShort { needed: 4, actual: 2 }
        ));
    }

    #[test]
    fn test_decode_rejects_bad_offsets() {
        let codec = ParameterCodec::default();
        let selector = hex::encode(batch_transfer_token().selector());

        let misaligned = format!("{selector}{}{}", word_hex(0x21), word_hex(0));
        assert_eq!(
            codec
                .decode_batch_hex(batch_transfer_token(), &misaligned)
                .unwrap_err(),
            DecodingError::MisalignedOffset(0x21)
        );

        let outside = format!("{selector}{}{}", word_hex(0x200), word_hex(0));
        assert!(matches!(
            codec
                .decode_batch_hex(batch_transfer_token(), &outside)
                .unwrap_err(),
            DecodingError::OffsetOutOfBounds { offset: 0x200, .. }
        ));

        let huge = format!("{selector}{}{}", "ff".repeat(32), word_hex(0));
        assert!(matches!(
            codec.decode_batch_hex(batch_transfer_token(), &huge).unwrap_err(),
            DecodingError::OffsetOutOfBounds { .. }
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_items() {
        let codec = ParameterCodec::default();
        let call = codec
            .encode_batch(batch_transfer_token(), &[request(1), request(2)])
            .unwrap();
        let bytes = call.to_bytes();
        let truncated = &bytes[..bytes.len() - WORD];
        assert_eq!(
            codec
                .decode_batch(batch_transfer_token(), truncated)
                .unwrap_err(),
            DecodingError::LengthOutOfBounds { length: 2 }
        );
    }

    #[test]
    fn test_decode_ignores_high_address_bytes() {
        let codec = ParameterCodec::default();
        let mut bytes = codec
            .encode_batch(batch_transfer_token(), &[request(9)])
            .unwrap()
            .to_bytes();
        // High byte of the `from` word.
        bytes[4 + 2 * WORD] = 0x41;
        let views = codec.decode_batch(batch_transfer_token(), &bytes).unwrap();
        assert_eq!(views[0].from, addr(1));
    }

    #[test]
    fn test_encode_static_calls() {
        let codec = ParameterCodec::default();

        let call = codec.encode_call(decimals(), &[]).unwrap();
        assert_eq!(call.to_hex(), "313ce567");
        assert!(call.params().is_empty());

        let call = codec.encode_call(balance_of(), &[addr(1).into()]).unwrap();
        assert_eq!(call.params_hex(), word_hex(1));

        let call = codec
            .encode_call(allowance(), &[addr(1).into(), addr(2).into()])
            .unwrap();
        assert_eq!(call.params_hex(), format!("{}{}", word_hex(1), word_hex(2)));

        let call = codec
            .encode_call(approve(), &[addr(2).into(), U256::from(500u64).into()])
            .unwrap();
        assert_eq!(call.signature(), "approve(address,uint256)");
        assert_eq!(call.params_hex(), format!("{}{}", word_hex(2), word_hex(500)));
    }

    #[test]
    fn test_encode_static_call_argument_errors() {
        let codec = ParameterCodec::default();
        assert!(matches!(
            codec.encode_call(balance_of(), &[]).unwrap_err(),
            EncodingError::ArgumentCount { expected: 1, actual: 0, .. }
        ));
        assert!(matches!(
            codec
                .encode_call(balance_of(), &[U256::from(1u64).into()])
                .unwrap_err(),
            EncodingError::ArgumentType { index: 0, .. }
        ));
        assert!(matches!(
            codec.encode_call(batch_transfer_token(), &[addr(1).into()]).unwrap_err(),
            EncodingError::UnsupportedDescriptor { .. }
        ));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0").unwrap(), U256::ZERO);
        assert_eq!(parse_amount(" 1000 ").unwrap(), U256::from(1000u64));
        assert_eq!(
            parse_amount("1000000000000000000000000").unwrap(),
            U256::from(10u64).pow(U256::from(24u64))
        );
        assert_eq!(
            parse_amount("-100").unwrap_err(),
            EncodingError::NegativeAmount("-100".into())
        );
        assert!(matches!(
            parse_amount("").unwrap_err(),
            EncodingError::InvalidAmount(_)
        ));
        assert!(matches!(
            parse_amount("1.5").unwrap_err(),
            EncodingError::InvalidAmount(_)
        ));
        // 2^256 does not fit.
        let too_big = format!("{}0", U256::MAX);
        assert!(matches!(
            parse_amount(&too_big).unwrap_err(),
            EncodingError::InvalidAmount(_)
        ));
    }

    #[test]
    fn test_decode_uint_word() {
        assert_eq!(decode_uint_word(&word_hex(6)).unwrap(), U256::from(6u64));
        assert_eq!(
            decode_uint_word(&format!("0x{}", word_hex(18))).unwrap(),
            U256::from(18u64)
        );
        assert!(matches!(
            decode_uint_word("00ff").unwrap_err(),
            DecodingError::TooShort { needed: 32, actual: 2 }
        ));
        assert!(matches!(
            decode_uint_word("zz").unwrap_err(),
            DecodingError::InvalidHex(_)
        ));
    }

    #[test]
    fn test_word_to_u64() {
        let mut word = [0u8; 32];
        word[31] = 0x20;
        assert_eq!(word_to_u64(&word), Some(32));
        word[0] = 1;
        assert_eq!(word_to_u64(&word), None);
    }
}
