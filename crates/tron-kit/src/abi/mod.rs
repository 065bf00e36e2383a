//! Contract ABI: function descriptors and the parameter codec.

pub mod codec;
pub mod descriptor;

pub use codec::{
    AbiValue, EncodedCall, ParameterCodec, WORD, decode_hex, decode_uint_word, parse_amount,
    read_word, word_to_u64,
};
pub use descriptor::{
    AbiType, FunctionDescriptor, Param, allowance, approve, balance_of, batch_transfer_token,
    batch_transfer_token_with_business_id, compute_selector, decimals, field_names,
    transfer_event_topic,
};
