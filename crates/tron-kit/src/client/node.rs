//! Client for the node's wallet HTTP API.
//!
//! Every response is classified before it reaches the caller: non-2xx
//! statuses are transport errors, bodies that are not the expected JSON are
//! malformed, and embedded `code` / `Error` fields are business errors.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::transport::HttpTransport;
use crate::abi::EncodedCall;
use crate::address::Address;
use crate::error::{NodeError, decode_chain_message};
use crate::types::{SUCCESS, SignedTransaction, TransactionInfo, UnsignedTransaction};

pub const TRIGGER_SMART_CONTRACT: &str = "/wallet/triggersmartcontract";
pub const TRIGGER_CONSTANT_CONTRACT: &str = "/wallet/triggerconstantcontract";
pub const BROADCAST_TRANSACTION: &str = "/wallet/broadcasttransaction";
pub const GET_TRANSACTION_INFO_BY_ID: &str = "/wallet/gettransactioninfobyid";

// ============================================================================
// Response classification
// ============================================================================

/// A node response after business-error detection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainResponse<T> {
    Success(T),
    BusinessError { code: String, message: String },
    /// The body was not the JSON shape expected; carries the raw body.
    Malformed(String),
}

impl<T> ChainResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ChainResponse::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ChainResponse<U> {
        match self {
            ChainResponse::Success(v) => ChainResponse::Success(f(v)),
            ChainResponse::BusinessError { code, message } => {
                ChainResponse::BusinessError { code, message }
            }
            ChainResponse::Malformed(raw) => ChainResponse::Malformed(raw),
        }
    }

    pub fn into_result(self) -> Result<T, NodeError> {
        match self {
            ChainResponse::Success(v) => Ok(v),
            ChainResponse::BusinessError { code, message } => {
                Err(NodeError::ChainBusiness { code, message })
            }
            ChainResponse::Malformed(raw) => Err(NodeError::Malformed(raw)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TriggerResult {
    #[serde(default)]
    result: bool,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Response body shared by both trigger endpoints.
#[derive(Debug, Deserialize)]
struct TriggerResponse {
    #[serde(default)]
    result: Option<TriggerResult>,
    #[serde(default)]
    transaction: Option<UnsignedTransaction>,
    #[serde(default)]
    constant_result: Vec<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "Error")]
    error: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn business_error<T>(code: &str, message: Option<&str>) -> ChainResponse<T> {
    ChainResponse::BusinessError {
        code: code.to_string(),
        message: message.map(decode_chain_message).unwrap_or_default(),
    }
}

fn classify_trigger(body: &str) -> ChainResponse<TriggerResponse> {
    let response: TriggerResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(_) => return ChainResponse::Malformed(body.to_string()),
    };

    if let Some(error) = non_empty(&response.error) {
        let code = non_empty(&response.code).unwrap_or("Error");
        return business_error(code, Some(error));
    }
    if let Some(code) = non_empty(&response.code).filter(|c| *c != SUCCESS) {
        return business_error(code, non_empty(&response.message));
    }
    if let Some(result) = &response.result {
        if let Some(code) = non_empty(&result.code).filter(|c| *c != SUCCESS) {
            return business_error(code, non_empty(&result.message));
        }
        if !result.result {
            return business_error("FAILED", non_empty(&result.message));
        }
    }

    ChainResponse::Success(response)
}

/// Chain-reported error attached to a broadcast response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainError {
    pub code: String,
    pub message: String,
}

/// Outcome of submitting a signed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BroadcastResult {
    pub tx_id: String,
    pub accepted: bool,
    /// On rejection, the reason. On acceptance, an advisory the node attached.
    pub chain_error: Option<ChainError>,
}

impl BroadcastResult {
    /// Turn a rejection into [`NodeError::BroadcastRejected`].
    pub fn into_accepted(self) -> Result<Self, NodeError> {
        if self.accepted {
            return Ok(self);
        }
        let (code, message) = match self.chain_error {
            Some(ChainError { code, message }) => (code, message),
            None => ("NO_TXID".to_string(), String::new()),
        };
        Err(NodeError::BroadcastRejected { code, message })
    }
}

#[derive(Debug, Default, Deserialize)]
struct BroadcastResponse {
    #[serde(default)]
    result: bool,
    #[serde(default)]
    txid: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "Error")]
    error: Option<String>,
}

/// Classify a broadcast response.
///
/// A non-empty `Error` always rejects. Otherwise a non-empty `txid` always
/// accepts, whatever `result` says.
fn classify_broadcast(response: BroadcastResponse, submitted_tx_id: &str) -> BroadcastResult {
    let code = non_empty(&response.code).map(str::to_string);
    let message = non_empty(&response.message).map(decode_chain_message);

    if let Some(error) = non_empty(&response.error) {
        return BroadcastResult {
            tx_id: submitted_tx_id.to_string(),
            accepted: false,
            chain_error: Some(ChainError {
                code: code.unwrap_or_else(|| "Error".to_string()),
                message: decode_chain_message(error),
            }),
        };
    }

    if let Some(txid) = non_empty(&response.txid) {
        let chain_error = match (code, message) {
            (None, None) => None,
            (code, message) => Some(ChainError {
                code: code.unwrap_or_default(),
                message: message.unwrap_or_default(),
            }),
        };
        return BroadcastResult {
            tx_id: txid.to_string(),
            accepted: true,
            chain_error,
        };
    }

    let reason = if response.result {
        "result true without txid"
    } else {
        ""
    };
    BroadcastResult {
        tx_id: submitted_tx_id.to_string(),
        accepted: false,
        chain_error: Some(ChainError {
            code: code.unwrap_or_else(|| "NO_TXID".to_string()),
            message: message.unwrap_or_else(|| reason.to_string()),
        }),
    }
}

// ============================================================================
// BroadcastClient
// ============================================================================

/// Low-level client for the wallet endpoints.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct BroadcastClient {
    transport: Arc<dyn HttpTransport>,
}

impl BroadcastClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// POST and return the body of a 2xx response.
    async fn post(&self, path: &str, body: serde_json::Value) -> Result<String, NodeError> {
        let response = self.transport.post_json(path, body).await?;
        debug!(path, status = response.status, "node response");
        if !response.is_success() {
            return Err(NodeError::Transport {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response.body)
    }

    /// Ask the node to build a transaction calling `contract`.
    ///
    /// The returned skeleton still has to be signed. The node assigns its
    /// expiration and timestamp, so a skeleton that is not broadcast in time
    /// must be rebuilt rather than retried.
    pub async fn trigger_contract(
        &self,
        owner: &Address,
        contract: &Address,
        call: &EncodedCall,
        fee_limit: i64,
    ) -> Result<UnsignedTransaction, NodeError> {
        let body = json!({
            "owner_address": owner.to_hex(),
            "contract_address": contract.to_hex(),
            "function_selector": call.signature(),
            "parameter": call.params_hex(),
            "fee_limit": fee_limit,
            "visible": false,
        });
        let raw = self.post(TRIGGER_SMART_CONTRACT, body).await?;
        let response = classify_trigger(&raw).into_result()?;
        response.transaction.ok_or_else(|| {
            NodeError::Malformed(format!("trigger response without transaction: {raw}"))
        })
    }

    /// Run a read-only call and return its `constant_result` words.
    pub async fn trigger_constant_contract(
        &self,
        owner: &Address,
        contract: &Address,
        call: &EncodedCall,
    ) -> Result<Vec<String>, NodeError> {
        let body = json!({
            "owner_address": owner.to_hex(),
            "contract_address": contract.to_hex(),
            "function_selector": call.signature(),
            "parameter": call.params_hex(),
            "visible": false,
        });
        let raw = self.post(TRIGGER_CONSTANT_CONTRACT, body).await?;
        classify_trigger(&raw)
            .map(|r| r.constant_result)
            .into_result()
    }

    /// Submit a signed transaction.
    ///
    /// Rejections come back as `Ok` with `accepted == false`; use
    /// [`BroadcastResult::into_accepted`] to turn them into errors.
    pub async fn broadcast(&self, signed: &SignedTransaction) -> Result<BroadcastResult, NodeError> {
        let body = serde_json::to_value(signed)?;
        let raw = self.post(BROADCAST_TRANSACTION, body).await?;
        let response: BroadcastResponse =
            serde_json::from_str(&raw).map_err(|_| NodeError::Malformed(raw.clone()))?;

        let result = classify_broadcast(response, signed.tx_id());
        match &result.chain_error {
            Some(err) if result.accepted => {
                warn!(tx_id = %result.tx_id, code = %err.code, message = %err.message, "broadcast accepted with advisory");
            }
            Some(err) => {
                warn!(tx_id = %result.tx_id, code = %err.code, message = %err.message, "broadcast rejected");
            }
            None => debug!(tx_id = %result.tx_id, "broadcast accepted"),
        }
        Ok(result)
    }

    /// Look up execution info for a transaction.
    ///
    /// Returns an empty [`TransactionInfo`] while the transaction is not in a
    /// block.
    pub async fn transaction_info(&self, tx_id: &str) -> Result<TransactionInfo, NodeError> {
        let raw = self
            .post(GET_TRANSACTION_INFO_BY_ID, json!({ "value": tx_id }))
            .await?;
        if raw.trim().is_empty() {
            return Ok(TransactionInfo::default());
        }
        serde_json::from_str(&raw).map_err(|_| NodeError::Malformed(raw))
    }
}

impl std::fmt::Debug for BroadcastClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastClient").finish_non_exhaustive()
    }
}
