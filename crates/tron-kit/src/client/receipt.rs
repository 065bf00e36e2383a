//! Receipt polling and log decoding.

use std::time::Duration;

use alloy_primitives::U256;
use tracing::{debug, info, warn};

use super::node::BroadcastClient;
use crate::abi::{WORD, decode_hex, read_word, transfer_event_topic, word_to_u64};
use crate::address::{Address, AddressCodec};
use crate::types::{ReceiptStatus, TransactionInfo, TransferLogView, now_millis};

/// Selector of `Error(string)`.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// How long past its expiration a transaction may still show up in
/// transaction info. The endpoint lags inclusion by about one block.
pub const EXPIRATION_GRACE_MS: i64 = 3_000;

/// Result of a polling run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollOutcome {
    pub status: ReceiptStatus,
    /// The last settled response, present for `Confirmed` and `Reverted`.
    pub info: Option<TransactionInfo>,
    /// Number of queries issued.
    pub attempts: u32,
}

/// Polls transaction info until a terminal status or the budget runs out.
#[derive(Clone, Debug)]
pub struct ReceiptPoller {
    node: BroadcastClient,
    addresses: AddressCodec,
}

impl ReceiptPoller {
    pub fn new(node: BroadcastClient, addresses: AddressCodec) -> Self {
        Self { node, addresses }
    }

    /// Poll with a fixed interval and return the status.
    ///
    /// Each attempt waits `interval` and then queries the node once. Query
    /// failures are logged and use up an attempt. Running out of attempts
    /// yields [`ReceiptStatus::Unknown`], never an error.
    pub async fn poll_until_terminal(
        &self,
        tx_id: &str,
        max_attempts: u32,
        interval: Duration,
    ) -> ReceiptStatus {
        self.poll(tx_id, max_attempts, interval, None).await.status
    }

    /// Like [`poll_until_terminal`](Self::poll_until_terminal), but also
    /// reports [`ReceiptStatus::Expired`] once `expiration` (milliseconds since
    /// the epoch) plus [`EXPIRATION_GRACE_MS`] has passed with no record on the
    /// node.
    pub async fn poll_until_terminal_or_expired(
        &self,
        tx_id: &str,
        max_attempts: u32,
        interval: Duration,
        expiration: Option<i64>,
    ) -> ReceiptStatus {
        self.poll(tx_id, max_attempts, interval, expiration)
            .await
            .status
    }

    /// Full polling run, keeping the settled response.
    pub async fn poll(
        &self,
        tx_id: &str,
        max_attempts: u32,
        interval: Duration,
        expiration: Option<i64>,
    ) -> PollOutcome {
        for attempt in 1..=max_attempts {
            tokio::time::sleep(interval).await;

            match self.node.transaction_info(tx_id).await {
                Ok(info) if info.is_settled() => {
                    let status = info.status();
                    info!(
                        tx_id,
                        attempt,
                        %status,
                        block = info.block_number.unwrap_or_default(),
                        fee = info.fee.unwrap_or_default(),
                        receipt = info.receipt_result().unwrap_or("-"),
                        "transaction settled"
                    );
                    return PollOutcome {
                        status,
                        info: Some(info),
                        attempts: attempt,
                    };
                }
                Ok(_) => {
                    debug!(tx_id, attempt, max_attempts, "transaction not yet in a block");
                    let deadline = expiration.map(|exp| exp.saturating_add(EXPIRATION_GRACE_MS));
                    if deadline.is_some_and(|deadline| now_millis() > deadline) {
                        warn!(tx_id, attempt, "transaction expired without being included");
                        return PollOutcome {
                            status: ReceiptStatus::Expired,
                            info: None,
                            attempts: attempt,
                        };
                    }
                }
                Err(e) => {
                    warn!(tx_id, attempt, error = %e, "transaction info query failed");
                }
            }
        }

        warn!(tx_id, max_attempts, "no receipt within polling budget");
        PollOutcome {
            status: ReceiptStatus::Unknown,
            info: None,
            attempts: max_attempts,
        }
    }

    /// Extract `Transfer` events from a transaction's logs.
    ///
    /// Entries that are not transfers or do not decode are skipped.
    pub fn decode_transfer_logs(&self, info: &TransactionInfo) -> Vec<TransferLogView> {
        let topic = hex::encode(transfer_event_topic());
        let mut transfers = Vec::new();

        for (index, log) in info.log.iter().enumerate() {
            let Some(first) = log.topics.first() else {
                continue;
            };
            if !strip_0x(first).eq_ignore_ascii_case(&topic) {
                continue;
            }
            match self.decode_transfer(&log.address, &log.topics, &log.data) {
                Some(view) => {
                    debug!(
                        token = %view.token,
                        from = %view.from,
                        to = %view.to,
                        value = %view.value,
                        "transfer event"
                    );
                    transfers.push(view);
                }
                None => debug!(index, "skipping malformed transfer log"),
            }
        }

        transfers
    }

    fn decode_transfer(
        &self,
        address: &str,
        topics: &[String],
        data: &str,
    ) -> Option<TransferLogView> {
        if topics.len() < 3 {
            return None;
        }
        let token = self.addresses.parse(address).ok()?;
        let from = self.topic_address(&topics[1])?;
        let to = self.topic_address(&topics[2])?;
        let data = decode_hex(data).ok()?;
        let value = U256::from_be_slice(read_word(&data, 0).ok()?);
        Some(TransferLogView {
            token,
            from,
            to,
            value,
        })
    }

    fn topic_address(&self, topic: &str) -> Option<Address> {
        let word = decode_hex(topic).ok()?;
        if word.len() != WORD {
            return None;
        }
        let mut payload = [0u8; 20];
        payload.copy_from_slice(&word[WORD - 20..]);
        Some(Address::new(self.addresses.version(), payload))
    }

    /// Find an `Error(string)` revert payload in the contract results.
    pub fn decode_revert_reason(&self, info: &TransactionInfo) -> Option<String> {
        info.contract_result
            .iter()
            .find_map(|result| decode_revert_data(result))
    }
}

/// Decode the message of an `Error(string)` payload inside `hex_data`.
///
/// The selector may appear anywhere at a byte boundary. Returns `None` when
/// it is absent or the payload is truncated.
pub fn decode_revert_data(hex_data: &str) -> Option<String> {
    let bytes = decode_hex(hex_data).ok()?;
    let start = bytes
        .windows(ERROR_STRING_SELECTOR.len())
        .position(|w| w == ERROR_STRING_SELECTOR)?;
    let body = &bytes[start + ERROR_STRING_SELECTOR.len()..];

    let offset = usize::try_from(word_to_u64(read_word(body, 0).ok()?)?).ok()?;
    let length = usize::try_from(word_to_u64(read_word(body, offset).ok()?)?).ok()?;
    let text_start = offset.checked_add(WORD)?;
    let text = body.get(text_start..text_start.checked_add(length)?)?;
    String::from_utf8(text.to_vec()).ok()
}

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}
