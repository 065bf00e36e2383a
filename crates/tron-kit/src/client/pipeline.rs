//! The build, sign, broadcast and confirm sequence for one contract call.

use alloy_primitives::U256;
use tracing::{debug, info, warn};

use super::node::BroadcastClient;
use super::receipt::{PollOutcome, ReceiptPoller};
use super::signer::TransactionSigner;
use crate::abi::{self, AbiValue, EncodedCall, FunctionDescriptor, ParameterCodec};
use crate::address::{Address, AddressCodec};
use crate::config::{ChainConfig, PollConfig};
use crate::error::Error;
use crate::types::{
    ReceiptStatus, SecretKey, TransactionInfo, TransferLogView, TransferRequest, now_millis,
};

/// Remaining validity below which signing logs a warning.
pub const MIN_VALIDITY_MS: i64 = 5_000;

/// What happened to a submitted call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutcome {
    pub tx_id: String,
    pub status: ReceiptStatus,
    /// `Transfer` events emitted by the transaction.
    pub transfers: Vec<TransferLogView>,
    /// Set for reverted transactions when the node gives a reason.
    pub revert_reason: Option<String>,
    /// The settled transaction info, if polling saw one.
    pub info: Option<TransactionInfo>,
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Runs contract calls one step after the other.
///
/// Nothing is retried: once the node has built a skeleton its expiration is
/// fixed, so a failed attempt has to start again from [`call`](Self::call).
#[derive(Clone, Debug)]
pub struct CallPipeline {
    node: BroadcastClient,
    signer: TransactionSigner,
    poller: ReceiptPoller,
    codec: ParameterCodec,
    fee_limit: i64,
    poll: PollConfig,
}

impl CallPipeline {
    pub fn new(node: BroadcastClient, config: &ChainConfig) -> Self {
        let addresses = AddressCodec::new(config.address_version);
        Self {
            poller: ReceiptPoller::new(node.clone(), addresses),
            node,
            signer: TransactionSigner::new(config.hash_algorithm),
            codec: ParameterCodec::new(addresses),
            fee_limit: config.fee_limit,
            poll: config.poll,
        }
    }

    pub fn codec(&self) -> &ParameterCodec {
        &self.codec
    }

    pub fn signer(&self) -> &TransactionSigner {
        &self.signer
    }

    /// Submit an encoded call to `contract` signed by `key` and wait for it.
    ///
    /// Errors before the broadcast is accepted are returned as `Err`. After
    /// that the outcome always comes back as `Ok`, with
    /// [`ReceiptStatus::Unknown`] if the polling budget ran out.
    pub async fn call(
        &self,
        contract: &Address,
        call: &EncodedCall,
        key: &SecretKey,
    ) -> Result<CallOutcome, Error> {
        let owner = key.address_with_version(self.codec.address_codec().version());
        info!(
            owner = %owner,
            contract = %contract,
            function = call.signature(),
            params_hex_len = call.params_hex().len(),
            fee_limit = self.fee_limit,
            "triggering contract"
        );

        let unsigned = self
            .node
            .trigger_contract(&owner, contract, call, self.fee_limit)
            .await?;
        debug!(tx_id = %unsigned.tx_id, "received transaction skeleton");

        if let Some(remaining) = unsigned.remaining_validity_ms(now_millis()) {
            if remaining < MIN_VALIDITY_MS {
                warn!(tx_id = %unsigned.tx_id, remaining_ms = remaining, "transaction is close to expiring");
            }
        }

        let signed = self.signer.sign(unsigned, key)?;
        let expiration = signed.transaction.expiration();

        let broadcast = self.node.broadcast(&signed).await?.into_accepted()?;
        info!(tx_id = %broadcast.tx_id, "broadcast accepted");

        let polled = self
            .poller
            .poll(
                &broadcast.tx_id,
                self.poll.max_attempts,
                self.poll.interval,
                expiration,
            )
            .await;
        Ok(self.finish(broadcast.tx_id, polled))
    }

    fn finish(&self, tx_id: String, polled: PollOutcome) -> CallOutcome {
        let (transfers, revert_reason) = match &polled.info {
            Some(info) => {
                let transfers = self.poller.decode_transfer_logs(info);
                let revert_reason = if polled.status == ReceiptStatus::Reverted {
                    self.poller
                        .decode_revert_reason(info)
                        .or_else(|| info.failure_message())
                } else {
                    None
                };
                (transfers, revert_reason)
            }
            None => (Vec::new(), None),
        };

        match &revert_reason {
            Some(reason) => warn!(tx_id = %tx_id, reason = %reason, "transaction reverted"),
            None => info!(
                tx_id = %tx_id,
                status = %polled.status,
                transfers = transfers.len(),
                attempts = polled.attempts,
                "call finished"
            ),
        }

        CallOutcome {
            tx_id,
            status: polled.status,
            transfers,
            revert_reason,
            info: polled.info,
        }
    }

    /// `batchTransferToken` on `contract` with four-member tuples.
    pub async fn batch_transfer_token(
        &self,
        contract: &Address,
        requests: &[TransferRequest],
        key: &SecretKey,
    ) -> Result<CallOutcome, Error> {
        self.batch_transfer_with(abi::batch_transfer_token(), contract, requests, key)
            .await
    }

    /// A batch transfer through any descriptor taking one transfer tuple array.
    pub async fn batch_transfer_with(
        &self,
        descriptor: &FunctionDescriptor,
        contract: &Address,
        requests: &[TransferRequest],
        key: &SecretKey,
    ) -> Result<CallOutcome, Error> {
        info!(contract = %contract, requests = requests.len(), "batch transfer");
        for (index, request) in requests.iter().enumerate() {
            debug!(index, %request, "batch entry");
        }
        let call = self.codec.encode_batch(descriptor, requests)?;
        self.call(contract, &call, key).await
    }

    /// `approve(spender, amount)` on `token`.
    pub async fn approve(
        &self,
        token: &Address,
        spender: &Address,
        amount: U256,
        key: &SecretKey,
    ) -> Result<CallOutcome, Error> {
        let call = self.codec.encode_call(
            abi::approve(),
            &[AbiValue::Address(*spender), AbiValue::Uint(amount)],
        )?;
        self.call(token, &call, key).await
    }
}
