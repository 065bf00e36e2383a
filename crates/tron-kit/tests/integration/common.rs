//! An in-memory node for the integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tron_kit::abi::{self, transfer_event_topic};
use tron_kit::client::{
    BROADCAST_TRANSACTION, GET_TRANSACTION_INFO_BY_ID, TRIGGER_CONSTANT_CONTRACT,
    TRIGGER_SMART_CONTRACT, TransportFuture,
};
use tron_kit::*;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn key(byte: u8) -> SecretKey {
    SecretKey::from_bytes(&[byte; 32]).unwrap()
}

pub fn addr(last: u8) -> Address {
    let mut payload = [0u8; 20];
    payload[19] = last;
    Address::tron(payload)
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

fn word(value: U256) -> String {
    hex::encode(value.to_be_bytes::<32>())
}

#[derive(Clone, Debug)]
struct Pending {
    owner: String,
    call_data: Vec<u8>,
}

/// What a broadcast transaction should do once it lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Execution {
    Success,
    Revert,
}

#[derive(Default)]
struct State {
    built: HashMap<String, Pending>,
    /// tx id -> remaining "not yet in a block" answers.
    in_flight: HashMap<String, u32>,
    broadcast: Vec<Value>,
    balances: HashMap<(String, String), U256>,
    allowances: HashMap<(String, String), U256>,
    decimals: HashMap<String, u8>,
    constant_calls: usize,
}

/// Simulates a node: builds skeletons, checks signatures on broadcast and
/// settles transactions after a configurable number of polls.
pub struct MockNode {
    state: Mutex<State>,
    blocks_until_settled: u32,
    execution: Execution,
}

impl MockNode {
    pub fn new(blocks_until_settled: u32, execution: Execution) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State::default()),
            blocks_until_settled,
            execution,
        })
    }

    pub fn set_token(&self, token: &Address, decimals: u8) {
        self.state
            .lock()
            .unwrap()
            .decimals
            .insert(token.to_hex(), decimals);
    }

    pub fn set_balance(&self, token: &Address, owner: &Address, amount: u64) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert((token.to_hex(), owner.to_hex()), U256::from(amount));
    }

    pub fn set_allowance(&self, token: &Address, owner: &Address, amount: u64) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token.to_hex(), owner.to_hex()), U256::from(amount));
    }

    pub fn broadcasts(&self) -> Vec<Value> {
        self.state.lock().unwrap().broadcast.clone()
    }

    pub fn constant_calls(&self) -> usize {
        self.state.lock().unwrap().constant_calls
    }

    fn trigger(&self, body: &Value) -> Value {
        let owner = body["owner_address"].as_str().unwrap_or_default().to_string();
        let selector = abi::compute_selector(body["function_selector"].as_str().unwrap_or_default());
        let params = hex::decode(body["parameter"].as_str().unwrap_or_default()).unwrap();
        let call_data = [selector.as_slice(), &params].concat();

        // Any bytes do as long as the id is their hash.
        let raw = [owner.as_bytes(), &call_data, &now_millis().to_be_bytes()].concat();
        let tx_id = hex::encode(Sha256::digest(&raw));

        self.state
            .lock()
            .unwrap()
            .built
            .insert(tx_id.clone(), Pending { owner, call_data });

        json!({
            "result": { "result": true },
            "transaction": {
                "visible": false,
                "txID": tx_id,
                "raw_data": {
                    "expiration": now_millis() + 60_000,
                    "timestamp": now_millis(),
                    "fee_limit": body["fee_limit"]
                },
                "raw_data_hex": hex::encode(&raw)
            }
        })
    }

    fn broadcast(&self, body: &Value) -> Value {
        let mut state = self.state.lock().unwrap();
        state.broadcast.push(body.clone());

        let tx_id = body["txID"].as_str().unwrap_or_default().to_string();
        let Some(pending) = state.built.get(&tx_id) else {
            return json!({ "result": false, "code": "TRANSACTION_EXPIRATION_ERROR", "Error": "unknown transaction" });
        };

        let raw = hex::decode(body["raw_data_hex"].as_str().unwrap_or_default()).unwrap();
        let signature = hex::decode(body["signature"][0].as_str().unwrap_or_default()).unwrap();
        let digest: [u8; 32] = Sha256::digest(&raw).into();
        let recovered = EcdsaSignature::from_slice(&signature[..64])
            .ok()
            .zip(RecoveryId::from_byte(signature[64].wrapping_sub(27)))
            .and_then(|(sig, recid)| VerifyingKey::recover_from_prehash(&digest, &sig, recid).ok())
            .map(|vk| Address::from_verifying_key(&vk, 0x41).to_hex());

        if recovered.as_deref() != Some(pending.owner.as_str()) {
            return json!({
                "result": false,
                "code": "SIGERROR",
                "message": hex::encode("validate signature error")
            });
        }

        state.in_flight.insert(tx_id.clone(), self.blocks_until_settled);
        json!({ "result": true, "txid": tx_id })
    }

    fn transaction_info(&self, body: &Value) -> Value {
        let mut state = self.state.lock().unwrap();
        let tx_id = body["value"].as_str().unwrap_or_default().to_string();
        let Some(remaining) = state.in_flight.get_mut(&tx_id) else {
            return json!({});
        };
        if *remaining > 0 {
            *remaining -= 1;
            return json!({});
        }
        let Some(pending) = state.built.get(&tx_id) else {
            return json!({});
        };

        match self.execution {
            Execution::Success => {
                let logs: Vec<Value> = ParameterCodec::default()
                    .decode_batch(abi::batch_transfer_token(), &pending.call_data)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|view| {
                        json!({
                            "address": hex::encode(view.token.payload()),
                            "topics": [
                                hex::encode(transfer_event_topic()),
                                hex::encode(view.from.to_abi_word()),
                                hex::encode(view.to.to_abi_word())
                            ],
                            "data": word(view.amount)
                        })
                    })
                    .collect();
                json!({
                    "id": tx_id,
                    "blockNumber": 1_000,
                    "blockTimeStamp": now_millis(),
                    "fee": 27_000,
                    "receipt": { "result": "SUCCESS", "energy_usage_total": 60_000 },
                    "log": logs
                })
            }
            Execution::Revert => {
                let reason = "insufficient allowance";
                let mut data = hex::encode(reason);
                while data.len() % 64 != 0 {
                    data.push('0');
                }
                json!({
                    "id": tx_id,
                    "blockNumber": 1_000,
                    "receipt": { "result": "REVERT" },
                    "result": "FAILED",
                    "resMessage": hex::encode("REVERT opcode executed"),
                    "contractResult": [format!(
                        "08c379a0{}{}{}",
                        word(U256::from(32u64)),
                        word(U256::from(reason.len())),
                        data
                    )]
                })
            }
        }
    }

    fn constant(&self, body: &Value) -> Value {
        let mut state = self.state.lock().unwrap();
        state.constant_calls += 1;

        let token = body["contract_address"].as_str().unwrap_or_default().to_string();
        let params = body["parameter"].as_str().unwrap_or_default();
        let owner = params
            .get(24..64)
            .map(|payload| format!("41{payload}"))
            .unwrap_or_default();

        let value = match body["function_selector"].as_str() {
            Some("decimals()") => state.decimals.get(&token).map(|d| U256::from(*d)),
            Some("balanceOf(address)") => state.balances.get(&(token, owner)).copied(),
            Some("allowance(address,address)") => state.allowances.get(&(token, owner)).copied(),
            _ => None,
        };

        match value {
            Some(v) => json!({ "result": { "result": true }, "constant_result": [word(v)] }),
            None => json!({
                "result": { "code": "CONTRACT_VALIDATE_ERROR", "message": hex::encode("No contract or not a valid smart contract") }
            }),
        }
    }
}

impl HttpTransport for MockNode {
    fn post_json<'a>(&'a self, path: &'a str, body: Value) -> TransportFuture<'a> {
        let response = match path {
            TRIGGER_SMART_CONTRACT => self.trigger(&body),
            TRIGGER_CONSTANT_CONTRACT => self.constant(&body),
            BROADCAST_TRANSACTION => self.broadcast(&body),
            GET_TRANSACTION_INFO_BY_ID => self.transaction_info(&body),
            _ => return Box::pin(async move { Ok(HttpResponse::new(404, "Not Found")) }),
        };
        Box::pin(async move { Ok(HttpResponse::new(200, response.to_string())) })
    }
}

pub fn client(node: Arc<MockNode>) -> TronClient {
    TronClient::custom("http://mock-node")
        .transport(node)
        .poll_attempts(5)
        .poll_interval(std::time::Duration::from_millis(200))
        .build()
}
