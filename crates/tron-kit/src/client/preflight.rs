//! Read-only balance and allowance checks ahead of a batch transfer.
//!
//! Preflight is advisory: it reports which requests look underfunded but
//! never blocks a submission. Balances and allowances are read once per
//! `(token, from)` pair and decimals once per token; every request is then
//! classified on its own amount. Classification compares raw integers;
//! decimals only feed the human-readable values.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use alloy_primitives::U256;
use futures::future::join_all;
use tracing::{info, warn};

use super::node::BroadcastClient;
use crate::abi::{self, AbiValue, EncodedCall, ParameterCodec, decode_uint_word};
use crate::address::Address;
use crate::error::{DecodingError, Error};
use crate::types::{DEFAULT_DECIMALS, TransferRequest, format_units};

// ============================================================================
// DecimalsCache
// ============================================================================

/// Token decimals keyed by contract address.
///
/// Each key is written at most once; later writes for the same key are
/// ignored. Share one cache across checkers with an `Arc`.
#[derive(Debug, Default)]
pub struct DecimalsCache {
    entries: RwLock<HashMap<Address, u8>>,
}

impl DecimalsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, token: &Address) -> Option<u8> {
        self.entries.read().ok()?.get(token).copied()
    }

    pub fn insert(&self, token: Address, decimals: u8) {
        if let Ok(mut entries) = self.entries.write() {
            entries.entry(token).or_insert(decimals);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Lines
// ============================================================================

/// Classification of one request line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PreflightStatus {
    Ok,
    InsufficientBalance,
    InsufficientAllowance,
    InsufficientBoth,
}

impl PreflightStatus {
    /// Classify a required amount against a balance and an allowance.
    ///
    /// A value that could not be read counts as insufficient.
    pub fn classify(required: U256, balance: Option<U256>, allowance: Option<U256>) -> Self {
        let balance_short = balance.is_none_or(|b| b < required);
        let allowance_short = allowance.is_none_or(|a| a < required);
        match (balance_short, allowance_short) {
            (false, false) => PreflightStatus::Ok,
            (true, false) => PreflightStatus::InsufficientBalance,
            (false, true) => PreflightStatus::InsufficientAllowance,
            (true, true) => PreflightStatus::InsufficientBoth,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, PreflightStatus::Ok)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreflightStatus::Ok => "OK",
            PreflightStatus::InsufficientBalance => "INSUFFICIENT_BALANCE",
            PreflightStatus::InsufficientAllowance => "INSUFFICIENT_ALLOWANCE",
            PreflightStatus::InsufficientBoth => "INSUFFICIENT_BALANCE+ALLOWANCE",
        }
    }
}

impl fmt::Display for PreflightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result for one request of the batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreflightLine {
    /// Position of the request in the batch.
    pub index: usize,
    pub token: Address,
    pub from: Address,
    pub to: Address,
    /// The request's own amount, in raw token units.
    pub amount: U256,
    /// `None` when the lookup failed.
    pub balance: Option<U256>,
    /// `None` when the lookup failed.
    pub allowance: Option<U256>,
    /// Token decimals, or the default when the token did not report them.
    pub decimals: u8,
    pub status: PreflightStatus,
}

impl PreflightLine {
    pub fn amount_display(&self) -> String {
        format_units(self.amount, self.decimals)
    }

    pub fn balance_display(&self) -> Option<String> {
        self.balance.map(|b| format_units(b, self.decimals))
    }

    pub fn allowance_display(&self) -> Option<String> {
        self.allowance.map(|a| format_units(a, self.decimals))
    }
}

/// Counts per status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreflightSummary {
    pub ok: usize,
    pub insufficient_balance: usize,
    pub insufficient_allowance: usize,
    pub insufficient_both: usize,
}

impl PreflightSummary {
    pub fn of(lines: &[PreflightLine]) -> Self {
        lines.iter().fold(Self::default(), |mut s, line| {
            match line.status {
                PreflightStatus::Ok => s.ok += 1,
                PreflightStatus::InsufficientBalance => s.insufficient_balance += 1,
                PreflightStatus::InsufficientAllowance => s.insufficient_allowance += 1,
                PreflightStatus::InsufficientBoth => s.insufficient_both += 1,
            }
            s
        })
    }

    pub fn all_ok(&self) -> bool {
        self.insufficient_balance + self.insufficient_allowance + self.insufficient_both == 0
    }
}

// ============================================================================
// PreflightChecker
// ============================================================================

/// Evaluates a batch against on-chain balances and allowances.
#[derive(Clone, Debug)]
pub struct PreflightChecker {
    node: BroadcastClient,
    codec: ParameterCodec,
    decimals: Arc<DecimalsCache>,
}

impl PreflightChecker {
    pub fn new(node: BroadcastClient, codec: ParameterCodec, decimals: Arc<DecimalsCache>) -> Self {
        Self {
            node,
            codec,
            decimals,
        }
    }

    pub fn decimals_cache(&self) -> &Arc<DecimalsCache> {
        &self.decimals
    }

    /// Evaluate every request in `batch`.
    ///
    /// `spender` is the contract that will move the tokens; `caller` is the
    /// `owner_address` used for the read-only calls. Decimals are resolved
    /// once per distinct token and balance/allowance once per distinct
    /// `(token, from)` pair, all concurrently. Lines come back in batch order.
    pub async fn evaluate(
        &self,
        batch: &[TransferRequest],
        spender: &Address,
        caller: &Address,
    ) -> Vec<PreflightLine> {
        let tokens = first_seen(batch.iter().map(|r| *r.token()));
        let pairs = first_seen(batch.iter().map(|r| (*r.token(), *r.from())));

        let (decimals, funds) = futures::join!(
            join_all(tokens.iter().map(|token| self.token_decimals(token, caller))),
            join_all(pairs.iter().map(|(token, from)| async move {
                futures::join!(
                    self.balance_of(token, from, caller),
                    self.allowance(token, from, spender, caller),
                )
            })),
        );
        let decimals: HashMap<Address, u8> = tokens.into_iter().zip(decimals).collect();
        let funds: HashMap<(Address, Address), (Option<U256>, Option<U256>)> =
            pairs.iter().copied().zip(funds).collect();

        let lines: Vec<PreflightLine> = batch
            .iter()
            .enumerate()
            .map(|(index, request)| {
                let (balance, allowance) = funds
                    .get(&(*request.token(), *request.from()))
                    .copied()
                    .unwrap_or_default();
                let line = PreflightLine {
                    index,
                    token: *request.token(),
                    from: *request.from(),
                    to: *request.to(),
                    amount: request.amount(),
                    balance,
                    allowance,
                    decimals: decimals
                        .get(request.token())
                        .copied()
                        .unwrap_or(DEFAULT_DECIMALS),
                    status: PreflightStatus::classify(request.amount(), balance, allowance),
                };
                info!(
                    index,
                    token = %line.token,
                    from = %line.from,
                    to = %line.to,
                    amount = %line.amount_display(),
                    balance = line.balance_display().as_deref().unwrap_or("?"),
                    allowance = line.allowance_display().as_deref().unwrap_or("?"),
                    status = %line.status,
                    "preflight"
                );
                line
            })
            .collect();

        let summary = PreflightSummary::of(&lines);
        info!(
            lines = lines.len(),
            pairs = pairs.len(),
            ok = summary.ok,
            insufficient_balance = summary.insufficient_balance,
            insufficient_allowance = summary.insufficient_allowance,
            insufficient_both = summary.insufficient_both,
            "preflight summary"
        );
        lines
    }

    /// Token decimals, cached per token. Falls back to 18 without caching.
    pub async fn token_decimals(&self, token: &Address, caller: &Address) -> u8 {
        if let Some(decimals) = self.decimals.get(token) {
            return decimals;
        }

        let result = match self.codec.encode_call(abi::decimals(), &[]) {
            Ok(call) => self.read_uint(token, caller, &call).await,
            Err(e) => Err(e.into()),
        };

        match result.map(u8_from_word) {
            Ok(Some(decimals)) => {
                self.decimals.insert(*token, decimals);
                decimals
            }
            Ok(None) => {
                warn!(token = %token, default = DEFAULT_DECIMALS, "decimals out of range");
                DEFAULT_DECIMALS
            }
            Err(e) => {
                warn!(token = %token, error = %e, default = DEFAULT_DECIMALS, "decimals lookup failed");
                DEFAULT_DECIMALS
            }
        }
    }

    /// `balanceOf(owner)`, or `None` if the lookup fails.
    pub async fn balance_of(&self, token: &Address, owner: &Address, caller: &Address) -> Option<U256> {
        let result = match self
            .codec
            .encode_call(abi::balance_of(), &[AbiValue::Address(*owner)])
        {
            Ok(call) => self.read_uint(token, caller, &call).await,
            Err(e) => Err(e.into()),
        };
        result
            .inspect_err(|e| warn!(token = %token, owner = %owner, error = %e, "balanceOf lookup failed"))
            .ok()
    }

    /// `allowance(owner, spender)`, or `None` if the lookup fails.
    pub async fn allowance(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        caller: &Address,
    ) -> Option<U256> {
        let result = match self.codec.encode_call(
            abi::allowance(),
            &[AbiValue::Address(*owner), AbiValue::Address(*spender)],
        ) {
            Ok(call) => self.read_uint(token, caller, &call).await,
            Err(e) => Err(e.into()),
        };
        result
            .inspect_err(|e| {
                warn!(token = %token, owner = %owner, spender = %spender, error = %e, "allowance lookup failed")
            })
            .ok()
    }

    async fn read_uint(
        &self,
        token: &Address,
        caller: &Address,
        call: &EncodedCall,
    ) -> Result<U256, Error> {
        let words = self
            .node
            .trigger_constant_contract(caller, token, call)
            .await?;
        let first = words
            .first()
            .ok_or(DecodingError::MissingField("constant_result"))?;
        Ok(decode_uint_word(first)?)
    }
}

/// Distinct items in first-seen order.
fn first_seen<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn u8_from_word(value: U256) -> Option<u8> {
    if value > U256::from(u8::MAX) {
        return None;
    }
    Some(value.to_be_bytes::<32>()[31])
}
