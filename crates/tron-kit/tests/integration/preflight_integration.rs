//! Preflight checks against token state held by the mock node.

use std::sync::Arc;

use tron_kit::*;

use crate::common::{Execution, MockNode, addr, client, init_tracing};

#[tokio::test]
async fn test_preflight_classifies_each_request() {
    init_tracing();
    let node = MockNode::new(0, Execution::Success);
    let usdt = addr(0x30);
    let spender = addr(0x99);
    let (alice, bob, carol) = (addr(1), addr(2), addr(3));

    node.set_token(&usdt, 6);
    node.set_balance(&usdt, &alice, 50);
    node.set_allowance(&usdt, &alice, 200);
    node.set_balance(&usdt, &bob, 200);
    node.set_allowance(&usdt, &bob, 50);
    node.set_balance(&usdt, &carol, 200);
    node.set_allowance(&usdt, &carol, 200);

    let amount = U256::from(100u64);
    let batch = [
        TransferRequest::new(alice, addr(9), usdt, amount),
        TransferRequest::new(bob, addr(9), usdt, amount),
        TransferRequest::new(carol, addr(9), usdt, amount),
        // Same pair as the first line, small enough for alice's balance.
        TransferRequest::new(alice, addr(8), usdt, U256::from(40u64)),
    ];

    let client = client(node.clone());
    let lines = client.preflight(&batch, &spender, &alice).await;

    let statuses: Vec<PreflightStatus> = lines.iter().map(|l| l.status).collect();
    assert_eq!(
        statuses,
        vec![
            PreflightStatus::InsufficientBalance,
            PreflightStatus::InsufficientAllowance,
            PreflightStatus::Ok,
            PreflightStatus::Ok,
        ]
    );
    assert_eq!(lines[0].from, alice);
    assert_eq!(lines[0].amount_display(), "0.0001");
    assert_eq!(lines[0].balance_display().as_deref(), Some("0.00005"));
    assert_eq!(lines[3].index, 3);
    assert_eq!(lines[3].to, addr(8));
    assert_eq!(lines[3].amount, U256::from(40u64));

    // One decimals read plus balance and allowance for three pairs.
    assert_eq!(node.constant_calls(), 1 + 3 * 2);
    assert_eq!(PreflightSummary::of(&lines).ok, 2);
}

#[tokio::test]
async fn test_decimals_cache_shared_between_clients() {
    let node = MockNode::new(0, Execution::Success);
    let token = addr(0x30);
    node.set_token(&token, 8);
    node.set_balance(&token, &addr(1), 1);
    node.set_allowance(&token, &addr(1), 1);

    let cache = Arc::new(DecimalsCache::new());
    let build = || {
        TronClient::custom("http://mock-node")
            .transport(node.clone())
            .decimals_cache(cache.clone())
            .build()
    };
    let batch = [TransferRequest::new(addr(1), addr(2), token, U256::from(1u64))];

    build().preflight(&batch, &addr(0x99), &addr(1)).await;
    let after_first = node.constant_calls();
    build().preflight(&batch, &addr(0x99), &addr(1)).await;

    assert_eq!(after_first, 3);
    assert_eq!(node.constant_calls() - after_first, 2);
    assert_eq!(cache.get(&token), Some(8));
}

#[tokio::test]
async fn test_unknown_token_is_insufficient_and_uncached() {
    let node = MockNode::new(0, Execution::Success);
    let client = client(node);
    let batch = [TransferRequest::new(addr(1), addr(2), addr(0x55), U256::from(1u64))];

    let lines = client.preflight(&batch, &addr(0x99), &addr(1)).await;
    assert_eq!(lines[0].status, PreflightStatus::InsufficientBoth);
    assert_eq!(lines[0].balance, None);
    assert_eq!(lines[0].decimals, DEFAULT_DECIMALS);
    assert!(client.decimals_cache().is_empty());
}
