//! End-to-end calls: encode, trigger, sign, broadcast and poll.

use tokio_test::assert_ok;
use tron_kit::abi::{self, batch_transfer_token};
use tron_kit::*;

use crate::common::{Execution, MockNode, addr, client, init_tracing, key};

#[tokio::test(start_paused = true)]
async fn test_batch_transfer_confirms_and_reports_transfers() {
    init_tracing();
    let node = MockNode::new(2, Execution::Success);
    let client = client(node.clone());
    let sender = key(7);

    let batch = [
        TransferRequest::new(sender.address(), addr(2), addr(0x30), U256::from(1_000u64)),
        TransferRequest::new(sender.address(), addr(3), addr(0x30), U256::from(2_500u64)),
    ];

    let outcome = assert_ok!(client.batch_transfer_token(&addr(0x99), &batch, &sender).await);

    assert_eq!(outcome.status, ReceiptStatus::Confirmed);
    assert!(outcome.is_success());
    assert_eq!(outcome.revert_reason, None);
    assert_eq!(outcome.transfers.len(), 2);
    for (transfer, request) in outcome.transfers.iter().zip(&batch) {
        assert_eq!(&transfer.token, request.token());
        assert_eq!(&transfer.from, request.from());
        assert_eq!(&transfer.to, request.to());
        assert_eq!(transfer.value, request.amount());
    }

    let info = outcome.info.unwrap();
    assert_eq!(info.block_number, Some(1_000));
    assert_eq!(info.fee, Some(27_000));
}

#[tokio::test(start_paused = true)]
async fn test_broadcast_body_carries_signature_over_raw_data() {
    let node = MockNode::new(0, Execution::Success);
    let client = client(node.clone());
    let sender = key(9);

    let call = client
        .codec()
        .encode_batch(
            batch_transfer_token(),
            &[TransferRequest::new(sender.address(), addr(2), addr(3), U256::from(1u64))],
        )
        .unwrap();
    let outcome = client.call(&addr(0x99), &call, &sender).await.unwrap();

    let broadcasts = node.broadcasts();
    assert_eq!(broadcasts.len(), 1);
    let body = &broadcasts[0];
    assert_eq!(body["txID"], outcome.tx_id.as_str());
    assert_eq!(body["visible"], false);
    assert!(body["raw_data"]["expiration"].is_i64());
    let signature = body["signature"][0].as_str().unwrap();
    assert_eq!(signature.len(), 130);
}

#[tokio::test(start_paused = true)]
async fn test_reverted_call_decodes_reason() {
    let node = MockNode::new(1, Execution::Revert);
    let client = client(node);
    let sender = key(7);

    let outcome = client
        .approve(&addr(0x30), &addr(0x99), U256::from(10u64), &sender)
        .await
        .unwrap();

    assert_eq!(outcome.status, ReceiptStatus::Reverted);
    assert_eq!(outcome.revert_reason.as_deref(), Some("insufficient allowance"));
    assert!(outcome.transfers.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_chain_ends_unknown() {
    let node = MockNode::new(50, Execution::Success);
    let client = client(node);
    let sender = key(7);

    let batch = [TransferRequest::new(sender.address(), addr(2), addr(3), U256::from(1u64))];
    let outcome = client
        .batch_transfer_token(&addr(0x99), &batch, &sender)
        .await
        .unwrap();
    assert_eq!(outcome.status, ReceiptStatus::Unknown);
    assert_eq!(outcome.info, None);

    // The transaction is still known to the node and can be polled again.
    let again = client.wait_for(&outcome.tx_id).await;
    assert_eq!(again.status, ReceiptStatus::Unknown);
    assert_eq!(again.attempts, 5);
}

#[tokio::test(start_paused = true)]
async fn test_business_id_layout() {
    let node = MockNode::new(0, Execution::Success);
    let client = client(node.clone());
    let sender = key(7);

    let request = TransferRequest::new(sender.address(), addr(2), addr(3), U256::from(5u64))
        .with_business_id(U256::from(42u64));
    let descriptor = abi::batch_transfer_token_with_business_id();
    client
        .batch_transfer_with(descriptor, &addr(0x99), &[request], &sender)
        .await
        .unwrap();

    let call = client.codec().encode_batch(descriptor, &[request]).unwrap();
    let decoded = client
        .codec()
        .decode_batch(descriptor, &call.to_bytes())
        .unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].business_id, Some(U256::from(42u64)));
    assert!(decoded[0].matches(&request));
}

#[tokio::test]
async fn test_invalid_address_fails_before_sending() {
    let node = MockNode::new(0, Execution::Success);
    let client = client(node.clone());

    let foreign = Address::new(0xa0, [1u8; 20]);
    let batch = [TransferRequest::new(foreign, addr(2), addr(3), U256::from(1u64))];
    let err = client
        .batch_transfer_token(&addr(0x99), &batch, &key(7))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Encoding(EncodingError::Address { .. })));
    assert!(node.broadcasts().is_empty());
}

#[tokio::test]
async fn test_constant_call_on_unknown_contract_is_rejection() {
    let node = MockNode::new(0, Execution::Success);
    let client = client(node);

    let call = client.codec().encode_call(abi::decimals(), &[]).unwrap();
    let err = client
        .node()
        .trigger_constant_contract(&addr(1), &addr(2), &call)
        .await
        .unwrap_err();
    assert!(err.is_rejection());
}
