mod common;

use alloy::primitives::{B256, U256};
use common::{create_unit_log, tx_hash};
use creator_agent::chain::registry::{encode_create, unit_id_from_receipt, Registry};
use creator_agent::chain::{chain_name, hex_b256, select_endpoint, ReceiptLog, TxReceipt};
use creator_agent::{CreatorError, CreatorResult};
use std::sync::Mutex;

fn endpoints(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| u.to_string()).collect()
}

#[tokio::test]
async fn first_live_endpoint_is_bound() {
    let probed = Mutex::new(Vec::new());
    let candidates = endpoints(&["http://down", "http://up", "http://also-up"]);

    let (bound, block) = select_endpoint(&candidates, |url| {
        probed.lock().unwrap().push(url.clone());
        async move {
            if url.contains("down") {
                Err(CreatorError::network("connection refused"))
            } else {
                Ok(42u64)
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(bound, "http://up");
    assert_eq!(block, 42);
    assert_eq!(*probed.lock().unwrap(), endpoints(&["http://down", "http://up"]));
}

#[tokio::test]
async fn all_endpoints_failing_is_a_connection_error() {
    let candidates = endpoints(&["http://a", "http://b"]);
    let err = select_endpoint(&candidates, |_| async { CreatorResult::<()>::Err(CreatorError::network("timeout")) })
        .await
        .unwrap_err();

    match err {
        CreatorError::Connection(message) => {
            assert!(message.contains("http://a"));
            assert!(message.contains("http://b"));
        }
        other => panic!("expected connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_candidate_list_is_a_connection_error() {
    let err = select_endpoint(&[], |_| async { CreatorResult::Ok(()) })
        .await
        .unwrap_err();
    assert!(matches!(err, CreatorError::Connection(_)));
}

#[test]
fn unit_id_comes_from_first_indexed_topic() {
    let receipt = TxReceipt {
        tx_hash: tx_hash(1),
        success: true,
        logs: vec![create_unit_log(314), create_unit_log(999)],
    };
    assert_eq!(unit_id_from_receipt(&receipt), Some(U256::from(314)));
}

#[test]
fn unit_id_missing_without_indexed_topic() {
    let no_logs = TxReceipt { tx_hash: tx_hash(1), success: true, logs: vec![] };
    assert_eq!(unit_id_from_receipt(&no_logs), None);

    let bare_log = TxReceipt {
        tx_hash: tx_hash(1),
        success: true,
        logs: vec![ReceiptLog { address: Default::default(), topics: vec![B256::ZERO] }],
    };
    assert_eq!(unit_id_from_receipt(&bare_log), None);
}

#[test]
fn create_calldata_starts_with_selector() {
    use alloy::sol_types::SolCall;

    let data = encode_create(common::SIGNER, B256::repeat_byte(0x42), vec![U256::from(9)]);
    assert_eq!(&data[..4], Registry::createCall::SELECTOR.as_slice());
}

#[test]
fn hex_and_chain_names() {
    assert_eq!(hex_b256(&tx_hash(255)), format!("0x{}ff", "0".repeat(62)));
    assert_eq!(chain_name(84532), "base-sepolia");
    assert_eq!(chain_name(1), "mainnet");
    assert_eq!(chain_name(7), "chain-7");
}
