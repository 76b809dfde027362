//! Phore backend against a scripted node

use phore_chain::mock::MockTransport;
use phore_chain::{BlockChain, Error, RpcConfig, RpcTransport, RPC_INVALID_ADDRESS_OR_KEY};
use phore_params::{ChainParamsRegistry, MAIN_PHORE_NET, TEST_PHORE_NET};
use phore_rpc::{is_transaction_unavailable, PhoreRpc};
use serde_json::{json, Value};
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

const BLOCK_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000abc";

fn backend(transport: &Arc<MockTransport>) -> PhoreRpc {
    PhoreRpc::with_transport(
        RpcConfig::default(),
        Arc::clone(transport) as Arc<dyn RpcTransport>,
        Arc::new(ChainParamsRegistry::new()),
    )
}

fn tx_json(txid: &str) -> Value {
    json!({
        "txid": txid,
        "hex": "0100",
        "version": 1,
        "vin": [],
        "vout": [{"value": 0.5, "n": 0, "scriptPubKey": {"hex": "6a"}}],
        "blocktime": 1540000000,
        "time": 1540000000,
        "confirmations": 3
    })
}

/// Node that reports `BLOCK_HASH` with transactions A, B and C
fn node_with_block() -> Arc<MockTransport> {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_result(
            "getblock",
            BLOCK_HASH,
            json!({
                "hash": BLOCK_HASH,
                "previousblockhash": "00aa",
                "height": 500000,
                "confirmations": 10,
                "size": 1234,
                "time": 1540000000,
                "tx": ["A", "B", "C"]
            }),
        )
        .on_result("getrawtransaction", "A", tx_json("A"))
        .on_result("getrawtransaction", "C", tx_json("C"));
    transport
}

fn chain_info(chain: &str) -> Value {
    json!({"chain": chain, "blocks": 1, "headers": 1, "bestblockhash": "00aa"})
}

fn txids(block: &phore_chain::Block) -> Vec<&str> {
    block.txs.iter().map(|tx| tx.txid.as_str()).collect()
}

// ============================================================================
// Block Assembly
// ============================================================================

#[tokio::test]
async fn test_block_with_all_transactions() {
    let transport = node_with_block();
    transport.on_result("getrawtransaction", "B", tx_json("B"));

    let block = backend(&transport).get_block(BLOCK_HASH, 0).await.unwrap();
    assert_eq!(block.header.hash, BLOCK_HASH);
    assert_eq!(block.header.height, 500_000);
    assert_eq!(block.header.prev, "00aa");
    assert_eq!(txids(&block), vec!["A", "B", "C"]);
    assert_eq!(block.txs[0].vout[0].value_sat, 50_000_000);
}

#[tokio::test]
async fn test_unknown_transaction_is_skipped_in_order() {
    let transport = node_with_block();
    transport.on_rpc_error(
        "getrawtransaction",
        "B",
        RPC_INVALID_ADDRESS_OR_KEY,
        "No information available about transaction",
    );

    let block = backend(&transport).get_block(BLOCK_HASH, 0).await.unwrap();
    assert_eq!(txids(&block), vec!["A", "C"]);
    assert_eq!(transport.call_count("getrawtransaction"), 3);
}

#[tokio::test]
async fn test_transport_failure_aborts_block() {
    let transport = node_with_block();
    transport.on_failure("getrawtransaction", "B", "connection reset by peer");

    let err = backend(&transport).get_block(BLOCK_HASH, 0).await.unwrap_err();
    assert!(err.is_transport(), "{}", err);
    assert!(!is_transaction_unavailable(&err));
    // C is never requested once B fails
    assert_eq!(transport.call_count("getrawtransaction"), 2);
}

#[tokio::test]
async fn test_other_rpc_error_aborts_block() {
    let transport = node_with_block();
    transport.on_rpc_error("getrawtransaction", "B", -1, "unexpected");

    let err = backend(&transport).get_block(BLOCK_HASH, 0).await.unwrap_err();
    assert_eq!(err.rpc_error().map(|e| e.code), Some(-1));
}

#[tokio::test]
async fn test_block_by_height() {
    let transport = node_with_block();
    transport
        .on_result("getblockhash", "500000", json!(BLOCK_HASH))
        .on_result("getrawtransaction", "B", tx_json("B"));

    let block = backend(&transport).get_block("", 500_000).await.unwrap();
    assert_eq!(block.txs.len(), 3);

    let calls = transport.calls();
    assert_eq!(calls[0], ("getblockhash".to_string(), json!([500000])));
    assert_eq!(calls[1], ("getblock".to_string(), json!([BLOCK_HASH, 1])));
}

#[tokio::test]
async fn test_failed_height_lookup_skips_getblock() {
    let transport = node_with_block();
    transport.on_failure("getblockhash", "*", "connection refused");

    let err = backend(&transport).get_block("", 500_000).await.unwrap_err();
    assert!(err.to_string().contains("height 500000"), "{}", err);
    assert_eq!(transport.call_count("getblock"), 0);
}

#[tokio::test]
async fn test_getblock_error_is_annotated_with_hash() {
    let transport = Arc::new(MockTransport::new());
    transport.on_rpc_error("getblock", "*", -8, "Invalid parameter");

    let err = backend(&transport).get_block("00ff", 0).await.unwrap_err();
    assert!(matches!(err, Error::Annotated { .. }));
    assert!(err.to_string().starts_with("hash 00ff: "), "{}", err);
    assert_eq!(transport.call_count("getrawtransaction"), 0);
}

// ============================================================================
// Initialization
// ============================================================================

#[tokio::test]
async fn test_initialize_mainnet() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_result("getblockchaininfo", "*", chain_info("main"))
        .on_result("getrawmempool", "*", json!(["m1"]));

    let mut rpc = backend(&transport);
    assert!(matches!(rpc.parser(), Err(Error::NotInitialized)));

    rpc.initialize().await.unwrap();
    assert!(!rpc.is_testnet());
    assert_eq!(rpc.network_name(), "livenet");
    assert_eq!(rpc.parser().unwrap().params().net, MAIN_PHORE_NET);
    assert!(rpc.client().mempool().contains("m1"));
}

#[tokio::test]
async fn test_initialize_testnet() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_result("getblockchaininfo", "*", chain_info("test"))
        .on_result("getrawmempool", "*", json!([]));

    let mut rpc = backend(&transport);
    rpc.initialize().await.unwrap();
    assert!(rpc.is_testnet());
    assert_eq!(rpc.network_name(), "testnet");
    assert_eq!(rpc.parser().unwrap().params().net, TEST_PHORE_NET);
}

#[tokio::test]
async fn test_initialize_unknown_chain_uses_mainnet() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_result("getblockchaininfo", "*", chain_info("regtest"))
        .on_result("getrawmempool", "*", json!([]));

    let mut rpc = backend(&transport);
    rpc.initialize().await.unwrap();
    assert!(!rpc.is_testnet());
    assert_eq!(rpc.parser().unwrap().params().name, "mainPhore");
}

#[tokio::test]
async fn test_initialize_propagates_node_error() {
    let transport = Arc::new(MockTransport::new());
    transport.on_rpc_error("getblockchaininfo", "*", -28, "Loading block index...");

    let mut rpc = backend(&transport);
    let err = rpc.initialize().await.unwrap_err();
    assert_eq!(err.rpc_error().map(|e| e.code), Some(-28));
    assert!(matches!(rpc.parser(), Err(Error::NotInitialized)));
}

// ============================================================================
// Forwarded Calls
// ============================================================================

#[tokio::test]
async fn test_requests_use_positional_params() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_result("getrawtransaction", "A", tx_json("A"))
        .on_result("sendrawtransaction", "0100", json!("A"));

    let rpc = backend(&transport);
    let tx = rpc.get_transaction_for_mempool("A").await.unwrap();
    assert_eq!(tx.confirmations, 3);
    assert_eq!(rpc.send_raw_transaction("0100").await.unwrap(), "A");

    let calls = transport.calls();
    assert_eq!(calls[0].1, json!(["A", 1]));
    assert_eq!(calls[1].1, json!(["0100"]));
}

#[tokio::test]
async fn test_pack_unpack_through_backend_parser() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_result("getblockchaininfo", "*", chain_info("main"))
        .on_result("getrawmempool", "*", json!([]))
        .on_result("getrawtransaction", "aa01", tx_json("aa01"));

    let mut rpc = backend(&transport);
    rpc.initialize().await.unwrap();
    let parser = rpc.parser().unwrap();

    let mut tx = rpc.get_transaction("aa01").await.unwrap();
    let packed = parser.pack_tx(&tx, 500_000, tx.blocktime).unwrap();
    tx.confirmations = 0;
    assert_eq!(parser.unpack_tx(&packed).unwrap(), (tx, 500_000));
}
