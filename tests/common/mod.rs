//! Shared fixtures: a local fake upstream serving JSON-RPC and
//! Etherscan-style explorer responses.

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use wallet_sentry::{
    BalanceSource, ChainKind, EvmEndpoints, SentryConfig, SolanaEndpoints, Transaction, TxStatus,
};

pub const EVM_ADDRESS: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
/// Explorer answers "No transactions found" for this one
pub const EVM_EMPTY_ADDRESS: &str = "0x0000000000000000000000000000000000000001";
/// Every node errors on `eth_getBalance` for this one
pub const EVM_BROKEN_ADDRESS: &str = "0x000000000000000000000000000000000000dead";
pub const SOLANA_ADDRESS: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
/// Has `BUSY_SIGNATURE_COUNT` signatures, each `getTransaction` answered slowly
pub const SOLANA_BUSY_ADDRESS: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
/// `getSignaturesForAddress` errors
pub const SOLANA_SIGNATURE_ERROR_ADDRESS: &str = "Vote111111111111111111111111111111111111111";
/// Signatures list fine, every `getTransaction` errors
pub const SOLANA_TX_ERROR_ADDRESS: &str = "So11111111111111111111111111111111111111112";
pub const BUSY_SIGNATURE_COUNT: usize = 20;
pub const BITCOIN_ADDRESS: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

pub const COUNTERPARTY_A: &str = "0x1111111111111111111111111111111111111111";
pub const COUNTERPARTY_B: &str = "0x2222222222222222222222222222222222222222";

// ============================================
// FAKE UPSTREAM
// ============================================

/// Request counters kept by the fake upstream
#[derive(Debug, Default)]
pub struct UpstreamStats {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl UpstreamStats {
    /// Highest number of `getTransaction` calls seen at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Start the fake upstream on an ephemeral port; returns its base URL
pub async fn spawn_upstream() -> String {
    spawn_upstream_with_stats().await.0
}

/// Like `spawn_upstream`, also handing back the request counters
pub async fn spawn_upstream_with_stats() -> (String, Arc<UpstreamStats>) {
    let stats = Arc::new(UpstreamStats::default());
    let app = Router::new()
        .route("/rpc", post(rpc))
        .route("/rpc-down", post(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route("/explorer", get(explorer))
        .route("/explorer-down", get(explorer_down))
        .with_state(stats.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), stats)
}

fn rpc_error(id: Value, code: i64, message: &str) -> Json<Value> {
    Json(json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    }))
}

async fn rpc(State(stats): State<Arc<UpstreamStats>>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let params = &request["params"];

    let result = match request["method"].as_str().unwrap_or_default() {
        "eth_getBalance" => {
            let address = params[0].as_str().unwrap_or_default();
            if !address.starts_with("0x") {
                return rpc_error(id, -32602, "invalid argument 0: hex string without 0x prefix");
            }
            if address.eq_ignore_ascii_case(EVM_BROKEN_ADDRESS) {
                return rpc_error(id, -32000, "internal error: state unavailable");
            }
            // 1 ETH
            json!("0xde0b6b3a7640000")
        }
        "getBalance" => json!({ "context": { "slot": 1 }, "value": 2_500_000_000u64 }),
        "getSignaturesForAddress" => match params[0].as_str().unwrap_or_default() {
            SOLANA_SIGNATURE_ERROR_ADDRESS => {
                return rpc_error(id, -32005, "Node is behind by 512 slots");
            }
            SOLANA_BUSY_ADDRESS => Value::Array(
                (0..BUSY_SIGNATURE_COUNT)
                    .map(|i| json!({ "signature": format!("busy-{}", i), "blockTime": 1_700_000_000 + i as i64, "err": null }))
                    .collect(),
            ),
            SOLANA_TX_ERROR_ADDRESS => json!([
                { "signature": "broken-1", "blockTime": 1_700_000_000, "err": null },
                { "signature": "broken-2", "blockTime": 1_700_000_100, "err": null }
            ]),
            _ => json!([
                { "signature": "sigNewest", "blockTime": 1_700_003_600, "err": null },
                { "signature": "sigPruned", "blockTime": 1_700_000_000, "err": null }
            ]),
        },
        "getTransaction" => {
            let signature = params[0].as_str().unwrap_or_default();
            if signature.starts_with("broken-") {
                return rpc_error(id, -32603, "Internal error");
            }
            if signature.starts_with("busy-") {
                let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                stats.max_in_flight.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(25)).await;
                stats.in_flight.fetch_sub(1, Ordering::SeqCst);
            }
            solana_transaction(signature)
        }
        other => return rpc_error(id, -32601, &format!("Method not found: {}", other)),
    };

    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

fn solana_transaction(signature: &str) -> Value {
    match signature {
        busy if busy.starts_with("busy-") => json!({
            "transaction": {
                "message": { "accountKeys": [SOLANA_BUSY_ADDRESS, SOLANA_ADDRESS] }
            },
            "meta": {
                "err": null,
                "fee": 5000,
                "preBalances": [2_000_000_000u64, 0],
                "postBalances": [1_000_000_000u64, 1_000_000_000u64]
            }
        }),
        "sigNewest" => json!({
            "blockTime": 1_700_003_600,
            "transaction": {
                "message": { "accountKeys": [SOLANA_ADDRESS, "Receiver1111111111111111111111111111111111"] }
            },
            "meta": {
                "err": null,
                "fee": 5000,
                "preBalances": [3_000_000_000u64, 0],
                "postBalances": [2_000_000_000u64, 1_000_000_000u64]
            }
        }),
        // Ledger no longer has it
        _ => Value::Null,
    }
}

async fn explorer(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let address = query.get("address").cloned().unwrap_or_default();

    match query.get("action").map(String::as_str) {
        Some("balance") => Json(json!({
            "status": "1",
            "message": "OK",
            "result": "2000000000000000000"
        })),
        Some("txlist") if address.eq_ignore_ascii_case(EVM_EMPTY_ADDRESS) => Json(json!({
            "status": "0",
            "message": "No transactions found",
            "result": []
        })),
        Some("txlist") => {
            let records: Vec<Value> = explorer_records(&address)
                .into_iter()
                .take(query.get("offset").and_then(|o| o.parse().ok()).unwrap_or(usize::MAX))
                .collect();
            Json(json!({ "status": "1", "message": "OK", "result": records }))
        }
        _ => Json(json!({ "status": "0", "message": "NOTOK", "result": "Error! Missing Or invalid Action name" })),
    }
}

/// Newest first, as `sort=desc` asks
fn explorer_records(address: &str) -> Vec<Value> {
    vec![
        json!({
            "hash": "0xaaa",
            "from": address,
            "to": COUNTERPARTY_A,
            "value": "1000000000000000000",
            "timeStamp": "1700007200",
            "gasUsed": "21000",
            "gasPrice": "1000000000",
            "isError": "0"
        }),
        json!({
            "hash": "0xbbb",
            "from": address,
            "to": COUNTERPARTY_B,
            "value": "2500000000000000000",
            "timeStamp": "1700003600",
            "gasUsed": "21000",
            "gasPrice": "1000000000",
            "isError": "0"
        }),
        json!({
            "hash": "0xccc",
            "from": COUNTERPARTY_A,
            "to": address,
            "value": "0",
            "timeStamp": "1700000000",
            "gasUsed": "50000",
            "gasPrice": "1000000000",
            "isError": "1"
        }),
        // malformed, skipped by the client
        json!({
            "hash": "0xddd",
            "from": address,
            "to": COUNTERPARTY_B,
            "value": "not-a-number",
            "timeStamp": "1699990000",
            "isError": "0"
        }),
    ]
}

async fn explorer_down() -> Json<Value> {
    Json(json!({ "status": "0", "message": "NOTOK", "result": "Missing/Invalid API Key" }))
}

// ============================================
// CONFIG
// ============================================

/// Configuration with every chain pointed at the fake upstream.
///
/// Ethereum lists a dead node first so the fallback path runs; BNB's
/// explorer always fails so its balance comes from RPC.
pub fn config_for(base: &str) -> SentryConfig {
    let rpc = format!("{}/rpc", base);
    let explorer = format!("{}/explorer", base);

    SentryConfig {
        http_timeout: Duration::from_secs(5),
        ethereum: EvmEndpoints {
            rpc_urls: vec![format!("{}/rpc-down", base), rpc.clone()],
            explorer_url: explorer.clone(),
            explorer_api_key: Some("test-key".to_string()),
            explorer_chain_id: Some(1),
            balance_source: BalanceSource::Rpc,
        },
        worldcoin: EvmEndpoints {
            rpc_urls: vec![rpc.clone()],
            explorer_url: explorer,
            explorer_api_key: None,
            explorer_chain_id: None,
            balance_source: BalanceSource::Rpc,
        },
        bnb: EvmEndpoints {
            rpc_urls: vec![rpc.clone()],
            explorer_url: format!("{}/explorer-down", base),
            explorer_api_key: None,
            explorer_chain_id: None,
            balance_source: BalanceSource::ExplorerThenRpc,
        },
        solana: SolanaEndpoints {
            rpc_urls: vec![rpc],
        },
        share_transaction_sample: true,
    }
}

// ============================================
// TRANSACTIONS
// ============================================

pub fn tx(to: &str, value: &str, timestamp: i64, status: TxStatus) -> Transaction {
    Transaction {
        hash: format!("0x{:x}", timestamp),
        from: EVM_ADDRESS.to_string(),
        to: to.to_string(),
        value: value.to_string(),
        timestamp,
        chain: ChainKind::Ethereum,
        fee: None,
        status,
    }
}
