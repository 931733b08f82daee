//! Solana Adapter Module
//!
//! Standard JSON-RPC only:
//! - `getBalance` for the native balance
//! - `getSignaturesForAddress` + `getTransaction` for history
//!
//! Transaction records differ between legacy and versioned (v0) encodings,
//! so counterparties are extracted with several strategies in turn.
//!
//! `getTransaction` calls for one history fetch run concurrently, capped
//! at `SOLANA_TX_CONCURRENCY` in flight per adapter.

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::models::config::SolanaEndpoints;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{ChainKind, Transaction, TxStatus};
use crate::providers::adapter::ChainAdapter;
use crate::providers::rpc::RpcProvider;
use crate::utils::constants::{lamports_to_sol, SOLANA_TX_CONCURRENCY};

/// Placeholder for a counterparty no strategy could recover
pub const UNKNOWN_COUNTERPARTY: &str = "Unknown";

/// Length of a decoded ed25519 public key
const PUBKEY_LEN: usize = 32;

/// Check a base58 public key (32 bytes once decoded)
pub fn is_valid_solana_address(address: &str) -> bool {
    matches!(bs58::decode(address).into_vec(), Ok(bytes) if bytes.len() == PUBKEY_LEN)
}

// ============================================
// SOLANA RPC TYPES
// ============================================

/// Entry from `getSignaturesForAddress`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    #[serde(default)]
    pub block_time: Option<i64>,
    /// Set when the ledger recorded the transaction as failed
    #[serde(default)]
    pub err: Option<Value>,
}

/// Read an account key that is either a string or `{ "pubkey": ... }`
fn key_at(keys: &Value, idx: usize) -> Option<String> {
    let entry = keys.as_array()?.get(idx)?;
    entry
        .as_str()
        .or_else(|| entry.get("pubkey").and_then(Value::as_str))
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

/// Sender and receiver from a `getTransaction` result.
///
/// Tries `accountKeys` (string or parsed form), then `staticAccountKeys`,
/// then the first pre-token-balance owner for the sender.
pub fn extract_counterparties(tx: &Value) -> (String, String) {
    let message = &tx["transaction"]["message"];

    let (mut from, mut to) = (None, None);
    for field in ["accountKeys", "staticAccountKeys"] {
        let keys = &message[field];
        if keys.as_array().map(|k| !k.is_empty()).unwrap_or(false) {
            from = key_at(keys, 0);
            to = key_at(keys, 1);
            break;
        }
    }

    if from.is_none() {
        from = tx["meta"]["preTokenBalances"]
            .get(0)
            .and_then(|balance| balance["owner"].as_str())
            .filter(|owner| !owner.is_empty())
            .map(str::to_string);
    }

    (
        from.unwrap_or_else(|| UNKNOWN_COUNTERPARTY.to_string()),
        to.unwrap_or_else(|| UNKNOWN_COUNTERPARTY.to_string()),
    )
}

/// Normalize one `getTransaction` result; None when the record has no meta
pub fn normalize_transaction(sig: &SignatureInfo, tx: &Value) -> Option<Transaction> {
    let meta = tx.get("meta").filter(|m| !m.is_null())?;

    let (from, to) = extract_counterparties(tx);

    let first = |field: &str| meta[field].get(0).and_then(Value::as_u64);
    let value = match (first("preBalances"), first("postBalances")) {
        (Some(pre), Some(post)) => lamports_to_sol(pre.abs_diff(post)),
        _ => "0".to_string(),
    };

    let fee = meta["fee"]
        .as_u64()
        .filter(|fee| *fee > 0)
        .map(lamports_to_sol);

    let status = if meta["err"].is_null() && sig.err.is_none() {
        TxStatus::Success
    } else {
        TxStatus::Failed
    };

    let timestamp = sig
        .block_time
        .or_else(|| tx["blockTime"].as_i64())
        .unwrap_or(0);

    Some(Transaction {
        hash: sig.signature.clone(),
        from,
        to,
        value,
        timestamp,
        chain: ChainKind::Solana,
        fee,
        status,
    })
}

// ============================================
// SOLANA ADAPTER
// ============================================

/// Adapter for Solana mainnet
pub struct SolanaAdapter {
    rpc: RpcProvider,
    tx_permits: Semaphore,
}

impl SolanaAdapter {
    pub fn new(endpoints: &SolanaEndpoints, client: reqwest::Client) -> Self {
        let rpc = RpcProvider::new("solana", endpoints.rpc_urls.clone(), client);
        info!(
            rpc = %rpc.masked_url(),
            rpc_count = rpc.endpoint_count(),
            "✅ Solana adapter initialized"
        );
        Self {
            rpc,
            tx_permits: Semaphore::new(SOLANA_TX_CONCURRENCY),
        }
    }

    async fn fetch_signatures(&self, address: &str, limit: usize) -> AppResult<Vec<SignatureInfo>> {
        let params = serde_json::json!([address, { "limit": limit }]);
        self.rpc.call::<Vec<SignatureInfo>>("getSignaturesForAddress", params).await
    }

    async fn fetch_transaction(&self, sig: &SignatureInfo) -> Option<Transaction> {
        let params = serde_json::json!([
            sig.signature,
            { "encoding": "json", "maxSupportedTransactionVersion": 0 }
        ]);

        // Semaphore is never closed
        let _permit = self.tx_permits.acquire().await.ok()?;

        match self.rpc.call::<Value>("getTransaction", params).await {
            Ok(tx) => {
                let normalized = normalize_transaction(sig, &tx);
                if normalized.is_none() {
                    debug!("Skipping tx {} - no data", sig.signature);
                }
                normalized
            }
            Err(e) => {
                warn!("⚠️ Skipping tx {}: {}", sig.signature, e);
                None
            }
        }
    }
}

#[async_trait]
impl ChainAdapter for SolanaAdapter {
    fn chain(&self) -> ChainKind {
        ChainKind::Solana
    }

    fn validate_address(&self, address: &str) -> bool {
        is_valid_solana_address(address)
    }

    async fn get_balance(&self, address: &str) -> AppResult<String> {
        let params = serde_json::json!([address]);
        let result = self.rpc.call::<Value>("getBalance", params).await.map_err(|e| {
            warn!(chain = "solana", "⚠️ Balance fetch failed: {}", e);
            AppError::balance_fetch_failed(ChainKind::Solana, e.message)
        })?;

        // `{ context, value }` normally; some proxies return the bare number
        let lamports = result
            .get("value")
            .and_then(Value::as_u64)
            .or_else(|| result.as_u64())
            .ok_or_else(|| {
                AppError::balance_fetch_failed(ChainKind::Solana, "getBalance returned no lamports")
            })?;

        Ok(lamports_to_sol(lamports))
    }

    async fn get_transactions(&self, address: &str, limit: usize) -> AppResult<Vec<Transaction>> {
        if !self.validate_address(address) {
            return Err(AppError::invalid_address(ChainKind::Solana));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let signatures = match self.fetch_signatures(address, limit).await {
            Ok(signatures) => signatures,
            Err(e) => {
                warn!(chain = "solana", "⚠️ Signature fetch failed, returning empty history: {}", e);
                return Ok(Vec::new());
            }
        };
        debug!(chain = "solana", count = signatures.len(), "Found signatures");

        let fetches = signatures
            .iter()
            .take(limit)
            .map(|sig| self.fetch_transaction(sig));
        let transactions: Vec<Transaction> = join_all(fetches).await.into_iter().flatten().collect();

        debug!(chain = "solana", count = transactions.len(), "Parsed transactions");
        Ok(transactions)
    }
}
