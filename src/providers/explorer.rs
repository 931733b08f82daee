//! Explorer Client Module - Etherscan-compatible REST APIs
//!
//! Covers Etherscan v2 (multichain, `chainid` parameter), BscScan and
//! Worldscan. All three speak the same `module=account` dialect:
//! `{"status": "1", "message": "OK", "result": ...}`.

use alloy_primitives::U256;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{ChainKind, Transaction, TxStatus};
use crate::utils::constants::{format_units, wei_to_ether, WEI_DECIMALS};

/// Raw explorer envelope
#[derive(Debug, Deserialize)]
pub struct ExplorerResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

impl ExplorerResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }

    /// Text describing a failure: message plus a string `result`, if any
    fn failure_text(&self) -> String {
        match self.result.as_str() {
            Some(detail) if !detail.is_empty() => format!("{} ({})", self.message, detail),
            _ => self.message.clone(),
        }
    }

    /// Explorer's way of saying the address has no history
    pub fn is_empty_history(&self) -> bool {
        self.message.contains("No transactions found")
    }

    /// API key problems and throttling
    pub fn is_rate_limited(&self) -> bool {
        let text = self.failure_text().to_lowercase();
        text.contains("api") || text.contains("rate limit")
    }
}

/// One `txlist` record as explorers return it (every field a string)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerTx {
    pub hash: String,
    #[serde(default)]
    pub from: String,
    /// Empty for contract creation
    #[serde(default)]
    pub to: Option<String>,
    pub value: String,
    pub time_stamp: String,
    #[serde(default)]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub gas_price: Option<String>,
    #[serde(default)]
    pub is_error: Option<String>,
}

impl ExplorerTx {
    /// Normalize into the shared transaction record
    pub fn normalize(self, chain: ChainKind) -> AppResult<Transaction> {
        let value = wei_to_ether(&self.value).ok_or_else(|| {
            AppError::new(
                ErrorCode::ExplorerError,
                format!("Invalid value {} in tx {}", self.value, self.hash),
            )
        })?;
        let timestamp = self.time_stamp.trim().parse::<i64>().map_err(|_| {
            AppError::new(
                ErrorCode::ExplorerError,
                format!("Invalid timeStamp {} in tx {}", self.time_stamp, self.hash),
            )
        })?;
        let fee = fee_in_native(self.gas_used.as_deref(), self.gas_price.as_deref());
        let status = match self.is_error.as_deref() {
            Some("0") => TxStatus::Success,
            _ => TxStatus::Failed,
        };

        Ok(Transaction {
            hash: self.hash,
            from: self.from,
            to: self.to.unwrap_or_default(),
            value,
            timestamp,
            chain,
            fee,
            status,
        })
    }
}

/// gasUsed * gasPrice, formatted in native units
fn fee_in_native(gas_used: Option<&str>, gas_price: Option<&str>) -> Option<String> {
    let used = U256::from_str_radix(gas_used?.trim(), 10).ok()?;
    let price = U256::from_str_radix(gas_price?.trim(), 10).ok()?;
    let wei = used.checked_mul(price)?;
    Some(format_units(wei, WEI_DECIMALS))
}

/// Etherscan-compatible API client
#[derive(Clone)]
pub struct ExplorerClient {
    base_url: String,
    api_key: Option<String>,
    /// `chainid` for Etherscan v2
    chain_id: Option<u64>,
    client: reqwest::Client,
    /// Name for logging
    label: String,
}

impl ExplorerClient {
    pub fn new(
        label: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
        chain_id: Option<u64>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            chain_id,
            client,
            label: label.into(),
        }
    }

    /// Issue a `module=account` request
    async fn request(&self, params: &[(&str, String)]) -> AppResult<ExplorerResponse> {
        let mut query: Vec<(&str, String)> = Vec::with_capacity(params.len() + 3);
        if let Some(chain_id) = self.chain_id {
            query.push(("chainid", chain_id.to_string()));
        }
        query.push(("module", "account".to_string()));
        query.extend(params.iter().cloned());
        if let Some(ref key) = self.api_key {
            query.push(("apikey", key.clone()));
        }

        let response = self.client.get(&self.base_url).query(&query).send().await?;
        let status = response.status();
        if status.as_u16() == 429 {
            return Err(AppError::new(
                ErrorCode::ExplorerRateLimited,
                format!("{} rate limited (HTTP 429)", self.label),
            ));
        }
        if !status.is_success() {
            return Err(AppError::explorer_error(format!(
                "{} HTTP error: {}",
                self.label, status
            )));
        }

        Ok(response.json::<ExplorerResponse>().await?)
    }

    /// Recent transactions, newest first, at most `limit`
    pub async fn txlist(
        &self,
        address: &str,
        limit: usize,
        chain: ChainKind,
    ) -> AppResult<Vec<Transaction>> {
        let body = self
            .request(&[
                ("action", "txlist".to_string()),
                ("address", address.to_string()),
                ("startblock", "0".to_string()),
                ("endblock", "99999999".to_string()),
                ("page", "1".to_string()),
                ("offset", limit.to_string()),
                ("sort", "desc".to_string()),
            ])
            .await?;

        if !body.is_ok() {
            if body.is_empty_history() {
                debug!("{}: no transactions for {}", self.label, address);
                return Ok(Vec::new());
            }
            let code = if body.is_rate_limited() {
                ErrorCode::ExplorerRateLimited
            } else {
                ErrorCode::ExplorerError
            };
            return Err(AppError::new(
                code,
                format!("{} txlist failed: {}", self.label, body.failure_text()),
            ));
        }

        let records = match body.result {
            serde_json::Value::Array(records) => records,
            other => {
                return Err(AppError::new(
                    ErrorCode::ExplorerError,
                    format!("{} txlist returned non-array result: {}", self.label, other),
                ))
            }
        };

        let mut transactions = Vec::with_capacity(records.len().min(limit));
        for record in records.into_iter().take(limit) {
            let parsed = serde_json::from_value::<ExplorerTx>(record)
                .map_err(AppError::from)
                .and_then(|tx| tx.normalize(chain));
            match parsed {
                Ok(tx) => transactions.push(tx),
                Err(e) => warn!("⚠️ {} skipped malformed tx record: {}", self.label, e),
            }
        }
        Ok(transactions)
    }

    /// Native balance in ether units
    pub async fn balance(&self, address: &str) -> AppResult<String> {
        let body = self
            .request(&[
                ("action", "balance".to_string()),
                ("address", address.to_string()),
                ("tag", "latest".to_string()),
            ])
            .await?;

        if !body.is_ok() {
            let code = if body.is_rate_limited() {
                ErrorCode::ExplorerRateLimited
            } else {
                ErrorCode::ExplorerError
            };
            return Err(AppError::new(
                code,
                format!("{} balance failed: {}", self.label, body.failure_text()),
            ));
        }

        body.result
            .as_str()
            .and_then(wei_to_ether)
            .ok_or_else(|| {
                AppError::new(
                    ErrorCode::ExplorerError,
                    format!("{} balance result is not a wei amount", self.label),
                )
            })
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> serde_json::Value {
        json!({
            "blockNumber": "19000000",
            "timeStamp": "1700000000",
            "hash": "0xabc",
            "from": "0x1111111111111111111111111111111111111111",
            "to": "0x2222222222222222222222222222222222222222",
            "value": "2500000000000000000",
            "gas": "21000",
            "gasPrice": "20000000000",
            "isError": "0",
            "gasUsed": "21000"
        })
    }

    #[test]
    fn test_normalize_record() {
        let tx: ExplorerTx = serde_json::from_value(sample_record()).unwrap();
        let tx = tx.normalize(ChainKind::Ethereum).unwrap();
        assert_eq!(tx.value, "2.5");
        assert_eq!(tx.timestamp, 1_700_000_000);
        assert_eq!(tx.fee.as_deref(), Some("0.00042"));
        assert_eq!(tx.status, TxStatus::Success);
        assert_eq!(tx.chain, ChainKind::Ethereum);
    }

    #[test]
    fn test_is_error_marks_failed() {
        let mut record = sample_record();
        record["isError"] = json!("1");
        let tx: ExplorerTx = serde_json::from_value(record).unwrap();
        assert_eq!(tx.normalize(ChainKind::Bnb).unwrap().status, TxStatus::Failed);
    }

    #[test]
    fn test_contract_creation_has_empty_to() {
        let mut record = sample_record();
        record["to"] = json!("");
        let tx: ExplorerTx = serde_json::from_value(record).unwrap();
        assert_eq!(tx.normalize(ChainKind::Ethereum).unwrap().to, "");
    }

    #[test]
    fn test_bad_value_rejected() {
        let mut record = sample_record();
        record["value"] = json!("lots");
        let tx: ExplorerTx = serde_json::from_value(record).unwrap();
        assert!(tx.normalize(ChainKind::Ethereum).is_err());
    }

    #[test]
    fn test_envelope_classification() {
        let empty: ExplorerResponse = serde_json::from_value(json!({
            "status": "0", "message": "No transactions found", "result": []
        }))
        .unwrap();
        assert!(empty.is_empty_history());

        let throttled: ExplorerResponse = serde_json::from_value(json!({
            "status": "0", "message": "NOTOK", "result": "Invalid API Key"
        }))
        .unwrap();
        assert!(!throttled.is_empty_history());
        assert!(throttled.is_rate_limited());
    }
}
