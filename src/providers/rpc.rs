//! RPC Client Module - ordered multi-endpoint JSON-RPC
//!
//! 1. Endpoints are tried strictly in configuration order
//! 2. First success wins; no retry or backoff on a single endpoint
//! 3. User-Agent header, gzip and per-call timeout on every request
//! 4. API keys embedded in URLs are masked before logging
//!
//! Shared by the EVM adapters (`eth_getBalance`) and the Solana adapter
//! (`getBalance`, `getSignaturesForAddress`, `getTransaction`).

use alloy_primitives::U256;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::USER_AGENT as USER_AGENT_CONST;

/// Build the HTTP client shared by RPC and explorer calls
pub fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .gzip(true)
        .build()
        .map_err(|e| AppError::with_source(ErrorCode::ConfigHttpClient, "Failed to build HTTP client", e))
}

/// Hide API keys in an endpoint URL
pub fn mask_url(url: &str) -> String {
    for marker in ["/v2/", "/v3/"] {
        if let Some(idx) = url.find(marker) {
            return format!("{}{}***HIDDEN***", &url[..idx], marker);
        }
    }
    if let Some(idx) = url.find("api-key=") {
        return format!("{}api-key=***HIDDEN***", &url[..idx]);
    }
    if let Some(idx) = url.find("apikey=") {
        return format!("{}apikey=***HIDDEN***", &url[..idx]);
    }
    url.to_string()
}

/// RPC Provider with ordered fallback across endpoints
#[derive(Clone)]
pub struct RpcProvider {
    /// Endpoints in preference order
    endpoints: Vec<String>,
    /// HTTP client (gzip enabled, timeout set)
    client: reqwest::Client,
    /// Network name for logging
    network_name: String,
}

impl RpcProvider {
    /// Create a provider over an ordered endpoint list
    pub fn new(
        network_name: impl Into<String>,
        endpoints: Vec<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            endpoints,
            client,
            network_name: network_name.into(),
        }
    }

    /// Execute a JSON-RPC call, falling through the endpoint list
    pub async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> AppResult<T> {
        if self.endpoints.is_empty() {
            return Err(AppError::new(
                ErrorCode::RpcNoEndpoints,
                format!("No RPC endpoints configured for {}", self.network_name),
            ));
        }

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        let mut last_error = None;
        for (idx, url) in self.endpoints.iter().enumerate() {
            match self.execute_call::<T>(url, &payload).await {
                Ok(result) => {
                    if idx > 0 {
                        debug!("🔄 {} {} served by fallback {}", self.network_name, method, mask_url(url));
                    }
                    return Ok(result);
                }
                Err(e) => {
                    warn!(
                        "⚠️ RPC {} failed on {} ({}): {}",
                        method,
                        self.network_name,
                        mask_url(url),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        let cause = last_error
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown error".to_string());
        Err(AppError::new(
            ErrorCode::RpcError,
            format!("All RPC endpoints failed for {}: {}", self.network_name, cause),
        ))
    }

    /// Execute single RPC call
    async fn execute_call<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> AppResult<T> {
        let response = self.client.post(url).json(payload).send().await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(AppError::rpc_rate_limited());
        }
        if !status.is_success() {
            return Err(AppError::new(
                ErrorCode::RpcError,
                format!("HTTP error: {}", status),
            ));
        }

        let json: RpcResponse<T> = response.json().await?;

        if let Some(error) = json.error {
            let code = if error.is_rate_limit() {
                ErrorCode::RpcRateLimited
            } else {
                ErrorCode::RpcError
            };
            return Err(AppError::new(
                code,
                format!("RPC error: {} (code: {})", error.message, error.code),
            ));
        }

        json.result
            .ok_or_else(|| AppError::new(ErrorCode::RpcInvalidResponse, "No result in response"))
    }

    /// `eth_getBalance` at latest, in wei
    pub async fn get_balance_wei(&self, address: &str) -> AppResult<U256> {
        let params = serde_json::json!([address, "latest"]);
        let hex = self.call::<String>("eth_getBalance", params).await?;
        parse_hex_quantity(&hex)
    }

    /// Get primary RPC URL (masked for logging)
    pub fn masked_url(&self) -> String {
        self.endpoints
            .first()
            .map(|url| mask_url(url))
            .unwrap_or_else(|| "<none>".to_string())
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}

/// Decode a JSON-RPC hex quantity ("0x1bc16d674ec80000")
pub fn parse_hex_quantity(hex: &str) -> AppResult<U256> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .ok_or_else(|| {
            AppError::new(
                ErrorCode::RpcInvalidResponse,
                format!("Expected hex quantity, got {}", hex),
            )
        })?;
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16).map_err(|e| {
        AppError::new(
            ErrorCode::RpcInvalidResponse,
            format!("Invalid hex quantity {}: {}", hex, e),
        )
    })
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// JSON-RPC error structure
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    /// Check if this is a rate limit error (HTTP 429 equivalent or code -32005)
    pub fn is_rate_limit(&self) -> bool {
        self.code == -32005 || self.message.to_lowercase().contains("rate limit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_url() {
        assert_eq!(
            mask_url("https://mainnet.infura.io/v3/secret"),
            "https://mainnet.infura.io/v3/***HIDDEN***"
        );
        assert_eq!(
            mask_url("https://mainnet.helius-rpc.com/?api-key=secret"),
            "https://mainnet.helius-rpc.com/?api-key=***HIDDEN***"
        );
        assert_eq!(mask_url("https://eth.llamarpc.com"), "https://eth.llamarpc.com");
    }

    #[test]
    fn test_parse_hex_quantity() {
        assert_eq!(
            parse_hex_quantity("0xde0b6b3a7640000").unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
        assert_eq!(parse_hex_quantity("0x0").unwrap(), U256::ZERO);
        assert_eq!(parse_hex_quantity("0x").unwrap(), U256::ZERO);
        assert!(parse_hex_quantity("1234").is_err());
        assert!(parse_hex_quantity("0xzz").is_err());
    }

    #[test]
    fn test_rpc_error_classification() {
        let rate_limit_error = RpcError {
            code: -32005,
            message: "Rate limit exceeded".to_string(),
        };
        assert!(rate_limit_error.is_rate_limit());

        let other = RpcError {
            code: -32601,
            message: "Method not found".to_string(),
        };
        assert!(!other.is_rate_limit());
    }

    #[tokio::test]
    async fn test_no_endpoints() {
        let client = build_http_client(Duration::from_secs(1)).unwrap();
        let provider = RpcProvider::new("empty", vec![], client);
        let err = provider.call::<String>("eth_chainId", serde_json::json!([])).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RpcNoEndpoints);
    }
}
