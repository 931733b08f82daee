//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::models::errors::{AppError, ErrorCode};
use crate::models::types::ChainKind;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            code: ErrorCode::ApiRateLimited.as_str().to_string(),
            message: format!("Rate limit exceeded. Retry after {} seconds", retry_after),
            details: Some(format!("retry_after: {}", retry_after)),
        }
    }
}

impl From<&AppError> for ApiError {
    /// Input errors keep their message; everything else is generic
    fn from(err: &AppError) -> Self {
        if err.code.is_input_error() {
            Self {
                code: err.code_str().to_string(),
                message: err.message.clone(),
                details: None,
            }
        } else {
            Self {
                code: ErrorCode::AnalysisFailed.as_str().to_string(),
                message: "analysis failed".to_string(),
                details: None,
            }
        }
    }
}

// ============================================
// Address Analysis
// ============================================

/// Body for `POST /v1/analyze`, also the query of `GET /v1/analyze`
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub address: Option<String>,
    /// Chain name; detected from the address shape when absent
    #[serde(default)]
    pub chain: Option<String>,
}

// ============================================
// Chains
// ============================================

#[derive(Debug, Serialize)]
pub struct ChainInfo {
    pub id: ChainKind,
    pub name: String,
    pub currency: String,
    pub evm: bool,
}

impl From<ChainKind> for ChainInfo {
    fn from(chain: ChainKind) -> Self {
        Self {
            id: chain,
            name: chain.name().to_string(),
            currency: chain.symbol().to_string(),
            evm: chain.is_evm(),
        }
    }
}

// ============================================
// Stats / Telemetry
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub analyses_requested: u64,
    pub analyses_completed: u64,
    pub analyses_failed: u64,
    pub critical_detected: u64,
    pub dangerous_detected: u64,
    pub by_chain: std::collections::HashMap<String, u64>,
    pub avg_latency_ms: f64,
    pub uptime_seconds: u64,
    pub api_version: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_keeps_message() {
        let err = AppError::chain_undetected();
        let api: ApiError = (&err).into();
        assert_eq!(api.message, "could not detect chain, specify explicitly");
        assert_eq!(api.code, "CHAIN_UNDETECTED");
    }

    #[test]
    fn test_upstream_error_is_generic() {
        let cause = AppError::balance_fetch_failed(ChainKind::Ethereum, "secret endpoint detail");
        let api: ApiError = (&AppError::analysis_failed(cause)).into();
        assert_eq!(api.message, "analysis failed");
        assert!(!api.message.contains("secret"));
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::error(ApiError::rate_limited(60), 1.0)).unwrap();
        assert_eq!(body["success"], false);
        assert!(body.get("data").is_none());
        assert_eq!(body["error"]["code"], "API_RATE_LIMITED");
        assert_eq!(body["error"]["details"], "retry_after: 60");
    }
}
