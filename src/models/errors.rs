//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so log lines can be grepped and
//! monitored by category.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - input codes: problems with the address the caller supplied
//! - RPC_xxx / EXPLORER_xxx: upstream data source errors
//! - API_xxx: HTTP boundary errors
//! - CFG_xxx: Configuration errors

use std::fmt;

use super::types::ChainKind;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Full cause chain, for logs only
    pub fn detailed(&self) -> String {
        let mut out = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            out.push_str(&format!(" <- {}", err));
            cause = err.source();
        }
        out
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Input Errors
    // ============================================
    /// No address supplied
    AddressRequired,
    /// Address shape matched no chain and no hint was given
    ChainUndetected,
    /// Address failed validation for the resolved chain
    InvalidAddress,
    /// No adapter registered for the chain
    UnsupportedChain,

    // ============================================
    // RPC Errors
    // ============================================
    /// RPC connection failed
    RpcConnectionFailed,
    /// RPC request timeout
    RpcTimeout,
    /// RPC rate limited (HTTP 429)
    RpcRateLimited,
    /// RPC returned error response
    RpcError,
    /// No RPC endpoints configured
    RpcNoEndpoints,
    /// Invalid RPC response
    RpcInvalidResponse,

    // ============================================
    // Explorer Errors
    // ============================================
    /// Explorer rejected the API key or throttled us
    ExplorerRateLimited,
    /// Explorer returned a non-success status
    ExplorerError,

    // ============================================
    // Pipeline Errors
    // ============================================
    /// Every balance source failed
    BalanceFetchFailed,
    /// Analysis could not be completed
    AnalysisFailed,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,

    // ============================================
    // Configuration Errors
    // ============================================
    /// HTTP client could not be built
    ConfigHttpClient,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Input Errors
            Self::AddressRequired => "ADDRESS_REQUIRED",
            Self::ChainUndetected => "CHAIN_UNDETECTED",
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::UnsupportedChain => "UNSUPPORTED_CHAIN",

            // RPC Errors
            Self::RpcConnectionFailed => "RPC_CONNECTION_FAILED",
            Self::RpcTimeout => "RPC_TIMEOUT",
            Self::RpcRateLimited => "RPC_RATE_LIMITED",
            Self::RpcError => "RPC_ERROR",
            Self::RpcNoEndpoints => "RPC_NO_ENDPOINTS",
            Self::RpcInvalidResponse => "RPC_INVALID_RESPONSE",

            // Explorer Errors
            Self::ExplorerRateLimited => "EXPLORER_RATE_LIMITED",
            Self::ExplorerError => "EXPLORER_ERROR",

            // Pipeline Errors
            Self::BalanceFetchFailed => "BALANCE_FETCH_FAILED",
            Self::AnalysisFailed => "ANALYSIS_FAILED",

            // API Errors
            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",

            // Configuration Errors
            Self::ConfigHttpClient => "CFG_HTTP_CLIENT",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::AddressRequired
            | Self::ChainUndetected
            | Self::InvalidAddress
            | Self::UnsupportedChain
            | Self::ApiBadRequest => 400,
            Self::ApiRateLimited => 429,
            _ => 500,
        }
    }

    /// Caller mistakes: never retried, surfaced verbatim
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::AddressRequired
                | Self::ChainUndetected
                | Self::InvalidAddress
                | Self::UnsupportedChain
                | Self::ApiBadRequest
        )
    }

    /// Upstream conditions that the next data source might not share
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RpcTimeout
                | Self::RpcRateLimited
                | Self::RpcConnectionFailed
                | Self::ExplorerRateLimited
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Missing address
    pub fn address_required() -> Self {
        Self::new(ErrorCode::AddressRequired, "address required")
    }

    /// Chain could not be detected from the address shape
    pub fn chain_undetected() -> Self {
        Self::new(
            ErrorCode::ChainUndetected,
            "could not detect chain, specify explicitly",
        )
    }

    /// Address does not belong to the resolved chain
    pub fn invalid_address(chain: ChainKind) -> Self {
        Self::new(
            ErrorCode::InvalidAddress,
            format!("invalid address for {}", chain.name()),
        )
    }

    /// Unsupported chain
    pub fn unsupported_chain(chain: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::UnsupportedChain,
            format!("unsupported or invalid address for chain {}", chain),
        )
    }

    /// Balance could not be fetched from any source
    pub fn balance_fetch_failed(chain: ChainKind, msg: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::BalanceFetchFailed,
            format!("{} balance fetch failed: {}", chain.name(), msg.into()),
        )
    }

    /// Generic analysis failure wrapping the real cause
    pub fn analysis_failed(source: AppError) -> Self {
        Self::with_source(ErrorCode::AnalysisFailed, "analysis failed", source)
    }

    /// RPC rate limited
    pub fn rpc_rate_limited() -> Self {
        Self::new(ErrorCode::RpcRateLimited, "Rate limited (HTTP 429)")
    }

    /// Explorer error
    pub fn explorer_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExplorerError, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::with_source(ErrorCode::RpcTimeout, "Request timeout", err)
        } else if err.is_connect() {
            Self::with_source(ErrorCode::RpcConnectionFailed, "Connection failed", err)
        } else if err.is_decode() {
            Self::with_source(ErrorCode::RpcInvalidResponse, "Malformed response body", err)
        } else if err.status().map(|s| s.as_u16() == 429).unwrap_or(false) {
            Self::rpc_rate_limited()
        } else {
            Self::with_source(ErrorCode::RpcError, "HTTP request failed", err)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::RpcInvalidResponse, "JSON parse error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::chain_undetected();
        assert_eq!(err.code, ErrorCode::ChainUndetected);
        assert_eq!(err.code_str(), "CHAIN_UNDETECTED");
        assert_eq!(err.message, "could not detect chain, specify explicitly");
    }

    #[test]
    fn test_invalid_address_names_chain() {
        let err = AppError::invalid_address(ChainKind::Bnb);
        assert_eq!(err.message, "invalid address for BNB Chain");
    }

    #[test]
    fn test_input_classification() {
        assert!(ErrorCode::AddressRequired.is_input_error());
        assert!(ErrorCode::InvalidAddress.is_input_error());
        assert!(!ErrorCode::BalanceFetchFailed.is_input_error());
        assert!(ErrorCode::ExplorerRateLimited.is_transient());
        assert!(!ErrorCode::InvalidAddress.is_transient());
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ChainUndetected.http_status(), 400);
        assert_eq!(ErrorCode::ApiRateLimited.http_status(), 429);
        assert_eq!(ErrorCode::AnalysisFailed.http_status(), 500);
    }

    #[test]
    fn test_analysis_failed_keeps_cause() {
        let cause = AppError::balance_fetch_failed(ChainKind::Ethereum, "all RPC providers failed");
        let err = AppError::analysis_failed(cause);
        assert_eq!(err.message, "analysis failed");
        assert!(err.detailed().contains("BALANCE_FETCH_FAILED"));
    }
}
