//! API Request Handlers

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::middleware::RateLimiter;
use super::types::*;
use crate::core::analyzer::AddressAnalyzer;
use crate::models::errors::AppError;
use crate::models::types::{AnalysisResult, ChainKind};
use crate::utils::constants::APP_VERSION;
use crate::utils::telemetry::TelemetryCollector;

/// Shared application state
pub struct AppState {
    pub analyzer: Arc<AddressAnalyzer>,
    pub telemetry: Arc<TelemetryCollector>,
    pub rate_limiter: Arc<RateLimiter>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(analyzer: Arc<AddressAnalyzer>, telemetry: Arc<TelemetryCollector>) -> Self {
        Self::with_rate_limiter(analyzer, telemetry, Arc::new(RateLimiter::default()))
    }

    pub fn with_rate_limiter(
        analyzer: Arc<AddressAnalyzer>,
        telemetry: Arc<TelemetryCollector>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            analyzer,
            telemetry,
            rate_limiter,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Error half of every handler result
pub type ApiFailure = (StatusCode, Json<ApiResponse<()>>);

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Map an analysis error to its HTTP response.
/// Upstream causes are logged here and never returned.
fn failure(err: &AppError, start: Instant) -> ApiFailure {
    if err.code.is_input_error() {
        info!(code = err.code_str(), "Rejected request: {}", err.message);
    } else {
        error!(code = err.code_str(), "Analysis error: {}", err.detailed());
    }

    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ApiResponse::error(ApiError::from(err), elapsed_ms(start))),
    )
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Address Analysis
// ============================================

/// `GET /v1/analyze?address=...&chain=...`
pub async fn analyze_get(
    State(state): State<Arc<AppState>>,
    Query(req): Query<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalysisResult>>, ApiFailure> {
    run_analysis(&state, req).await
}

/// `POST /v1/analyze` with `{ "address": ..., "chain": ... }`
pub async fn analyze_post(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalysisResult>>, ApiFailure> {
    run_analysis(&state, req).await
}

async fn run_analysis(
    state: &AppState,
    req: AnalyzeRequest,
) -> Result<Json<ApiResponse<AnalysisResult>>, ApiFailure> {
    let start = Instant::now();
    state.telemetry.record_request();

    let outcome = analyze_request(state, req).await;
    match outcome {
        Ok(result) => {
            state
                .telemetry
                .record_completed(&result, start.elapsed().as_millis() as u64);
            Ok(Json(ApiResponse::success(result, elapsed_ms(start))))
        }
        Err(e) => {
            state.telemetry.record_failed();
            Err(failure(&e, start))
        }
    }
}

async fn analyze_request(state: &AppState, req: AnalyzeRequest) -> Result<AnalysisResult, AppError> {
    let address = req
        .address
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(AppError::address_required)?;

    let chain_hint = match req.chain.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(name) => Some(name.parse::<ChainKind>().map_err(AppError::bad_request)?),
    };

    state.analyzer.analyze(&address, chain_hint).await
}

// ============================================
// Chains
// ============================================

pub async fn list_chains(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Vec<ChainInfo>>> {
    let start = Instant::now();
    let chains = state
        .analyzer
        .registry()
        .supported_chains()
        .into_iter()
        .map(ChainInfo::from)
        .collect();
    Json(ApiResponse::success(chains, elapsed_ms(start)))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let stats = state.telemetry.get_stats();

    info!("{}", stats.summary());

    let data = StatsData {
        analyses_requested: stats.analyses_requested,
        analyses_completed: stats.analyses_completed,
        analyses_failed: stats.analyses_failed,
        critical_detected: stats.critical_detected,
        dangerous_detected: stats.dangerous_detected,
        by_chain: stats.by_chain,
        avg_latency_ms: stats.avg_latency_ms,
        uptime_seconds: state.uptime_seconds(),
        api_version: APP_VERSION.to_string(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}
