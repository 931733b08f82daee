//! Telemetry Module for Wallet Sentry
//!
//! In-process counters for the analysis pipeline:
//! - analyses requested / completed / failed
//! - per-chain request counts
//! - critical (investigator) and dangerous (user safety) verdicts
//! - latency
//!
//! Privacy-first: no addresses or transaction hashes are stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::types::{AnalysisResult, ChainKind, InvestigatorLevel, SafetyLevel};

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryStats {
    pub analyses_requested: u64,
    pub analyses_completed: u64,
    pub analyses_failed: u64,
    /// Completed analyses by chain
    pub by_chain: HashMap<String, u64>,
    /// Investigator level `critical`
    pub critical_detected: u64,
    /// User safety level `dangerous`
    pub dangerous_detected: u64,
    /// Average latency of completed analyses (ms)
    pub avg_latency_ms: f64,
    /// Period start timestamp
    pub period_start: u64,
    /// Period end timestamp
    pub period_end: u64,
}

impl TelemetryStats {
    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "📊 analyses: {} requested, {} completed, {} failed | 💀 critical: {} | dangerous: {} | ⚡ avg {:.1}ms",
            self.analyses_requested,
            self.analyses_completed,
            self.analyses_failed,
            self.critical_detected,
            self.dangerous_detected,
            self.avg_latency_ms,
        )
    }
}

/// Main telemetry collector
pub struct TelemetryCollector {
    /// Atomic counters for fast updates
    analyses_requested: AtomicU64,
    analyses_completed: AtomicU64,
    analyses_failed: AtomicU64,
    critical_detected: AtomicU64,
    dangerous_detected: AtomicU64,
    total_latency_ms: AtomicU64,
    /// Completed analyses by chain
    chain_counts: RwLock<HashMap<ChainKind, u64>>,
    /// Session start time
    session_start: u64,
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self {
            analyses_requested: AtomicU64::new(0),
            analyses_completed: AtomicU64::new(0),
            analyses_failed: AtomicU64::new(0),
            critical_detected: AtomicU64::new(0),
            dangerous_detected: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            chain_counts: RwLock::new(HashMap::new()),
            session_start: current_timestamp(),
        }
    }

    /// Record an incoming analysis request
    pub fn record_request(&self) {
        self.analyses_requested.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed analysis
    pub fn record_completed(&self, result: &AnalysisResult, latency_ms: u64) {
        self.analyses_completed.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);

        if result.investigator_risk.level == InvestigatorLevel::Critical {
            self.critical_detected.fetch_add(1, Ordering::Relaxed);
        }
        if result.user_safety.level == SafetyLevel::Dangerous {
            self.dangerous_detected.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut counts) = self.chain_counts.write() {
            *counts.entry(result.chain).or_insert(0) += 1;
        }
    }

    /// Record a failed analysis (input or upstream)
    pub fn record_failed(&self) {
        self.analyses_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        let completed = self.analyses_completed.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency = if completed > 0 {
            total_latency as f64 / completed as f64
        } else {
            0.0
        };

        let by_chain = self
            .chain_counts
            .read()
            .map(|counts| {
                counts
                    .iter()
                    .map(|(k, v)| (k.as_str().to_string(), *v))
                    .collect()
            })
            .unwrap_or_default();

        TelemetryStats {
            analyses_requested: self.analyses_requested.load(Ordering::Relaxed),
            analyses_completed: completed,
            analyses_failed: self.analyses_failed.load(Ordering::Relaxed),
            by_chain,
            critical_detected: self.critical_detected.load(Ordering::Relaxed),
            dangerous_detected: self.dangerous_detected.load(Ordering::Relaxed),
            avg_latency_ms: avg_latency,
            period_start: self.session_start,
            period_end: current_timestamp(),
        }
    }

    /// Reset counters (for new reporting period)
    pub fn reset(&self) {
        self.analyses_requested.store(0, Ordering::Relaxed);
        self.analyses_completed.store(0, Ordering::Relaxed);
        self.analyses_failed.store(0, Ordering::Relaxed);
        self.critical_detected.store(0, Ordering::Relaxed);
        self.dangerous_detected.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);

        if let Ok(mut counts) = self.chain_counts.write() {
            counts.clear();
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
