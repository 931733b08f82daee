//! Wallet Sentry Library
//!
//! Multi-chain address analyzer. Given a public address it:
//! - Detects the chain from the address shape (or takes an explicit hint)
//! - Fetches balance and recent transactions through a chain adapter
//! - Derives behavioural pattern statistics
//! - Scores the address from an investigator and a user-safety perspective

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::analyzer::AddressAnalyzer;
pub use crate::core::detector::{identify, is_address_valid_for_chain};
pub use crate::core::risk_score::{InvestigatorRiskBuilder, UserSafetyBuilder};
pub use models::config::{BalanceSource, EvmEndpoints, SentryConfig, SolanaEndpoints};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    AnalysisResult, ChainKind, InvestigatorLevel, KnownInteractions, PatternStatistics,
    RiskAssessment, SafetyLevel, Transaction, TxStatus,
};
pub use providers::{AdapterRegistry, ChainAdapter, EvmAdapter, PendingAdapter, SolanaAdapter};
pub use utils::telemetry::{TelemetryCollector, TelemetryStats};
