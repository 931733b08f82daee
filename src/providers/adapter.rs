//! Chain adapter contract
//!
//! Every supported chain family implements `ChainAdapter`. The pipeline
//! only talks to this trait, so adding a chain means adding an adapter
//! and registering it.

use async_trait::async_trait;

use crate::core::patterns;
use crate::models::errors::AppResult;
use crate::models::types::{ChainKind, PatternStatistics, Transaction};
use crate::utils::constants::PATTERN_SAMPLE_LIMIT;

/// Per-chain data access
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// Chain this adapter serves
    fn chain(&self) -> ChainKind;

    /// Syntactic address check, no network access
    fn validate_address(&self, address: &str) -> bool;

    /// Native balance as a decimal string in native units.
    ///
    /// Fails with `BalanceFetchFailed` when every source fails.
    async fn get_balance(&self, address: &str) -> AppResult<String>;

    /// Up to `limit` recent transactions, newest first.
    ///
    /// Upstream failures degrade to an empty list; only an invalid address
    /// is an error.
    async fn get_transactions(&self, address: &str, limit: usize) -> AppResult<Vec<Transaction>>;

    /// Behaviour statistics over the most recent sample
    async fn analyze_patterns(&self, address: &str) -> AppResult<PatternStatistics> {
        let sample = self.get_transactions(address, PATTERN_SAMPLE_LIMIT).await?;
        Ok(patterns::analyze(&sample))
    }
}
