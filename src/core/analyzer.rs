//! Core analyzer module
//! Orchestrates the address analysis pipeline:
//! resolve chain -> validate -> fetch (concurrent) -> statistics -> dual scoring

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::core::{detector, patterns, risk_score};
use crate::models::config::SentryConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{AnalysisResult, ChainKind, KnownInteractions};
use crate::providers::registry::AdapterRegistry;
use crate::utils::constants::{DISPLAY_TRANSACTION_LIMIT, PATTERN_SAMPLE_LIMIT};

/// Main analyzer struct - one instance serves every request
pub struct AddressAnalyzer {
    registry: Arc<AdapterRegistry>,
    /// Fetch the sample once instead of separate list and pattern calls
    share_transaction_sample: bool,
}

impl AddressAnalyzer {
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        Self {
            registry,
            share_transaction_sample: true,
        }
    }

    /// Build adapters and analyzer from configuration
    pub fn from_config(config: &SentryConfig) -> AppResult<Self> {
        let registry = AdapterRegistry::from_config(config)?;
        Ok(Self::new(Arc::new(registry))
            .with_shared_sample(config.share_transaction_sample))
    }

    pub fn with_shared_sample(mut self, share: bool) -> Self {
        self.share_transaction_sample = share;
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Analyze one address.
    ///
    /// `chain_hint` takes precedence over shape detection.
    pub async fn analyze(
        &self,
        address: &str,
        chain_hint: Option<ChainKind>,
    ) -> AppResult<AnalysisResult> {
        let start = Instant::now();

        let address = address.trim();
        if address.is_empty() {
            return Err(AppError::address_required());
        }

        let chain = chain_hint
            .or_else(|| detector::identify(address))
            .ok_or_else(AppError::chain_undetected)?;

        let adapter = self
            .registry
            .resolve(address, Some(chain))
            .ok_or_else(|| AppError::unsupported_chain(chain))?;

        if !adapter.validate_address(address) {
            return Err(AppError::invalid_address(chain));
        }

        debug!(chain = %chain, shared = self.share_transaction_sample, "Fetching chain data");

        let (balance, sample, stats) = if self.share_transaction_sample {
            let (balance, sample) = tokio::try_join!(
                adapter.get_balance(address),
                adapter.get_transactions(address, PATTERN_SAMPLE_LIMIT),
            )
            .map_err(|e| Self::upstream_failure(chain, e))?;
            let stats = patterns::analyze(&sample);
            (balance, sample, stats)
        } else {
            tokio::try_join!(
                adapter.get_balance(address),
                adapter.get_transactions(address, PATTERN_SAMPLE_LIMIT),
                adapter.analyze_patterns(address),
            )
            .map_err(|e| Self::upstream_failure(chain, e))?
        };

        let investigator_risk = risk_score::investigator_risk(&balance, &sample, &stats);
        let user_safety = risk_score::user_safety(&balance, &sample, &stats);

        let transaction_count = sample.len();
        let mut transactions = sample;
        transactions.truncate(DISPLAY_TRANSACTION_LIMIT);

        info!(
            chain = %chain,
            transactions = transaction_count,
            risk = investigator_risk.score,
            safety = user_safety.score,
            "{} Analysis complete in {}ms",
            investigator_risk.level.emoji(),
            start.elapsed().as_millis()
        );

        Ok(AnalysisResult {
            address: address.to_string(),
            chain,
            chain_name: chain.name().to_string(),
            currency: chain.symbol().to_string(),
            balance,
            transaction_count,
            investigator_risk,
            user_safety,
            patterns: stats,
            known_interactions: KnownInteractions::default(),
            transactions,
        })
    }

    /// Input errors pass through; anything else becomes "analysis failed"
    fn upstream_failure(chain: ChainKind, err: AppError) -> AppError {
        if err.code.is_input_error() {
            return err;
        }
        warn!(chain = %chain, code = err.code_str(), "❌ Analysis failed: {}", err.detailed());
        AppError::analysis_failed(err)
    }
}
