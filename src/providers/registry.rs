//! Adapter Registry
//!
//! Maps a `ChainKind` to its adapter. This is the only place that knows
//! which concrete adapter serves which chain.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::detector;
use crate::models::config::SentryConfig;
use crate::models::errors::AppResult;
use crate::models::types::{ChainKind, Transaction};
use crate::providers::adapter::ChainAdapter;
use crate::providers::evm::EvmAdapter;
use crate::providers::rpc::build_http_client;
use crate::providers::solana::SolanaAdapter;

/// Stand-in for a chain without its own data source yet.
///
/// Reports the chain it represents but delegates validation and data
/// access to an Ethereum-compatible adapter, so only addresses the
/// delegate can query are accepted.
pub struct PendingAdapter {
    chain: ChainKind,
    delegate: Arc<dyn ChainAdapter>,
}

impl PendingAdapter {
    pub fn new(chain: ChainKind, delegate: Arc<dyn ChainAdapter>) -> Self {
        Self { chain, delegate }
    }

    /// Chain actually answering the data calls
    pub fn delegate_chain(&self) -> ChainKind {
        self.delegate.chain()
    }
}

#[async_trait]
impl ChainAdapter for PendingAdapter {
    fn chain(&self) -> ChainKind {
        self.chain
    }

    fn validate_address(&self, address: &str) -> bool {
        self.delegate.validate_address(address)
    }

    async fn get_balance(&self, address: &str) -> AppResult<String> {
        debug!(chain = %self.chain, delegate = %self.delegate.chain(), "Pending adapter balance");
        self.delegate.get_balance(address).await
    }

    async fn get_transactions(&self, address: &str, limit: usize) -> AppResult<Vec<Transaction>> {
        debug!(chain = %self.chain, delegate = %self.delegate.chain(), "Pending adapter transactions");
        match self.delegate.get_transactions(address, limit).await {
            Ok(transactions) => Ok(transactions),
            Err(e) => {
                debug!(chain = %self.chain, "Delegate rejected address, no history: {}", e);
                Ok(Vec::new())
            }
        }
    }
}

/// Registry of chain adapters
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<ChainKind, Arc<dyn ChainAdapter>>,
}

impl AdapterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every supported chain wired from configuration
    pub fn from_config(config: &SentryConfig) -> AppResult<Self> {
        let client = build_http_client(config.http_timeout)?;
        let mut registry = Self::new();

        for chain in [ChainKind::Ethereum, ChainKind::Worldcoin, ChainKind::Bnb] {
            if let Some(endpoints) = config.evm_endpoints(chain) {
                registry.register(Arc::new(EvmAdapter::new(chain, endpoints, client.clone())));
            }
        }
        registry.register(Arc::new(SolanaAdapter::new(&config.solana, client)));

        if let Some(ethereum) = registry.get(ChainKind::Ethereum) {
            for pending in [ChainKind::Bitcoin, ChainKind::Okx] {
                registry.register(Arc::new(PendingAdapter::new(pending, ethereum.clone())));
            }
        }

        info!("✅ Adapter registry ready ({} chains)", registry.adapters.len());
        Ok(registry)
    }

    /// Register (or replace) the adapter for its chain
    pub fn register(&mut self, adapter: Arc<dyn ChainAdapter>) {
        self.adapters.insert(adapter.chain(), adapter);
    }

    pub fn get(&self, chain: ChainKind) -> Option<Arc<dyn ChainAdapter>> {
        self.adapters.get(&chain).cloned()
    }

    /// Adapter for an address. An explicit override wins over detection
    /// and is not re-validated here.
    pub fn resolve(
        &self,
        address: &str,
        chain_override: Option<ChainKind>,
    ) -> Option<Arc<dyn ChainAdapter>> {
        let chain = chain_override.or_else(|| detector::identify(address))?;
        self.get(chain)
    }

    /// Registered chains in display order
    pub fn supported_chains(&self) -> Vec<ChainKind> {
        ChainKind::ALL
            .into_iter()
            .filter(|chain| self.adapters.contains_key(chain))
            .collect()
    }

    pub fn is_supported(&self, chain: ChainKind) -> bool {
        self.adapters.contains_key(&chain)
    }
}
