//! Configuration module for Wallet Sentry
//!
//! Endpoints and API keys are passed to adapters at construction time.
//! Defaults come from utils/constants.rs; `from_env` layers the keys on top.

use std::time::Duration;
use tracing::info;

use crate::models::types::ChainKind;
use crate::utils::constants::{
    build_helius_url, build_infura_url, BSCSCAN_API, BSC_PUBLIC_RPC, DEFAULT_HTTP_TIMEOUT_SECS,
    ETHERSCAN_ETHEREUM_CHAIN_ID, ETHERSCAN_V2_API, ETHEREUM_PUBLIC_RPCS, SOLANA_PUBLIC_RPC,
    WORLDCHAIN_PUBLIC_RPC, WORLDSCAN_API,
};

/// Where an EVM adapter reads the native balance from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceSource {
    /// `eth_getBalance` over the RPC list, in order
    Rpc,
    /// Explorer `action=balance` first, node RPC when the explorer fails
    ExplorerThenRpc,
}

/// Endpoint set for one EVM-family chain
#[derive(Debug, Clone)]
pub struct EvmEndpoints {
    /// JSON-RPC nodes in preference order
    pub rpc_urls: Vec<String>,
    /// Etherscan-compatible API base URL
    pub explorer_url: String,
    pub explorer_api_key: Option<String>,
    /// `chainid` query parameter for multichain explorers
    pub explorer_chain_id: Option<u64>,
    pub balance_source: BalanceSource,
}

impl EvmEndpoints {
    pub fn ethereum(infura_key: Option<&str>, etherscan_key: Option<String>) -> Self {
        let mut rpc_urls: Vec<String> = infura_key.map(build_infura_url).into_iter().collect();
        rpc_urls.extend(ETHEREUM_PUBLIC_RPCS.iter().map(|url| url.to_string()));

        Self {
            rpc_urls,
            explorer_url: ETHERSCAN_V2_API.to_string(),
            explorer_api_key: etherscan_key,
            explorer_chain_id: Some(ETHERSCAN_ETHEREUM_CHAIN_ID),
            balance_source: BalanceSource::Rpc,
        }
    }

    pub fn worldcoin(worldscan_key: Option<String>) -> Self {
        Self {
            rpc_urls: vec![WORLDCHAIN_PUBLIC_RPC.to_string()],
            explorer_url: WORLDSCAN_API.to_string(),
            explorer_api_key: worldscan_key,
            explorer_chain_id: None,
            balance_source: BalanceSource::Rpc,
        }
    }

    pub fn bnb(bscscan_key: Option<String>) -> Self {
        Self {
            rpc_urls: vec![BSC_PUBLIC_RPC.to_string()],
            explorer_url: BSCSCAN_API.to_string(),
            explorer_api_key: bscscan_key,
            explorer_chain_id: None,
            balance_source: BalanceSource::ExplorerThenRpc,
        }
    }
}

/// Endpoint set for Solana
#[derive(Debug, Clone)]
pub struct SolanaEndpoints {
    /// JSON-RPC nodes in preference order
    pub rpc_urls: Vec<String>,
}

impl SolanaEndpoints {
    pub fn new(custom_url: Option<String>, helius_key: Option<&str>) -> Self {
        let mut rpc_urls: Vec<String> = Vec::new();
        rpc_urls.extend(custom_url);
        rpc_urls.extend(helius_key.map(build_helius_url));
        rpc_urls.push(SOLANA_PUBLIC_RPC.to_string());
        Self { rpc_urls }
    }
}

/// Configuration for the analysis pipeline and its adapters
#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Per-call timeout for every upstream request
    pub http_timeout: Duration,
    pub ethereum: EvmEndpoints,
    pub worldcoin: EvmEndpoints,
    pub bnb: EvmEndpoints,
    pub solana: SolanaEndpoints,
    /// Fetch the transaction sample once and derive display list and
    /// statistics from it instead of issuing separate requests
    pub share_transaction_sample: bool,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            ethereum: EvmEndpoints::ethereum(None, None),
            worldcoin: EvmEndpoints::worldcoin(None),
            bnb: EvmEndpoints::bnb(None),
            solana: SolanaEndpoints::new(None, None),
            share_transaction_sample: true,
        }
    }
}

impl SentryConfig {
    /// Read an API key from the environment.
    /// Keys are never logged.
    fn env_key(name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != "YOUR_API_KEY")
    }

    /// Build configuration from environment variables
    pub fn from_env() -> Self {
        let etherscan_key = Self::env_key("ETHERSCAN_API_KEY");
        let infura_key = Self::env_key("INFURA_API_KEY");
        let bscscan_key = Self::env_key("BSCSCAN_API_KEY");
        let worldscan_key = Self::env_key("WORLDSCAN_API_KEY").or_else(|| etherscan_key.clone());
        let helius_key = Self::env_key("HELIUS_API_KEY");
        let solana_url = Self::env_key("SOLANA_RPC_URL");

        for (name, present) in [
            ("ETHERSCAN_API_KEY", etherscan_key.is_some()),
            ("INFURA_API_KEY", infura_key.is_some()),
            ("BSCSCAN_API_KEY", bscscan_key.is_some()),
            ("HELIUS_API_KEY", helius_key.is_some()),
        ] {
            if present {
                info!("🔑 {} configured (key hidden)", name);
            }
        }

        let http_timeout = std::env::var("SENTRY_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));

        let share_transaction_sample = std::env::var("SENTRY_SHARE_TX_SAMPLE")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        Self {
            http_timeout,
            ethereum: EvmEndpoints::ethereum(infura_key.as_deref(), etherscan_key),
            worldcoin: EvmEndpoints::worldcoin(worldscan_key),
            bnb: EvmEndpoints::bnb(bscscan_key),
            solana: SolanaEndpoints::new(solana_url, helius_key.as_deref()),
            share_transaction_sample,
        }
    }

    /// Get endpoints for an EVM chain with a concrete adapter
    pub fn evm_endpoints(&self, chain: ChainKind) -> Option<&EvmEndpoints> {
        match chain {
            ChainKind::Ethereum => Some(&self.ethereum),
            ChainKind::Worldcoin => Some(&self.worldcoin),
            ChainKind::Bnb => Some(&self.bnb),
            _ => None,
        }
    }
}
