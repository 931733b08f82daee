//! EVM Adapter Module
//!
//! One adapter type serves every EVM-family chain with a concrete data
//! source (Ethereum, Worldcoin, BNB). Balance comes from node RPC or from
//! the explorer with RPC fallback; history always comes from the explorer.

use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::models::config::{BalanceSource, EvmEndpoints};
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{ChainKind, Transaction};
use crate::providers::adapter::ChainAdapter;
use crate::providers::explorer::ExplorerClient;
use crate::providers::rpc::RpcProvider;
use crate::utils::constants::{format_units, WEI_DECIMALS};

/// Check a 0x address: 40 hex digits, EIP-55 checksum when mixed case
pub fn is_valid_evm_address(address: &str) -> bool {
    let Some(body) = address.strip_prefix("0x") else {
        return false;
    };
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(address, None).is_ok();
    }
    true
}

/// Adapter for an EVM-family chain
pub struct EvmAdapter {
    chain: ChainKind,
    rpc: RpcProvider,
    explorer: ExplorerClient,
    balance_source: BalanceSource,
}

impl EvmAdapter {
    pub fn new(chain: ChainKind, endpoints: &EvmEndpoints, client: reqwest::Client) -> Self {
        let rpc = RpcProvider::new(chain.as_str(), endpoints.rpc_urls.clone(), client.clone());
        let explorer = ExplorerClient::new(
            format!("{}-explorer", chain.as_str()),
            endpoints.explorer_url.clone(),
            endpoints.explorer_api_key.clone(),
            endpoints.explorer_chain_id,
            client,
        );

        info!(
            chain = %chain,
            rpc = %rpc.masked_url(),
            rpc_count = rpc.endpoint_count(),
            "✅ EVM adapter initialized"
        );

        Self {
            chain,
            rpc,
            explorer,
            balance_source: endpoints.balance_source,
        }
    }

    async fn balance_from_rpc(&self, address: &str) -> AppResult<String> {
        let wei = self.rpc.get_balance_wei(address).await?;
        Ok(format_units(wei, WEI_DECIMALS))
    }

    async fn balance_from_explorer_then_rpc(&self, address: &str) -> AppResult<String> {
        match self.explorer.balance(address).await {
            Ok(balance) => return Ok(balance),
            Err(e) if e.code.is_transient() => {
                info!(chain = %self.chain, "🔄 Explorer API unavailable, using RPC: {}", e);
            }
            Err(e) => {
                warn!(chain = %self.chain, "⚠️ Explorer balance failed, using RPC: {}", e);
            }
        }

        self.balance_from_rpc(address).await.map_err(|e| {
            warn!(chain = %self.chain, "⚠️ RPC balance fallback failed: {}", e);
            AppError::new(
                ErrorCode::BalanceFetchFailed,
                format!(
                    "Failed to fetch {} balance from both API and RPC",
                    self.chain.symbol()
                ),
            )
        })
    }
}

#[async_trait]
impl ChainAdapter for EvmAdapter {
    fn chain(&self) -> ChainKind {
        self.chain
    }

    fn validate_address(&self, address: &str) -> bool {
        is_valid_evm_address(address)
    }

    async fn get_balance(&self, address: &str) -> AppResult<String> {
        match self.balance_source {
            BalanceSource::Rpc => self.balance_from_rpc(address).await.map_err(|e| {
                warn!(chain = %self.chain, "⚠️ Balance fetch failed: {}", e);
                AppError::balance_fetch_failed(self.chain, e.message)
            }),
            BalanceSource::ExplorerThenRpc => self.balance_from_explorer_then_rpc(address).await,
        }
    }

    async fn get_transactions(&self, address: &str, limit: usize) -> AppResult<Vec<Transaction>> {
        if !self.validate_address(address) {
            return Err(AppError::invalid_address(self.chain));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        match self.explorer.txlist(address, limit, self.chain).await {
            Ok(transactions) => {
                debug!(chain = %self.chain, count = transactions.len(), "Fetched transactions");
                Ok(transactions)
            }
            Err(e) => {
                warn!(
                    chain = %self.chain,
                    source = %self.explorer.label(),
                    "⚠️ Transaction fetch failed, returning empty history: {}",
                    e
                );
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evm_address_shape() {
        assert!(is_valid_evm_address("0x0000000000000000000000000000000000000000"));
        assert!(is_valid_evm_address("0xd8da6bf26964af9d7eed9e03e53415d37aa96045"));
        assert!(is_valid_evm_address("0xD8DA6BF26964AF9D7EED9E03E53415D37AA96045"));
        assert!(!is_valid_evm_address("d8da6bf26964af9d7eed9e03e53415d37aa96045"));
        assert!(!is_valid_evm_address("0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb"));
        assert!(!is_valid_evm_address("0xzz0000000000000000000000000000000000000"));
    }

    #[test]
    fn test_evm_checksum() {
        // vitalik.eth, canonical EIP-55 casing
        assert!(is_valid_evm_address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"));
        // one letter flipped
        assert!(!is_valid_evm_address("0xD8dA6BF26964aF9D7eEd9e03E53415D37aA96045"));
    }
}
