//! Constants Module - Single Source of Truth
//!
//! Chain metadata, default upstream endpoints, sample sizes and unit
//! conversion live here. No other module hardcodes these values.

use alloy_primitives::U256;

use crate::models::types::ChainKind;

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for HTTP requests
pub const USER_AGENT: &str = "WalletSentry/0.1.0";

// ============================================
// REQUEST CONSTANTS
// ============================================

/// Default per-call timeout for upstream requests (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Transactions returned to the caller in the result envelope
pub const DISPLAY_TRANSACTION_LIMIT: usize = 10;

/// Sample size used for statistics and scoring
pub const PATTERN_SAMPLE_LIMIT: usize = 50;

/// Concurrent `getTransaction` calls per Solana history fetch
pub const SOLANA_TX_CONCURRENCY: usize = 8;

/// Seconds per hour, for velocity
pub const SECONDS_PER_HOUR: f64 = 3600.0;

// ============================================
// UPSTREAM ENDPOINTS
// ============================================

/// Public Ethereum RPC nodes, tried after the configured primary
pub const ETHEREUM_PUBLIC_RPCS: [&str; 3] = [
    "https://eth.llamarpc.com",
    "https://cloudflare-eth.com",
    "https://rpc.ankr.com/eth",
];

/// Etherscan multichain (v2) API
pub const ETHERSCAN_V2_API: &str = "https://api.etherscan.io/v2/api";

/// Etherscan chain id for Ethereum mainnet
pub const ETHERSCAN_ETHEREUM_CHAIN_ID: u64 = 1;

/// World Chain public RPC
pub const WORLDCHAIN_PUBLIC_RPC: &str = "https://worldchain-mainnet.g.alchemy.com/public";

/// Worldscan (Etherscan-compatible) API
pub const WORLDSCAN_API: &str = "https://worldchain-mainnet.explorer.alchemy.com/api";

/// BscScan API
pub const BSCSCAN_API: &str = "https://api.bscscan.com/api";

/// Public BNB Chain node
pub const BSC_PUBLIC_RPC: &str = "https://bsc-dataseed.binance.org/";

/// Public Solana RPC
pub const SOLANA_PUBLIC_RPC: &str = "https://api.mainnet-beta.solana.com";

/// Build Infura mainnet URL
pub fn build_infura_url(api_key: &str) -> String {
    format!("https://mainnet.infura.io/v3/{}", api_key)
}

/// Build Helius mainnet URL
pub fn build_helius_url(api_key: &str) -> String {
    format!("https://mainnet.helius-rpc.com/?api-key={}", api_key)
}

// ============================================
// CHAIN METADATA
// ============================================

/// Get chain display name
pub fn get_chain_name(chain: ChainKind) -> &'static str {
    match chain {
        ChainKind::Ethereum => "Ethereum",
        ChainKind::Bitcoin => "Bitcoin",
        ChainKind::Solana => "Solana",
        ChainKind::Worldcoin => "Worldcoin",
        ChainKind::Okx => "OKX Chain",
        ChainKind::Bnb => "BNB Chain",
    }
}

/// Get native currency symbol
pub fn get_native_symbol(chain: ChainKind) -> &'static str {
    match chain {
        ChainKind::Ethereum => "ETH",
        ChainKind::Bitcoin => "BTC",
        ChainKind::Solana => "SOL",
        ChainKind::Worldcoin => "WLD",
        ChainKind::Okx => "OKT",
        ChainKind::Bnb => "BNB",
    }
}

/// Get block explorer URL for an address
pub fn get_explorer_url(chain: ChainKind, address: &str) -> String {
    match chain {
        ChainKind::Ethereum => format!("https://etherscan.io/address/{}", address),
        ChainKind::Bitcoin => format!("https://blockchair.com/bitcoin/address/{}", address),
        ChainKind::Solana => format!("https://solscan.io/account/{}", address),
        ChainKind::Worldcoin => format!(
            "https://worldchain-mainnet.explorer.alchemy.com/address/{}",
            address
        ),
        ChainKind::Okx => format!("https://www.oklink.com/oktc/address/{}", address),
        ChainKind::Bnb => format!("https://bscscan.com/address/{}", address),
    }
}

// ============================================
// CONVERSION UTILITIES - Single Source of Truth
// ============================================

/// Decimals of the EVM native unit (wei -> ether)
pub const WEI_DECIMALS: u8 = 18;

/// Decimals of the Solana native unit (lamports -> SOL)
pub const LAMPORT_DECIMALS: u8 = 9;

/// Format an integer subunit amount as a decimal string.
///
/// Exact integer arithmetic; trailing zeros are trimmed but one fractional
/// digit is always kept ("0.0", "1.5", "2.0").
pub fn format_units(amount: U256, decimals: u8) -> String {
    let unit = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / unit;
    let fraction = amount % unit;

    let mut fraction_str = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    while fraction_str.len() > 1 && fraction_str.ends_with('0') {
        fraction_str.pop();
    }
    if fraction_str.is_empty() {
        fraction_str.push('0');
    }

    format!("{}.{}", whole, fraction_str)
}

/// Convert a decimal wei string to ether; None if not an unsigned integer
pub fn wei_to_ether(wei: &str) -> Option<String> {
    let trimmed = wei.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(trimmed, 10)
        .ok()
        .map(|amount| format_units(amount, WEI_DECIMALS))
}

/// Convert lamports to SOL ("0", "1.5", "2")
pub fn lamports_to_sol(lamports: u64) -> String {
    let formatted = format_units(U256::from(lamports), LAMPORT_DECIMALS);
    match formatted.strip_suffix(".0") {
        Some(integral) => integral.to_string(),
        None => formatted,
    }
}

/// Parse a decimal amount string the way the scoring rules read it.
///
/// Unparseable input counts as zero.
#[inline]
pub fn parse_amount(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
