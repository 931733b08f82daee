//! Chain Identifier
//!
//! Classifies an address by shape alone. Patterns are checked in a fixed
//! order (Bitcoin, Solana, EVM) and the first match wins. EVM-shaped input
//! always resolves to Ethereum; sibling EVM chains need an explicit hint.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::types::ChainKind;

lazy_static! {
    /// Legacy P2PKH/P2SH or bech32
    static ref BITCOIN_RE: Regex =
        Regex::new(r"^(?:[13][a-km-zA-HJ-NP-Z1-9]{25,34}|bc1[a-z0-9]{39,59})$")
            .expect("valid bitcoin regex");
    /// Base58 alphabet, 32-44 chars
    static ref SOLANA_RE: Regex =
        Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("valid solana regex");
    static ref EVM_RE: Regex = Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("valid evm regex");
}

/// Identify the chain for an address, if its shape matches any
pub fn identify(address: &str) -> Option<ChainKind> {
    let address = address.trim();
    if address.is_empty() {
        return None;
    }

    if BITCOIN_RE.is_match(address) {
        return Some(ChainKind::Bitcoin);
    }
    if !address.starts_with("0x") && SOLANA_RE.is_match(address) {
        return Some(ChainKind::Solana);
    }
    if EVM_RE.is_match(address) {
        return Some(ChainKind::Ethereum);
    }
    None
}

/// Whether `address` belongs to `chain`.
///
/// Any EVM-shaped address is accepted for every EVM-family chain.
pub fn is_address_valid_for_chain(address: &str, chain: ChainKind) -> bool {
    match identify(address) {
        Some(ChainKind::Ethereum) if chain.is_evm() => true,
        Some(detected) => detected == chain,
        None => false,
    }
}
