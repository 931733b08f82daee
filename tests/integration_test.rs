//! Integration tests for Wallet Sentry

mod common;

use common::{tx, COUNTERPARTY_A, COUNTERPARTY_B};
use std::sync::Arc;
use wallet_sentry::{
    core::{patterns, risk_score},
    identify, is_address_valid_for_chain, AdapterRegistry, ChainAdapter, ChainKind, InvestigatorLevel,
    PatternStatistics, PendingAdapter, SafetyLevel, SentryConfig, TxStatus,
};

#[test]
fn test_chain_identification() {
    assert_eq!(
        identify("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"),
        Some(ChainKind::Bitcoin)
    );
    assert_eq!(
        identify("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"),
        Some(ChainKind::Bitcoin)
    );
    assert_eq!(
        identify("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU"),
        Some(ChainKind::Solana)
    );
    // Every EVM chain shares this shape; detection defaults to Ethereum
    assert_eq!(
        identify("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
        Some(ChainKind::Ethereum)
    );
    assert_eq!(identify("hello"), None);
    assert_eq!(identify(""), None);
}

#[test]
fn test_address_valid_for_chain() {
    let evm = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";
    assert!(is_address_valid_for_chain(evm, ChainKind::Ethereum));
    assert!(is_address_valid_for_chain(evm, ChainKind::Bnb));
    assert!(is_address_valid_for_chain(evm, ChainKind::Okx));
    assert!(!is_address_valid_for_chain(evm, ChainKind::Solana));
    assert!(!is_address_valid_for_chain(evm, ChainKind::Bitcoin));
}

#[test]
fn test_level_ordering() {
    assert!(InvestigatorLevel::Low < InvestigatorLevel::Medium);
    assert!(InvestigatorLevel::Medium < InvestigatorLevel::High);
    assert!(InvestigatorLevel::High < InvestigatorLevel::Critical);

    // Safety levels order from worst to best
    assert!(SafetyLevel::Dangerous < SafetyLevel::Unsafe);
    assert!(SafetyLevel::Unsafe < SafetyLevel::Caution);
    assert!(SafetyLevel::Caution < SafetyLevel::Safe);
}

/// 120 transactions, 12 of them above 100 units
fn busy_history(status: TxStatus) -> Vec<wallet_sentry::Transaction> {
    (0..120)
        .map(|i| {
            let value = if i < 12 { "150.5" } else { "0.25" };
            tx(COUNTERPARTY_A, value, 1_700_000_000 + i * 1800, status)
        })
        .collect()
}

fn busy_patterns() -> PatternStatistics {
    PatternStatistics {
        velocity: 0.5,
        unique_recipients: 60,
        round_number_ratio: 0.6,
        ..PatternStatistics::default()
    }
}

#[test]
fn test_investigator_risk_saturates() {
    let risk = risk_score::investigator_risk("1500", &busy_history(TxStatus::Success), &busy_patterns());

    // 10 + 30 + 25 + 20 + 20 + 15 + 15, clamped
    assert_eq!(risk.score, 100);
    assert_eq!(risk.level, InvestigatorLevel::Critical);
    assert_eq!(
        risk.factors,
        vec![
            "Very large balance (>1000)",
            "Very high transaction count (100+)",
            "Rapid fund movement (<1 hour avg)",
            "Many unique recipients (50+)",
            "High round number ratio (>50%)",
            "Multiple high-value transactions (10+)",
        ]
    );
}

#[test]
fn test_user_safety_busy_address() {
    let safety = risk_score::user_safety("1500", &busy_history(TxStatus::Success), &busy_patterns());

    // 50 + 20 - 20 + 5 - 15 + 10
    assert_eq!(safety.score, 50);
    assert_eq!(safety.level, SafetyLevel::Caution);
    assert_eq!(safety.factors.last().map(String::as_str), Some("All transactions successful"));

    let failing = risk_score::user_safety("1500", &busy_history(TxStatus::Failed), &busy_patterns());
    // 50 + 20 - 20 + 5 - 15 - 10
    assert_eq!(failing.score, 30);
    assert_eq!(failing.level, SafetyLevel::Unsafe);
}

#[test]
fn test_patterns_feed_scores() {
    let sample = vec![
        tx(COUNTERPARTY_A, "1.0", 1_700_007_200, TxStatus::Success),
        tx(COUNTERPARTY_B, "2.5", 1_700_003_600, TxStatus::Success),
        tx(COUNTERPARTY_A, "0", 1_700_000_000, TxStatus::Failed),
    ];
    let stats = patterns::analyze(&sample);

    assert_eq!(stats.velocity, 1.0);
    assert_eq!(stats.unique_recipients, 2);
    assert_eq!(stats.unique_senders, 1);
    assert_eq!(stats.total_volume, "3.5");

    let risk = risk_score::investigator_risk("1.0", &sample, &stats);
    // 10 + quick movement + moderate round numbers
    assert_eq!(risk.score, 28);
    assert_eq!(risk.level, InvestigatorLevel::Low);
}

#[test]
fn test_registry_override_wins() {
    let registry = AdapterRegistry::from_config(&SentryConfig::default()).unwrap();
    let evm = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";

    let detected = registry.resolve(evm, None).unwrap();
    assert_eq!(detected.chain(), ChainKind::Ethereum);

    let bnb = registry.resolve(evm, Some(ChainKind::Bnb)).unwrap();
    assert_eq!(bnb.chain(), ChainKind::Bnb);

    // Override is not re-validated by the registry
    let solana = registry.resolve(evm, Some(ChainKind::Solana)).unwrap();
    assert!(!solana.validate_address(evm));

    assert!(registry.resolve("not an address", None).is_none());
}

#[test]
fn test_registry_supported_chains() {
    let registry = AdapterRegistry::from_config(&SentryConfig::default()).unwrap();
    assert_eq!(registry.supported_chains(), ChainKind::ALL.to_vec());

    let empty = AdapterRegistry::new();
    assert!(empty.supported_chains().is_empty());
    assert!(empty.resolve("0xd8da6bf26964af9d7eed9e03e53415d37aa96045", None).is_none());
}

#[test]
fn test_pending_adapter_accepts_what_delegate_accepts() {
    let registry = AdapterRegistry::from_config(&SentryConfig::default()).unwrap();
    let ethereum = registry.get(ChainKind::Ethereum).unwrap();
    let pending = PendingAdapter::new(ChainKind::Bitcoin, Arc::clone(&ethereum));

    assert_eq!(pending.chain(), ChainKind::Bitcoin);
    assert_eq!(pending.delegate_chain(), ChainKind::Ethereum);
    assert!(!pending.validate_address("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"));
    assert!(pending.validate_address("0xd8da6bf26964af9d7eed9e03e53415d37aa96045"));
}
