//! Dual Risk Scoring Module
//!
//! Two rule tables over the same inputs:
//! - investigator risk: how suspicious the address looks (higher = worse)
//! - user safety: how safe it is to transact with (higher = better)
//!
//! Each rule group is an if/else-if ladder; at most one rung per group
//! fires. Factors are recorded in evaluation order. Scores are clamped to
//! 0-100 before the level is derived.

use crate::models::types::{
    InvestigatorLevel, PatternStatistics, RiskAssessment, SafetyLevel, Transaction,
};
use crate::utils::constants::parse_amount;

/// Transactions above this value (native units) count as high-value
pub const HIGH_VALUE_THRESHOLD: f64 = 100.0;

/// Running score plus the factors that moved it
#[derive(Debug, Clone)]
struct ScoreCard {
    score: i32,
    factors: Vec<String>,
}

impl ScoreCard {
    fn new(base: i32) -> Self {
        Self {
            score: base,
            factors: Vec::new(),
        }
    }

    fn apply(&mut self, weight: i32, factor: &str) {
        self.score += weight;
        self.factors.push(factor.to_string());
    }

    fn clamped(&self) -> u8 {
        self.score.clamp(0, 100) as u8
    }
}

/// Balance as the scoring rules read it; None when not a number
fn parse_balance(balance: &str) -> Option<f64> {
    balance.trim().parse::<f64>().ok().filter(|b| b.is_finite())
}

// ============================================
// INVESTIGATOR RISK
// ============================================

/// Builder for the investigator-risk assessment
pub struct InvestigatorRiskBuilder {
    card: ScoreCard,
}

impl InvestigatorRiskBuilder {
    pub const BASE_SCORE: i32 = 10;

    pub fn new() -> Self {
        Self {
            card: ScoreCard::new(Self::BASE_SCORE),
        }
    }

    /// Large holdings
    pub fn with_balance(mut self, balance: Option<f64>) -> Self {
        let Some(balance) = balance else {
            return self;
        };
        if balance > 1000.0 {
            self.card.apply(30, "Very large balance (>1000)");
        } else if balance > 100.0 {
            self.card.apply(20, "Large balance (>100)");
        } else if balance > 10.0 {
            self.card.apply(10, "Significant balance (>10)");
        }
        self
    }

    /// Transaction volume
    pub fn with_transaction_count(mut self, count: usize) -> Self {
        if count >= 100 {
            self.card.apply(25, "Very high transaction count (100+)");
        } else if count >= 50 {
            self.card.apply(15, "High transaction count (50+)");
        } else if count >= 10 {
            self.card.apply(5, "Active address (10+ transactions)");
        }
        self
    }

    /// Fast turnaround. A zero velocity (fewer than two transactions)
    /// falls through to the second rung.
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        if velocity > 0.0 && velocity < 1.0 {
            self.card.apply(20, "Rapid fund movement (<1 hour avg)");
        } else if velocity < 24.0 {
            self.card.apply(10, "Quick fund movement (<24 hours avg)");
        }
        self
    }

    /// Fan-out to many counterparties
    pub fn with_unique_recipients(mut self, recipients: usize) -> Self {
        if recipients > 50 {
            self.card.apply(20, "Many unique recipients (50+)");
        } else if recipients > 20 {
            self.card.apply(10, "Multiple recipients (20+)");
        }
        self
    }

    /// Structuring signal
    pub fn with_round_number_ratio(mut self, ratio: f64) -> Self {
        if ratio > 0.5 {
            self.card.apply(15, "High round number ratio (>50%)");
        } else if ratio > 0.3 {
            self.card.apply(8, "Moderate round numbers (>30%)");
        }
        self
    }

    pub fn with_high_value_count(mut self, high_value: usize) -> Self {
        if high_value > 10 {
            self.card.apply(15, "Multiple high-value transactions (10+)");
        } else if high_value > 0 {
            self.card.apply(5, "High-value transactions detected");
        }
        self
    }

    pub fn build(self) -> RiskAssessment<InvestigatorLevel> {
        let score = self.card.clamped();
        RiskAssessment {
            score,
            level: InvestigatorLevel::from_score(score),
            factors: self.card.factors,
        }
    }
}

impl Default for InvestigatorRiskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================
// USER SAFETY
// ============================================

/// Builder for the user-safety assessment
pub struct UserSafetyBuilder {
    card: ScoreCard,
}

impl UserSafetyBuilder {
    pub const BASE_SCORE: i32 = 50;

    pub fn new() -> Self {
        Self {
            card: ScoreCard::new(Self::BASE_SCORE),
        }
    }

    /// Long history rewarded, brand-new addresses penalized
    pub fn with_transaction_count(mut self, count: usize) -> Self {
        if count >= 100 {
            self.card.apply(20, "Long transaction history (100+)");
        } else if count >= 50 {
            self.card.apply(15, "Established history (50+)");
        } else if count >= 10 {
            self.card.apply(10, "Moderate history (10+)");
        } else if count < 5 {
            self.card.apply(-15, "New address (<5 transactions)");
        }
        self
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        // 168h = one week between transactions
        if velocity > 168.0 {
            self.card.apply(15, "Long holding periods (safe)");
        } else if velocity > 24.0 {
            self.card.apply(10, "Moderate activity pace");
        } else if velocity > 0.0 && velocity < 1.0 {
            self.card.apply(-20, "Rapid fund movement (risky)");
        }
        self
    }

    /// Stability band
    pub fn with_balance(mut self, balance: Option<f64>) -> Self {
        let Some(balance) = balance else {
            return self;
        };
        if balance > 0.1 && balance < 1000.0 {
            self.card.apply(10, "Stable balance range");
        } else if balance > 1000.0 {
            self.card.apply(5, "Large balance holder");
        } else if balance < 0.01 {
            self.card.apply(-5, "Very low balance");
        }
        self
    }

    pub fn with_unique_recipients(mut self, recipients: usize) -> Self {
        if recipients <= 5 {
            self.card.apply(10, "Limited recipients (personal use)");
        } else if recipients > 50 {
            self.card.apply(-15, "Many recipients (distribution pattern)");
        }
        self
    }

    pub fn with_round_number_ratio(mut self, ratio: f64) -> Self {
        if ratio > 0.8 {
            self.card.apply(5, "Consistent transaction amounts");
        }
        self
    }

    pub fn with_failures(mut self, failed: usize, count: usize) -> Self {
        if failed == 0 && count > 0 {
            self.card.apply(10, "All transactions successful");
        } else if failed as f64 > count as f64 * 0.1 {
            self.card.apply(-10, "High failure rate (>10%)");
        }
        self
    }

    pub fn build(self) -> RiskAssessment<SafetyLevel> {
        let score = self.card.clamped();
        RiskAssessment {
            score,
            level: SafetyLevel::from_score(score),
            factors: self.card.factors,
        }
    }
}

impl Default for UserSafetyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================
// SCORING ENTRY POINTS
// ============================================

/// Forensic perspective: how suspicious is this address?
pub fn investigator_risk(
    balance: &str,
    transactions: &[Transaction],
    patterns: &PatternStatistics,
) -> RiskAssessment<InvestigatorLevel> {
    let high_value = transactions
        .iter()
        .filter(|tx| parse_amount(&tx.value) > HIGH_VALUE_THRESHOLD)
        .count();

    InvestigatorRiskBuilder::new()
        .with_balance(parse_balance(balance))
        .with_transaction_count(transactions.len())
        .with_velocity(patterns.velocity)
        .with_unique_recipients(patterns.unique_recipients)
        .with_round_number_ratio(patterns.round_number_ratio)
        .with_high_value_count(high_value)
        .build()
}

/// Counterparty perspective: how safe is it to transact with this address?
pub fn user_safety(
    balance: &str,
    transactions: &[Transaction],
    patterns: &PatternStatistics,
) -> RiskAssessment<SafetyLevel> {
    let failed = transactions.iter().filter(|tx| tx.is_failed()).count();

    UserSafetyBuilder::new()
        .with_transaction_count(transactions.len())
        .with_velocity(patterns.velocity)
        .with_balance(parse_balance(balance))
        .with_unique_recipients(patterns.unique_recipients)
        .with_round_number_ratio(patterns.round_number_ratio)
        .with_failures(failed, transactions.len())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{ChainKind, TxStatus};

    fn tx(value: &str, status: TxStatus) -> Transaction {
        Transaction {
            hash: "0x".to_string(),
            from: "a".to_string(),
            to: "b".to_string(),
            value: value.to_string(),
            timestamp: 0,
            chain: ChainKind::Ethereum,
            fee: None,
            status,
        }
    }

    #[test]
    fn test_empty_address() {
        let patterns = PatternStatistics::default();

        let risk = investigator_risk("0", &[], &patterns);
        // base + velocity 0 falls into the <24h rung
        assert_eq!(risk.score, 20);
        assert_eq!(risk.level, InvestigatorLevel::Low);
        assert_eq!(risk.factors, vec!["Quick fund movement (<24 hours avg)"]);

        let safety = user_safety("0", &[], &patterns);
        // 50 - 15 (new) - 5 (low balance) + 10 (few recipients)
        assert_eq!(safety.score, 40);
        assert_eq!(safety.level, SafetyLevel::Unsafe);
        assert_eq!(
            safety.factors,
            vec![
                "New address (<5 transactions)",
                "Very low balance",
                "Limited recipients (personal use)"
            ]
        );
    }

    #[test]
    fn test_velocity_step() {
        let at_23h = InvestigatorRiskBuilder::new().with_velocity(23.0).build();
        let at_30h = InvestigatorRiskBuilder::new().with_velocity(30.0).build();
        assert_eq!(at_23h.score, 20);
        assert_eq!(at_30h.score, 10);
    }

    #[test]
    fn test_high_failure_rate() {
        let txs = vec![
            tx("1", TxStatus::Failed),
            tx("1", TxStatus::Success),
            tx("1", TxStatus::Success),
        ];
        let safety = user_safety("5", &txs, &PatternStatistics::default());
        assert!(safety.factors.contains(&"High failure rate (>10%)".to_string()));
        assert!(!safety.factors.contains(&"All transactions successful".to_string()));
    }

    #[test]
    fn test_scores_stay_in_range() {
        let patterns = PatternStatistics {
            velocity: 0.1,
            unique_recipients: 500,
            round_number_ratio: 1.0,
            ..PatternStatistics::default()
        };
        let txs: Vec<Transaction> = (0..200).map(|_| tx("1000", TxStatus::Failed)).collect();

        let risk = investigator_risk("1e9", &txs, &patterns);
        assert_eq!(risk.score, 100);
        assert_eq!(risk.level, InvestigatorLevel::Critical);

        let safety = user_safety("1e9", &txs, &patterns);
        assert!(safety.score <= 100);

        let safety = user_safety("0", &[], &patterns);
        assert!(safety.score <= 100);
    }

    #[test]
    fn test_unparseable_balance_skips_balance_rules() {
        let risk = investigator_risk("n/a", &[], &PatternStatistics::default());
        assert!(!risk.factors.iter().any(|f| f.contains("balance")));
        let safety = user_safety("n/a", &[], &PatternStatistics::default());
        assert!(!safety.factors.iter().any(|f| f.contains("balance")));
    }
}
