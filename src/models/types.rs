//! Type definitions for Wallet Sentry
//! All core data structures for address analysis

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::constants::{get_chain_name, get_explorer_url, get_native_symbol};

/// Supported blockchain families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    Ethereum,
    Bitcoin,
    Solana,
    Worldcoin,
    Okx,
    Bnb,
}

impl ChainKind {
    /// Every supported chain, in display order
    pub const ALL: [ChainKind; 6] = [
        ChainKind::Ethereum,
        ChainKind::Bitcoin,
        ChainKind::Solana,
        ChainKind::Worldcoin,
        ChainKind::Okx,
        ChainKind::Bnb,
    ];

    /// Lowercase identifier used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainKind::Ethereum => "ethereum",
            ChainKind::Bitcoin => "bitcoin",
            ChainKind::Solana => "solana",
            ChainKind::Worldcoin => "worldcoin",
            ChainKind::Okx => "okx",
            ChainKind::Bnb => "bnb",
        }
    }

    /// Get chain display name (delegates to constants)
    pub fn name(&self) -> &'static str {
        get_chain_name(*self)
    }

    /// Get native currency symbol (delegates to constants)
    pub fn symbol(&self) -> &'static str {
        get_native_symbol(*self)
    }

    /// Block explorer page for an address on this chain
    pub fn explorer_url(&self, address: &str) -> String {
        get_explorer_url(*self, address)
    }

    /// EVM-compatible chains share the 0x address shape
    pub fn is_evm(&self) -> bool {
        matches!(
            self,
            ChainKind::Ethereum | ChainKind::Worldcoin | ChainKind::Okx | ChainKind::Bnb
        )
    }
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ChainKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unsupported chain: {}", s))
    }
}

/// Execution outcome of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
}

/// Normalized transaction record produced by a chain adapter.
///
/// `value` and `fee` are decimal strings in native-currency units (ETH, SOL, ...),
/// never raw subunits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    /// Unix timestamp (seconds)
    pub timestamp: i64,
    pub chain: ChainKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    pub status: TxStatus,
}

impl Transaction {
    pub fn is_failed(&self) -> bool {
        self.status == TxStatus::Failed
    }
}

/// Aggregate behaviour statistics over a transaction sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternStatistics {
    /// Mean hours between consecutive transactions
    pub velocity: f64,
    pub unique_recipients: usize,
    pub unique_senders: usize,
    /// Fraction of transactions with a non-zero integer value
    pub round_number_ratio: f64,
    pub avg_transaction_value: String,
    pub total_volume: String,
}

impl Default for PatternStatistics {
    fn default() -> Self {
        Self {
            velocity: 0.0,
            unique_recipients: 0,
            unique_senders: 0,
            round_number_ratio: 0.0,
            avg_transaction_value: "0".to_string(),
            total_volume: "0".to_string(),
        }
    }
}

/// Investigator-risk classification (higher = more suspicious)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestigatorLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl InvestigatorLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            75..=u8::MAX => InvestigatorLevel::Critical,
            50..=74 => InvestigatorLevel::High,
            30..=49 => InvestigatorLevel::Medium,
            _ => InvestigatorLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestigatorLevel::Low => "low",
            InvestigatorLevel::Medium => "medium",
            InvestigatorLevel::High => "high",
            InvestigatorLevel::Critical => "critical",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            InvestigatorLevel::Low => "✅",
            InvestigatorLevel::Medium => "🟡",
            InvestigatorLevel::High => "🔴",
            InvestigatorLevel::Critical => "💀",
        }
    }
}

/// User-safety classification (higher = safer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    Dangerous,
    Unsafe,
    Caution,
    Safe,
}

impl SafetyLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => SafetyLevel::Safe,
            50..=69 => SafetyLevel::Caution,
            30..=49 => SafetyLevel::Unsafe,
            _ => SafetyLevel::Dangerous,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyLevel::Dangerous => "dangerous",
            SafetyLevel::Unsafe => "unsafe",
            SafetyLevel::Caution => "caution",
            SafetyLevel::Safe => "safe",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SafetyLevel::Dangerous => "💀",
            SafetyLevel::Unsafe => "🔴",
            SafetyLevel::Caution => "🟠",
            SafetyLevel::Safe => "✅",
        }
    }
}

/// Result of one scoring perspective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment<L> {
    /// Clamped to 0-100
    pub score: u8,
    pub level: L,
    /// Triggered rules in evaluation order
    pub factors: Vec<String>,
}

/// Placeholder for counterparty labelling; always empty for now
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnownInteractions {
    pub exchanges: Vec<String>,
    pub mixers: Vec<String>,
    pub defi: Vec<String>,
}

/// Full response envelope for one analyzed address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub address: String,
    pub chain: ChainKind,
    pub chain_name: String,
    pub currency: String,
    pub balance: String,
    pub transaction_count: usize,
    pub investigator_risk: RiskAssessment<InvestigatorLevel>,
    pub user_safety: RiskAssessment<SafetyLevel>,
    pub patterns: PatternStatistics,
    pub known_interactions: KnownInteractions,
    /// Most recent transactions first, at most ten
    pub transactions: Vec<Transaction>,
}

impl AnalysisResult {
    /// Pretty print the analysis result
    pub fn summary(&self) -> String {
        let mut output = format!(
            "\n🔎 {} ({}) | Balance: {} {}\n",
            self.address, self.chain_name, self.balance, self.currency
        );
        output.push_str(&format!(
            "   {} Investigator risk: {}/100 ({})\n",
            self.investigator_risk.level.emoji(),
            self.investigator_risk.score,
            self.investigator_risk.level.as_str()
        ));
        for factor in &self.investigator_risk.factors {
            output.push_str(&format!("     - {}\n", factor));
        }
        output.push_str(&format!(
            "   {} User safety: {}/100 ({})\n",
            self.user_safety.level.emoji(),
            self.user_safety.score,
            self.user_safety.level.as_str()
        ));
        for factor in &self.user_safety.factors {
            output.push_str(&format!("     - {}\n", factor));
        }
        output.push_str(&format!(
            "   Transactions: {} | Velocity: {:.2}h | Recipients: {} | Senders: {}\n",
            self.transaction_count,
            self.patterns.velocity,
            self.patterns.unique_recipients,
            self.patterns.unique_senders
        ));
        output
    }
}
