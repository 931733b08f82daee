//! Pattern Analyzer
//!
//! Aggregate behaviour statistics over a transaction sample. Pure and
//! chain-agnostic; every adapter feeds its sample through `analyze`.

use std::collections::HashSet;

use crate::models::types::{PatternStatistics, Transaction};
use crate::utils::constants::{parse_amount, SECONDS_PER_HOUR};

/// Mean gap between consecutive transactions, in hours
pub fn velocity_hours(transactions: &[Transaction]) -> f64 {
    if transactions.len() < 2 {
        return 0.0;
    }

    // Consecutive gaps over the sorted timestamps sum to newest - oldest
    let (oldest, newest) = transactions
        .iter()
        .map(|tx| tx.timestamp)
        .fold((i64::MAX, i64::MIN), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));

    let total_gap = (i128::from(newest) - i128::from(oldest)) as f64;
    total_gap / (transactions.len() - 1) as f64 / SECONDS_PER_HOUR
}

/// Non-zero whole-number amount
#[inline]
fn is_round_number(value: f64) -> bool {
    value > 0.0 && value == value.floor()
}

/// Compute statistics for a transaction sample.
///
/// Counterparty sets compare raw strings; no case folding.
pub fn analyze(transactions: &[Transaction]) -> PatternStatistics {
    if transactions.is_empty() {
        return PatternStatistics::default();
    }

    let recipients: HashSet<&str> = transactions.iter().map(|tx| tx.to.as_str()).collect();
    let senders: HashSet<&str> = transactions.iter().map(|tx| tx.from.as_str()).collect();

    let values: Vec<f64> = transactions.iter().map(|tx| parse_amount(&tx.value)).collect();
    let count = values.len() as f64;
    let round_numbers = values.iter().filter(|v| is_round_number(**v)).count();
    let total_volume: f64 = values.iter().sum();

    PatternStatistics {
        velocity: velocity_hours(transactions),
        unique_recipients: recipients.len(),
        unique_senders: senders.len(),
        round_number_ratio: round_numbers as f64 / count,
        avg_transaction_value: (total_volume / count).to_string(),
        total_volume: total_volume.to_string(),
    }
}
