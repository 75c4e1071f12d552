//! # Till Closing
//!
//! End-of-shift cash count: sums what the cashier counted, flags counts that
//! look like typos, and helps drive the counting form.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  initialize_counts(catalog) ──► [R$ 20 ×0, R$ 10 ×0, ..., R$ 0,05 ×0]  │
//! │            │                                                            │
//! │            ▼  (operator taps +5, +10, types a number...)                │
//! │  update_count(counts, value, n)                                        │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  summarize(counts) ──► ClosingSummary { notes, coins, total, pieces }  │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  ClosingChecks::validate(summary) ──► warnings (never blocks saving)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A physical count is exact by definition; nothing here rounds.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::denomination::{
    counted_total, partition_by_kind, piece_count, DenominationCatalog, DenominationCount,
};
use crate::money::Money;
use crate::MAX_DENOMINATION_COUNT;

// =============================================================================
// Summary
// =============================================================================

/// Totals of a till count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClosingSummary {
    pub total_notes: Money,
    pub total_coins: Money,
    pub total_amount: Money,
    #[ts(type = "number")]
    pub total_piece_count: u64,
    /// Entries with a non-zero count, in input order.
    pub counted_denominations: Vec<DenominationCount>,
}

/// Reduces a till count to totals.
///
/// Zero-count entries are dropped from `counted_denominations`.
///
/// ```rust
/// use trokito_core::closing::summarize;
/// use trokito_core::denomination::{DenominationCatalog, DenominationCount};
/// use trokito_core::money::Money;
///
/// let catalog = DenominationCatalog::brazilian();
/// let note = |cents| catalog.get(Money::from_cents(cents)).unwrap().clone();
/// let counts = vec![
///     DenominationCount::new(note(10000), 2),
///     DenominationCount::new(note(5000), 1),
///     DenominationCount::new(note(500), 1),
/// ];
///
/// let summary = summarize(&counts);
/// assert_eq!(summary.total_notes.cents(), 25500);
/// assert_eq!(summary.total_piece_count, 4);
/// ```
pub fn summarize(counts: &[DenominationCount]) -> ClosingSummary {
    let counted: Vec<DenominationCount> = counts.iter().filter(|c| c.count > 0).cloned().collect();
    let split = partition_by_kind(&counted);
    let total_notes = counted_total(&split.notes);
    let total_coins = counted_total(&split.coins);

    ClosingSummary {
        total_notes,
        total_coins,
        total_amount: total_notes + total_coins,
        total_piece_count: piece_count(&counted),
        counted_denominations: counted,
    }
}

// =============================================================================
// Sanity Checks
// =============================================================================

/// Advisory finding on a till count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClosingWarning {
    NothingCounted,
    OnlyCoins,
    OnlyNotes,
    ImplausibleCount { label: String, count: u32 },
}

impl fmt::Display for ClosingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosingWarning::NothingCounted => f.write_str("Nenhum valor foi contado"),
            ClosingWarning::OnlyCoins => f.write_str("Apenas moedas foram contadas"),
            ClosingWarning::OnlyNotes => f.write_str("Apenas notas foram contadas"),
            ClosingWarning::ImplausibleCount { label, count } => write!(
                f,
                "Quantidade muito alta detectada ({count} x {label}) - verifique se está correto"
            ),
        }
    }
}

/// Outcome of the sanity checks. `is_valid` is true when no warning was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClosingValidation {
    pub is_valid: bool,
    pub warnings: Vec<ClosingWarning>,
}

impl ClosingValidation {
    /// Warning texts, ready for display.
    pub fn messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// Thresholds for the sanity checks.
///
/// The default warns when only coins were counted. Drawers that hold only
/// notes after the float is removed are common, so that warning is opt-in
/// through [`ClosingChecks::strict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClosingChecks {
    pub warn_only_coins: bool,
    pub warn_only_notes: bool,
    /// Denominations at or above this value use `high_value_max_count`.
    pub high_value_threshold: Money,
    pub high_value_max_count: u32,
    pub max_count: u32,
}

impl Default for ClosingChecks {
    fn default() -> Self {
        ClosingChecks {
            warn_only_coins: true,
            warn_only_notes: false,
            high_value_threshold: Money::from_cents(5000),
            high_value_max_count: 100,
            max_count: 500,
        }
    }
}

impl ClosingChecks {
    /// Warns on any lopsided count.
    pub fn strict() -> Self {
        ClosingChecks {
            warn_only_notes: true,
            ..Default::default()
        }
    }

    /// Runs every check. Never fails; at worst returns warnings.
    pub fn validate(&self, summary: &ClosingSummary) -> ClosingValidation {
        let mut warnings = Vec::new();

        if summary.total_amount.is_zero() {
            warnings.push(ClosingWarning::NothingCounted);
        } else if summary.total_notes.is_zero() && self.warn_only_coins {
            warnings.push(ClosingWarning::OnlyCoins);
        } else if summary.total_coins.is_zero() && self.warn_only_notes {
            warnings.push(ClosingWarning::OnlyNotes);
        }

        for counted in &summary.counted_denominations {
            let limit = if counted.denomination.value >= self.high_value_threshold {
                self.high_value_max_count
            } else {
                self.max_count
            };
            if counted.count > limit {
                warnings.push(ClosingWarning::ImplausibleCount {
                    label: counted.denomination.label.clone(),
                    count: counted.count,
                });
            }
        }

        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "till count flagged");
        }

        ClosingValidation {
            is_valid: warnings.is_empty(),
            warnings,
        }
    }
}

/// Checks a summary with the default thresholds.
pub fn validate(summary: &ClosingSummary) -> ClosingValidation {
    ClosingChecks::default().validate(summary)
}

/// Checks a summary with custom thresholds.
pub fn validate_with(summary: &ClosingSummary, checks: &ClosingChecks) -> ClosingValidation {
    checks.validate(summary)
}

// =============================================================================
// Counting Form Helpers
// =============================================================================

/// One zeroed entry per catalog denomination, largest first.
pub fn initialize_counts(catalog: &DenominationCatalog) -> Vec<DenominationCount> {
    catalog
        .all()
        .iter()
        .map(|d| DenominationCount::new(d.clone(), 0))
        .collect()
}

/// Sets the count for one denomination.
///
/// Negative input clamps to zero, large input to [`MAX_DENOMINATION_COUNT`].
/// Values not present in `counts` are ignored.
pub fn update_count(counts: &mut [DenominationCount], value: Money, count: i64) {
    let clamped = count.clamp(0, i64::from(MAX_DENOMINATION_COUNT));
    if let Some(entry) = counts.iter_mut().find(|c| c.denomination.value == value) {
        entry.count = u32::try_from(clamped).unwrap_or(0);
    }
}

/// Quick-add buttons suited to a denomination's size.
///
/// ```rust
/// use trokito_core::closing::quick_count_options;
/// use trokito_core::money::Money;
///
/// assert_eq!(quick_count_options(Money::from_cents(5000)), [5, 10, 20, 50]);
/// assert_eq!(quick_count_options(Money::from_cents(5)), [10, 25, 50, 100]);
/// ```
pub fn quick_count_options(value: Money) -> [u32; 4] {
    match value.cents() {
        c if c >= 5000 => [5, 10, 20, 50],
        c if c >= 1000 => [5, 10, 25, 50],
        c if c >= 100 => [10, 20, 50, 100],
        _ => [10, 25, 50, 100],
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn count(cents: i64, n: u32) -> DenominationCount {
        let catalog = DenominationCatalog::brazilian();
        DenominationCount::new(catalog.get(Money::from_cents(cents)).unwrap().clone(), n)
    }

    #[test]
    fn test_closing_aggregation_example() {
        let summary = summarize(&[count(10000, 2), count(5000, 1), count(500, 1)]);
        assert_eq!(summary.total_notes.cents(), 25500);
        assert_eq!(summary.total_coins.cents(), 0);
        assert_eq!(summary.total_amount.cents(), 25500);
        assert_eq!(summary.total_piece_count, 4);

        let validation = validate(&summary);
        assert!(validation.is_valid);
        assert!(validation.warnings.is_empty());
    }

    #[test]
    fn test_mixed_count() {
        let summary = summarize(&[count(2000, 3), count(100, 7), count(5, 0), count(25, 4)]);
        assert_eq!(summary.total_notes.cents(), 6000);
        assert_eq!(summary.total_coins.cents(), 800);
        assert_eq!(summary.total_amount.cents(), 6800);
        assert_eq!(summary.total_piece_count, 14);
        assert_eq!(summary.counted_denominations.len(), 3);
    }

    #[test]
    fn test_nothing_counted() {
        let summary = summarize(&initialize_counts(&DenominationCatalog::brazilian()));
        assert!(summary.counted_denominations.is_empty());
        let validation = validate(&summary);
        assert!(!validation.is_valid);
        assert_eq!(validation.warnings, vec![ClosingWarning::NothingCounted]);
        assert_eq!(validation.messages(), vec!["Nenhum valor foi contado"]);
    }

    #[test]
    fn test_lopsided_counts() {
        let coins = summarize(&[count(100, 10)]);
        let validation = validate(&coins);
        assert!(!validation.is_valid);
        assert_eq!(validation.warnings, vec![ClosingWarning::OnlyCoins]);

        let notes = summarize(&[count(2000, 1)]);
        assert!(validate(&notes).is_valid);
        let strict = validate_with(&notes, &ClosingChecks::strict());
        assert!(!strict.is_valid);
        assert_eq!(strict.warnings, vec![ClosingWarning::OnlyNotes]);
    }

    #[test]
    fn test_implausible_counts() {
        let summary = summarize(&[count(5000, 101), count(2000, 101), count(5, 501)]);
        let validation = validate(&summary);
        assert!(!validation.is_valid);
        assert_eq!(
            validation.warnings,
            vec![
                ClosingWarning::ImplausibleCount {
                    label: "R$ 50".into(),
                    count: 101
                },
                ClosingWarning::ImplausibleCount {
                    label: "R$ 0,05".into(),
                    count: 501
                },
            ]
        );
        assert_eq!(
            validation.warnings[0].to_string(),
            "Quantidade muito alta detectada (101 x R$ 50) - verifique se está correto"
        );
    }

    #[test]
    fn test_update_count_clamps() {
        let mut counts = initialize_counts(&DenominationCatalog::brazilian());
        update_count(&mut counts, Money::from_cents(500), 7);
        update_count(&mut counts, Money::from_cents(50), -3);
        update_count(&mut counts, Money::from_cents(10), 1_000_000);
        update_count(&mut counts, Money::from_cents(3), 9);

        let get = |cents| {
            counts
                .iter()
                .find(|c| c.denomination.value.cents() == cents)
                .map(|c| c.count)
        };
        assert_eq!(get(500), Some(7));
        assert_eq!(get(50), Some(0));
        assert_eq!(get(10), Some(MAX_DENOMINATION_COUNT));
        assert_eq!(get(3), None);
    }

    #[test]
    fn test_till_closing_form() {
        let till = DenominationCatalog::brazilian().filtered(crate::CatalogFilter::TillClosing);
        let counts = initialize_counts(&till);
        assert_eq!(counts.len(), 10);
        assert_eq!(counts[0].denomination.value.cents(), 2000);
        assert!(counts.iter().all(|c| c.count == 0));
    }

    #[test]
    fn test_quick_count_options() {
        assert_eq!(quick_count_options(Money::from_cents(20000)), [5, 10, 20, 50]);
        assert_eq!(quick_count_options(Money::from_cents(2000)), [5, 10, 25, 50]);
        assert_eq!(quick_count_options(Money::from_cents(200)), [10, 20, 50, 100]);
        assert_eq!(quick_count_options(Money::from_cents(100)), [10, 20, 50, 100]);
        assert_eq!(quick_count_options(Money::from_cents(50)), [10, 25, 50, 100]);
    }

    proptest! {
        #[test]
        fn prop_summary_is_consistent(raw in proptest::collection::vec(0u32..2000, 13)) {
            let catalog = DenominationCatalog::brazilian();
            let counts: Vec<DenominationCount> = catalog
                .all()
                .iter()
                .zip(raw.iter())
                .map(|(d, n)| DenominationCount::new(d.clone(), *n))
                .collect();
            let summary = summarize(&counts);
            prop_assert_eq!(summary.total_notes + summary.total_coins, summary.total_amount);
            prop_assert_eq!(summary.total_piece_count, raw.iter().map(|n| u64::from(*n)).sum::<u64>());
            prop_assert_eq!(summarize(&counts), summary);
        }
    }
}
