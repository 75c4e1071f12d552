//! # Greedy Breakdown
//!
//! Splits an amount into notes and coins, largest first.
//!
//! ## Algorithm
//! ```text
//! amount = 2650, active = [20000, 10000, 5000, 2000, 1000, 500, 200, 100, 50, ...]
//!
//!   2000 │ 2650 / 2000 = 1  → remaining  650
//!    500 │  650 /  500 = 1  → remaining  150
//!    100 │  150 /  100 = 1  → remaining   50
//!     50 │   50 /   50 = 1  → remaining    0
//!
//! result: [R$ 20 ×1, R$ 5 ×1, R$ 1 ×1, R$ 0,50 ×1]
//! ```
//!
//! Greedy is optimal for the BRL set: every active value is at least twice
//! the next smaller one. Any remainder the active set cannot reach is left
//! for the caller; the breakdown itself never fails.

use tracing::trace;

use crate::denomination::{Denomination, DenominationCount};
use crate::money::Money;

/// Decomposes `amount` over `denominations`, taken in the order given.
///
/// Callers pass active denominations sorted descending. Entries with a
/// non-positive value are skipped, zero counts are omitted, and a zero or
/// negative amount yields an empty list.
///
/// ```rust
/// use trokito_core::breakdown::breakdown;
/// use trokito_core::denomination::DenominationCatalog;
/// use trokito_core::money::Money;
///
/// let active = DenominationCatalog::brazilian().active();
/// let counts = breakdown(Money::from_cents(2650), &active);
/// let values: Vec<i64> = counts.iter().map(|c| c.denomination.value.cents()).collect();
/// assert_eq!(values, vec![2000, 500, 100, 50]);
/// ```
pub fn breakdown(amount: Money, denominations: &[Denomination]) -> Vec<DenominationCount> {
    let mut remaining = amount.cents();
    let mut counts = Vec::new();

    if remaining <= 0 {
        return counts;
    }

    for denomination in denominations {
        let value = denomination.value.cents();
        if value <= 0 || value > remaining {
            continue;
        }
        let pieces = remaining / value;
        remaining -= pieces * value;
        counts.push(DenominationCount::new(
            denomination.clone(),
            u32::try_from(pieces).unwrap_or(u32::MAX),
        ));
        if remaining == 0 {
            break;
        }
    }

    trace!(
        amount = amount.cents(),
        remaining,
        entries = counts.len(),
        "breakdown computed"
    );
    counts
}

/// Sum of a breakdown, `Σ value × count`.
pub fn covered_total(counts: &[DenominationCount]) -> Money {
    counts.iter().map(DenominationCount::subtotal).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
