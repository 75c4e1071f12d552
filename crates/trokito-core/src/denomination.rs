//! # Denominations
//!
//! The Brazilian Real note/coin set and the counted pairs built from it.
//!
//! ## Catalog
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NOTES                               COINS                              │
//! │  ─────                               ─────                              │
//! │  R$ 200  20000                       R$ 1     100                       │
//! │  R$ 100  10000                       R$ 0,50   50                       │
//! │  R$ 50    5000   ◄─ till closing     R$ 0,25   25                       │
//! │  R$ 20    2000      skips 50+        R$ 0,10   10                       │
//! │  R$ 10    1000                       R$ 0,05    5                       │
//! │  R$ 5      500                       R$ 0,01    1  (inactive default)   │
//! │  R$ 2      200                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog itself is static. Configuration only toggles `active`, and
//! the till-closing view is a named [`CatalogFilter`], not a second list.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Static catalog table: (centavos, kind, label, active by default).
const BRAZILIAN_TABLE: &[(i64, DenominationKind, &str, bool)] = &[
    (20000, DenominationKind::Note, "R$ 200", true),
    (10000, DenominationKind::Note, "R$ 100", true),
    (5000, DenominationKind::Note, "R$ 50", true),
    (2000, DenominationKind::Note, "R$ 20", true),
    (1000, DenominationKind::Note, "R$ 10", true),
    (500, DenominationKind::Note, "R$ 5", true),
    (200, DenominationKind::Note, "R$ 2", true),
    (100, DenominationKind::Coin, "R$ 1", true),
    (50, DenominationKind::Coin, "R$ 0,50", true),
    (25, DenominationKind::Coin, "R$ 0,25", true),
    (10, DenominationKind::Coin, "R$ 0,10", true),
    (5, DenominationKind::Coin, "R$ 0,05", true),
    (1, DenominationKind::Coin, "R$ 0,01", false),
];

/// Largest note still counted during till closing (R$ 20).
pub const TILL_CLOSING_MAX_NOTE_CENTS: i64 = 2000;

// =============================================================================
// Denomination
// =============================================================================

/// Whether a denomination is paper or metal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DenominationKind {
    Note,
    Coin,
}

/// A note or coin definition.
///
/// `value` is always positive; the catalog is the only producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Denomination {
    /// Face value in centavos.
    pub value: Money,
    pub kind: DenominationKind,
    /// Display label, e.g. "R$ 0,50".
    pub label: String,
    /// Whether the cashier can hand this one out under the current settings.
    pub active: bool,
}

impl Denomination {
    pub fn is_note(&self) -> bool {
        self.kind == DenominationKind::Note
    }

    pub fn is_coin(&self) -> bool {
        self.kind == DenominationKind::Coin
    }
}

// =============================================================================
// Denomination Count
// =============================================================================

/// A denomination paired with how many pieces of it.
///
/// Produced by the change breakdown and by manual till counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DenominationCount {
    pub denomination: Denomination,
    pub count: u32,
}

impl DenominationCount {
    pub fn new(denomination: Denomination, count: u32) -> Self {
        DenominationCount {
            denomination,
            count,
        }
    }

    /// Face value times count.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.denomination.value.times(self.count)
    }
}

/// Anything that carries a denomination.
///
/// Lets one partition routine serve bare denominations, change breakdowns
/// and till counts alike.
pub trait HasDenomination {
    fn denomination(&self) -> &Denomination;

    fn kind(&self) -> DenominationKind {
        self.denomination().kind
    }
}

impl HasDenomination for Denomination {
    fn denomination(&self) -> &Denomination {
        self
    }
}

impl HasDenomination for DenominationCount {
    fn denomination(&self) -> &Denomination {
        &self.denomination
    }
}

/// Items split by kind, original order preserved inside each half.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindPartition<T> {
    pub notes: Vec<T>,
    pub coins: Vec<T>,
}

/// Splits items into notes and coins.
///
/// ```rust
/// use trokito_core::denomination::{partition_by_kind, DenominationCatalog};
///
/// let catalog = DenominationCatalog::brazilian();
/// let split = partition_by_kind(catalog.all());
/// assert_eq!(split.notes.len(), 7);
/// assert_eq!(split.coins.len(), 6);
/// ```
pub fn partition_by_kind<T: HasDenomination + Clone>(items: &[T]) -> KindPartition<T> {
    let (notes, coins) = items
        .iter()
        .cloned()
        .partition(|item| item.kind() == DenominationKind::Note);
    KindPartition { notes, coins }
}

/// Total number of pieces across counts.
pub fn piece_count(counts: &[DenominationCount]) -> u64 {
    counts.iter().map(|c| u64::from(c.count)).sum()
}

/// Sum of `value × count` across counts.
pub fn counted_total(counts: &[DenominationCount]) -> Money {
    counts.iter().map(DenominationCount::subtotal).sum()
}

// =============================================================================
// Catalog
// =============================================================================

/// Named views over the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CatalogFilter {
    /// Every denomination.
    #[default]
    Full,
    /// Cashiers do not count notes above R$ 20 when closing the till.
    TillClosing,
}

impl CatalogFilter {
    pub fn includes(&self, denomination: &Denomination) -> bool {
        match self {
            CatalogFilter::Full => true,
            CatalogFilter::TillClosing => {
                denomination.is_coin()
                    || denomination.value.cents() <= TILL_CLOSING_MAX_NOTE_CENTS
            }
        }
    }
}

/// Ordered set of denominations, largest value first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominationCatalog {
    denominations: Vec<Denomination>,
}

impl DenominationCatalog {
    /// The Brazilian Real catalog, R$ 200 down to R$ 0,01.
    pub fn brazilian() -> Self {
        let denominations = BRAZILIAN_TABLE
            .iter()
            .map(|&(cents, kind, label, active)| Denomination {
                value: Money::from_cents(cents),
                kind,
                label: label.to_string(),
                active,
            })
            .collect();
        DenominationCatalog { denominations }
    }

    /// Builds a catalog from arbitrary entries; non-positive values are dropped.
    pub fn from_denominations(mut denominations: Vec<Denomination>) -> Self {
        denominations.retain(|d| d.value.is_positive());
        denominations.sort_by(|a, b| b.value.cmp(&a.value));
        DenominationCatalog { denominations }
    }

    /// All entries, active or not, largest first.
    pub fn all(&self) -> &[Denomination] {
        &self.denominations
    }

    /// Looks up an entry by face value.
    pub fn get(&self, value: Money) -> Option<&Denomination> {
        self.denominations.iter().find(|d| d.value == value)
    }

    /// Display label for a face value, if it is in the catalog.
    pub fn label_for(&self, value: Money) -> Option<&str> {
        self.get(value).map(|d| d.label.as_str())
    }

    /// Copy with exactly the listed values (in centavos) marked active.
    pub fn with_active(&self, values: &[i64]) -> Self {
        let denominations = self
            .denominations
            .iter()
            .map(|d| Denomination {
                active: values.contains(&d.value.cents()),
                ..d.clone()
            })
            .collect();
        DenominationCatalog { denominations }
    }

    /// Copy restricted to a named view.
    pub fn filtered(&self, filter: CatalogFilter) -> Self {
        let denominations = self
            .denominations
            .iter()
            .filter(|d| filter.includes(d))
            .cloned()
            .collect();
        DenominationCatalog { denominations }
    }

    /// Active entries sorted descending by value.
    pub fn active(&self) -> Vec<Denomination> {
        let mut active: Vec<Denomination> =
            self.denominations.iter().filter(|d| d.active).cloned().collect();
        active.sort_by(|a, b| b.value.cmp(&a.value));
        active
    }

    /// Face values of the entries active by default, in centavos.
    pub fn default_active_values(&self) -> Vec<i64> {
        self.denominations
            .iter()
            .filter(|d| d.active)
            .map(|d| d.value.cents())
            .collect()
    }
}

impl Default for DenominationCatalog {
    fn default() -> Self {
        DenominationCatalog::brazilian()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_sorted_and_positive() {
        let catalog = DenominationCatalog::brazilian();
        let values: Vec<i64> = catalog.all().iter().map(|d| d.value.cents()).collect();
        assert_eq!(
            values,
            vec![20000, 10000, 5000, 2000, 1000, 500, 200, 100, 50, 25, 10, 5, 1]
        );
        assert!(catalog.all().iter().all(|d| d.value.is_positive()));
    }

    #[test]
    fn test_one_centavo_inactive_by_default() {
        let catalog = DenominationCatalog::brazilian();
        let one = catalog.get(Money::from_cents(1)).unwrap();
        assert!(!one.active);
        assert!(!catalog.default_active_values().contains(&1));
        assert_eq!(catalog.active().len(), 12);
    }

    #[test]
    fn test_kinds() {
        let catalog = DenominationCatalog::brazilian();
        assert!(catalog.get(Money::from_cents(200)).unwrap().is_note());
        assert!(catalog.get(Money::from_cents(100)).unwrap().is_coin());
        assert_eq!(catalog.label_for(Money::from_cents(50)), Some("R$ 0,50"));
        assert_eq!(catalog.label_for(Money::from_cents(3)), None);
    }

    #[test]
    fn test_with_active_toggles_only() {
        let catalog = DenominationCatalog::brazilian().with_active(&[5000, 10, 1]);
        let active: Vec<i64> = catalog.active().iter().map(|d| d.value.cents()).collect();
        assert_eq!(active, vec![5000, 10, 1]);
        assert_eq!(catalog.all().len(), 13);
    }

    #[test]
    fn test_till_closing_filter_drops_large_notes() {
        let till = DenominationCatalog::brazilian().filtered(CatalogFilter::TillClosing);
        let values: Vec<i64> = till.all().iter().map(|d| d.value.cents()).collect();
        assert_eq!(values, vec![2000, 1000, 500, 200, 100, 50, 25, 10, 5, 1]);
    }

    #[test]
    fn test_from_denominations_sorts_and_drops_invalid() {
        let catalog = DenominationCatalog::brazilian();
        let mut entries: Vec<Denomination> = catalog.all().iter().rev().cloned().collect();
        entries.push(Denomination {
            value: Money::zero(),
            kind: DenominationKind::Coin,
            label: "R$ 0,00".into(),
            active: true,
        });
        let rebuilt = DenominationCatalog::from_denominations(entries);
        assert_eq!(rebuilt, catalog);
    }

    #[test]
    fn test_partition_by_kind_on_counts() {
        let catalog = DenominationCatalog::brazilian();
        let counts = vec![
            DenominationCount::new(catalog.get(Money::from_cents(2000)).unwrap().clone(), 1),
            DenominationCount::new(catalog.get(Money::from_cents(50)).unwrap().clone(), 3),
            DenominationCount::new(catalog.get(Money::from_cents(500)).unwrap().clone(), 2),
        ];
        let split = partition_by_kind(&counts);
        assert_eq!(split.notes.len(), 2);
        assert_eq!(split.coins.len(), 1);
        assert_eq!(split.notes[1].denomination.value.cents(), 500);
        assert_eq!(piece_count(&counts), 6);
        assert_eq!(counted_total(&counts).cents(), 2000 + 150 + 1000);
    }
}
