//! # History Records
//!
//! Stamped snapshots of closings and change calculations, ready for a
//! storage collaborator to persist and for [`crate::export`] to render.
//!
//! Ids and timestamps come from a [`RecordStamper`], so building a record
//! stays deterministic under test.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::change::ChangeResult;
use crate::closing::{summarize, ClosingSummary};
use crate::denomination::DenominationCount;
use crate::money::Money;
use crate::validation::sanitize_observations;

// =============================================================================
// Stamping
// =============================================================================

/// Source of record ids and creation times.
pub trait RecordStamper {
    fn next_id(&self) -> String;
    fn now(&self) -> DateTime<Utc>;
}

/// UUID v4 ids and the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStamper;

impl RecordStamper for SystemStamper {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// Records
// =============================================================================

/// A saved till closing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClosingRecord {
    pub id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub operator: Option<String>,
    pub observations: Option<String>,
    pub summary: ClosingSummary,
}

/// A saved change calculation.
///
/// `purchase` and `paid` are absent when the change came from a PDV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChangeRecord {
    pub id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub purchase: Option<Money>,
    pub paid: Option<Money>,
    pub change_given: Money,
    pub exact_change: Money,
    pub rounding_applied: Money,
    pub breakdown: Vec<DenominationCount>,
}

/// Builds a closing record from a raw count.
///
/// Blank operator or observations are stored as `None`; observations are
/// sanitized.
pub fn create_closing_record(
    counts: &[DenominationCount],
    operator: Option<&str>,
    observations: Option<&str>,
    stamper: &impl RecordStamper,
) -> ClosingRecord {
    let operator = operator
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let observations = observations
        .map(sanitize_observations)
        .filter(|s| !s.is_empty());

    ClosingRecord {
        id: stamper.next_id(),
        created_at: stamper.now(),
        operator,
        observations,
        summary: summarize(counts),
    }
}

/// Builds a change record from a calculation result.
pub fn create_change_record(
    purchase: Option<Money>,
    paid: Option<Money>,
    result: &ChangeResult,
    stamper: &impl RecordStamper,
) -> ChangeRecord {
    ChangeRecord {
        id: stamper.next_id(),
        created_at: stamper.now(),
        purchase,
        paid,
        change_given: result.rounded_amount,
        exact_change: result.exact_amount,
        rounding_applied: result.rounding_delta,
        breakdown: result.breakdown.clone(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::change::calculate_change;
    use crate::config::CalculationConfig;
    use crate::denomination::DenominationCatalog;
    use chrono::TimeZone;

    /// Deterministic stamper for tests.
    pub(crate) struct FixedStamper;

    impl RecordStamper for FixedStamper {
        fn next_id(&self) -> String {
            "rec-1".to_string()
        }

        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 5).unwrap()
        }
    }

    fn count(cents: i64, n: u32) -> DenominationCount {
        let catalog = DenominationCatalog::brazilian();
        DenominationCount::new(catalog.get(Money::from_cents(cents)).unwrap().clone(), n)
    }

    #[test]
    fn test_closing_record() {
        let record = create_closing_record(
            &[count(2000, 2), count(100, 3)],
            Some("  Maria  "),
            Some("<b>sobra</b> de R$ 1"),
            &FixedStamper,
        );
        assert_eq!(record.id, "rec-1");
        assert_eq!(record.operator.as_deref(), Some("Maria"));
        assert_eq!(record.observations.as_deref(), Some("bsobra/b de R$ 1"));
        assert_eq!(record.summary.total_amount.cents(), 4300);
    }

    #[test]
    fn test_blank_fields_become_none() {
        let record = create_closing_record(&[count(5, 1)], Some("   "), Some(""), &FixedStamper);
        assert_eq!(record.operator, None);
        assert_eq!(record.observations, None);
    }

    #[test]
    fn test_change_record() {
        let purchase = Money::from_cents(1004);
        let paid = Money::from_cents(2000);
        let result = calculate_change(purchase, paid, &CalculationConfig::default()).unwrap();
        let record = create_change_record(Some(purchase), Some(paid), &result, &FixedStamper);
        assert_eq!(record.change_given.cents(), 995);
        assert_eq!(record.exact_change.cents(), 996);
        assert_eq!(record.rounding_applied.cents(), -1);
        assert_eq!(record.breakdown, result.breakdown);
    }

    #[test]
    fn test_system_stamper_ids_are_unique() {
        let stamper = SystemStamper;
        assert_ne!(stamper.next_id(), stamper.next_id());
    }
}
