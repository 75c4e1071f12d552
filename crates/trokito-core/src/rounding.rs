//! # Rounding Policies
//!
//! Decides what to do with change that is not a multiple of the smallest
//! coin in circulation (R$ 0,05).
//!
//! ## Policies
//! ```text
//! exact = 996 (R$ 9,96)
//!
//! ┌───────────────────────┬──────────┬───────┬──────────────────────────────┐
//! │ Policy                │ rounded  │ delta │ Meaning                      │
//! ├───────────────────────┼──────────┼───────┼──────────────────────────────┤
//! │ nearest-0.05          │   995    │  -1   │ round(996 / 5) * 5           │
//! │ nearest-0.10          │  1000    │  +4   │ round(996 / 10) * 10         │
//! │ allow-owing (N = 4)   │   995    │  -1   │ shortfall 1 <= 4, round down │
//! └───────────────────────┴──────────┴───────┴──────────────────────────────┘
//! ```
//!
//! Ties round up, matching the till's half-up convention (R$ 0,025 → 0,05).
//! Every function here is total: no input makes it fail or panic.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::{DEFAULT_TOLERANCE_CENTS, SMALLEST_CIRCULATING_COIN_CENTS};

/// How to treat change that is not a multiple of R$ 0,05.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum RoundingPolicy {
    /// Round to the nearest R$ 0,05.
    #[serde(rename = "nearest-0.05")]
    NearestFiveCents,

    /// Round to the nearest R$ 0,10.
    #[serde(rename = "nearest-0.10")]
    NearestTenCents,

    /// Round down when the customer would owe at most `tolerance_cents`,
    /// otherwise fall back to nearest R$ 0,05.
    #[serde(rename = "allow-owing")]
    AllowOwing { tolerance_cents: i64 },
}

impl RoundingPolicy {
    /// Allow-owing with the default R$ 0,04 tolerance.
    pub const fn allow_owing_default() -> Self {
        RoundingPolicy::AllowOwing {
            tolerance_cents: DEFAULT_TOLERANCE_CENTS,
        }
    }

    /// The tolerance, for policies that have one.
    pub const fn tolerance_cents(&self) -> Option<i64> {
        match self {
            RoundingPolicy::AllowOwing { tolerance_cents } => Some(*tolerance_cents),
            _ => None,
        }
    }

    /// Stable name used in settings files and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            RoundingPolicy::NearestFiveCents => "nearest-0.05",
            RoundingPolicy::NearestTenCents => "nearest-0.10",
            RoundingPolicy::AllowOwing { .. } => "allow-owing",
        }
    }
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        RoundingPolicy::allow_owing_default()
    }
}

/// Result of applying a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundingOutcome {
    pub rounded: Money,
    /// `rounded - exact`. Negative means the customer owes the difference.
    pub delta: Money,
}

// =============================================================================
// Primitives
// =============================================================================

/// Rounds to the nearest multiple of `step`, ties up.
///
/// A non-positive `step` leaves the amount unchanged.
///
/// ```rust
/// use trokito_core::money::Money;
/// use trokito_core::rounding::round_to_nearest;
///
/// assert_eq!(round_to_nearest(Money::from_cents(2652), 5).cents(), 2650);
/// assert_eq!(round_to_nearest(Money::from_cents(2653), 5).cents(), 2655);
/// assert_eq!(round_to_nearest(Money::from_cents(995), 10).cents(), 1000);
/// ```
pub fn round_to_nearest(amount: Money, step: i64) -> Money {
    if step <= 0 {
        return amount;
    }
    let cents = amount.cents();
    let doubled = 2 * step;
    Money::from_cents((2 * cents + step).div_euclid(doubled) * step)
}

/// Largest multiple of `step` not above the amount.
pub fn round_down_to_multiple(amount: Money, step: i64) -> Money {
    if step <= 0 {
        return amount;
    }
    let cents = amount.cents();
    Money::from_cents(cents - cents.rem_euclid(step))
}

/// Whether the amount is a whole number of `step`s.
pub fn is_multiple_of(amount: Money, step: i64) -> bool {
    step > 0 && amount.cents().rem_euclid(step) == 0
}

// =============================================================================
// Policy Application
// =============================================================================

/// Applies a rounding policy to an exact change amount.
///
/// Zero always comes back unchanged with a zero delta.
///
/// ```rust
/// use trokito_core::money::Money;
/// use trokito_core::rounding::{apply_rounding, RoundingPolicy};
///
/// let out = apply_rounding(Money::from_cents(996), &RoundingPolicy::default());
/// assert_eq!(out.rounded.cents(), 995);
/// assert_eq!(out.delta.cents(), -1);
/// ```
pub fn apply_rounding(exact: Money, policy: &RoundingPolicy) -> RoundingOutcome {
    if exact.is_zero() {
        return RoundingOutcome {
            rounded: exact,
            delta: Money::zero(),
        };
    }

    let rounded = match *policy {
        RoundingPolicy::NearestFiveCents => {
            round_to_nearest(exact, SMALLEST_CIRCULATING_COIN_CENTS)
        }
        RoundingPolicy::NearestTenCents => round_to_nearest(exact, 10),
        RoundingPolicy::AllowOwing { tolerance_cents } => {
            allow_owing(exact, tolerance_cents)
        }
    };

    RoundingOutcome {
        rounded,
        delta: rounded - exact,
    }
}

fn allow_owing(exact: Money, tolerance_cents: i64) -> Money {
    let step = SMALLEST_CIRCULATING_COIN_CENTS;
    if is_multiple_of(exact, step) {
        return exact;
    }
    let lower = round_down_to_multiple(exact, step);
    let shortfall = (exact - lower).cents();
    if shortfall <= tolerance_cents {
        lower
    } else {
        round_to_nearest(exact, step)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn round(cents: i64, policy: RoundingPolicy) -> (i64, i64) {
        let out = apply_rounding(Money::from_cents(cents), &policy);
        (out.rounded.cents(), out.delta.cents())
    }

    #[test]
    fn test_zero_is_always_exact() {
        for policy in [
            RoundingPolicy::NearestFiveCents,
            RoundingPolicy::NearestTenCents,
            RoundingPolicy::allow_owing_default(),
        ] {
            assert_eq!(round(0, policy), (0, 0));
        }
    }

    #[test]
    fn test_nearest_five() {
        let p = RoundingPolicy::NearestFiveCents;
        assert_eq!(round(996, p), (995, -1));
        assert_eq!(round(997, p), (995, -2));
        assert_eq!(round(998, p), (1000, 2));
        assert_eq!(round(1000, p), (1000, 0));
        assert_eq!(round(2, p), (0, -2));
        assert_eq!(round(3, p), (5, 2));
    }

    #[test]
    fn test_nearest_ten_ties_up() {
        let p = RoundingPolicy::NearestTenCents;
        assert_eq!(round(995, p), (1000, 5));
        assert_eq!(round(994, p), (990, -4));
        assert_eq!(round(2650, p), (2650, 0));
        assert_eq!(round(2655, p), (2660, 5));
    }

    #[test]
    fn test_allow_owing_rounds_down_within_tolerance() {
        let p = RoundingPolicy::allow_owing_default();
        assert_eq!(round(996, p), (995, -1));
        assert_eq!(round(26544, p), (26540, -4));
        assert_eq!(round(9, p), (5, -4));
        assert_eq!(round(2650, p), (2650, 0));
    }

    #[test]
    fn test_allow_owing_falls_back_to_nearest() {
        let p = RoundingPolicy::AllowOwing { tolerance_cents: 2 };
        assert_eq!(round(996, p), (995, -1));
        assert_eq!(round(997, p), (995, -2));
        // shortfall 3 > 2: nearest multiple of 5 is above
        assert_eq!(round(998, p), (1000, 2));
        assert_eq!(round(999, p), (1000, 1));

        let strict = RoundingPolicy::AllowOwing { tolerance_cents: 0 };
        assert_eq!(round(996, strict), (995, -1));
        assert_eq!(round(998, strict), (1000, 2));
    }

    #[test]
    fn test_policy_serde_shape() {
        let json = serde_json::to_string(&RoundingPolicy::allow_owing_default()).unwrap();
        assert_eq!(json, r#"{"type":"allow-owing","tolerance_cents":4}"#);

        let parsed: RoundingPolicy = serde_json::from_str(r#"{"type":"nearest-0.10"}"#).unwrap();
        assert_eq!(parsed, RoundingPolicy::NearestTenCents);
        assert_eq!(parsed.name(), "nearest-0.10");
        assert_eq!(parsed.tolerance_cents(), None);
    }

    proptest! {
        #[test]
        fn prop_allow_owing_delta_is_bounded(a in 0i64..10_000_000, n in 0i64..50) {
            let out = apply_rounding(
                Money::from_cents(a),
                &RoundingPolicy::AllowOwing { tolerance_cents: n },
            );
            prop_assert!(out.delta.cents().abs() <= n.max(5));
            prop_assert!(is_multiple_of(out.rounded, 5));
            prop_assert_eq!(out.rounded - Money::from_cents(a), out.delta);
        }

        #[test]
        fn prop_nearest_policies_land_on_step(a in 0i64..10_000_000) {
            let five = apply_rounding(Money::from_cents(a), &RoundingPolicy::NearestFiveCents);
            prop_assert!(is_multiple_of(five.rounded, 5));
            prop_assert!(five.delta.cents().abs() <= 2);

            let ten = apply_rounding(Money::from_cents(a), &RoundingPolicy::NearestTenCents);
            prop_assert!(is_multiple_of(ten.rounded, 10));
            prop_assert!(ten.delta.cents() >= -4 && ten.delta.cents() <= 5);
        }
    }
}
