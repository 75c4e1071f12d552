//! # Change Calculation
//!
//! The orchestrator: validates input, applies the rounding policy, breaks
//! the rounded amount down into notes and coins, and explains what happened.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  purchase, paid ──► validate ──► exact = paid - purchase               │
//! │  PDV change     ──► validate ──► exact = change                        │
//! │                                     │                                   │
//! │                       exact == 0 ───┼──► "no change due" (terminal)     │
//! │                                     ▼                                   │
//! │                              apply_rounding()                           │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                                breakdown()                              │
//! │                                     │                                   │
//! │             uncovered remainder ────┼──► folded into rounding_delta     │
//! │                                     ▼                                   │
//! │                               ChangeResult                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is computed until every check has passed, so a failed call never
//! yields a partial result. Afterwards `rounded_amount` always equals the
//! breakdown sum.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::breakdown::{breakdown, covered_total};
use crate::config::CalculationConfig;
use crate::denomination::{
    partition_by_kind, piece_count, Denomination, DenominationCatalog, DenominationCount,
};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::rounding::{apply_rounding, RoundingPolicy};
use crate::validation::validate_amount_cents;

const NO_CHANGE_MESSAGE: &str = "Não há troco a ser dado";

// =============================================================================
// Change Result
// =============================================================================

/// Outcome of one change calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChangeResult {
    /// `paid - purchase`, before any rounding.
    pub exact_amount: Money,
    /// What the cashier actually hands over.
    pub rounded_amount: Money,
    /// `rounded_amount - exact_amount`. Negative: the customer owes it.
    pub rounding_delta: Money,
    /// Largest denomination first.
    pub breakdown: Vec<DenominationCount>,
    pub is_exactly_representable: bool,
    /// pt-BR note on rounding or negotiation, for display.
    pub explanation: Option<String>,
}

impl ChangeResult {
    fn no_change() -> Self {
        ChangeResult {
            exact_amount: Money::zero(),
            rounded_amount: Money::zero(),
            rounding_delta: Money::zero(),
            breakdown: Vec::new(),
            is_exactly_representable: true,
            explanation: Some(NO_CHANGE_MESSAGE.to_string()),
        }
    }

    /// Total pieces handed over.
    pub fn piece_count(&self) -> u64 {
        piece_count(&self.breakdown)
    }

    /// Note entries of the breakdown.
    pub fn notes(&self) -> Vec<DenominationCount> {
        partition_by_kind(&self.breakdown).notes
    }

    /// Coin entries of the breakdown.
    pub fn coins(&self) -> Vec<DenominationCount> {
        partition_by_kind(&self.breakdown).coins
    }

    /// How much the customer is left owing (zero when rounded up or exact).
    pub fn owed_by_customer(&self) -> Money {
        if self.rounding_delta.is_negative() {
            self.rounding_delta.abs()
        } else {
            Money::zero()
        }
    }

    /// Whether there is nothing to hand back.
    pub fn is_no_change(&self) -> bool {
        self.exact_amount.is_zero()
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Change calculator bound to validated settings.
///
/// Build once per settings change, then call as often as the form needs.
/// Holds no mutable state.
#[derive(Debug, Clone)]
pub struct ChangeCalculator {
    config: CalculationConfig,
    active: Vec<Denomination>,
}

impl ChangeCalculator {
    /// Binds settings to the Brazilian catalog.
    pub fn new(config: CalculationConfig) -> CoreResult<Self> {
        Self::with_catalog(config, &DenominationCatalog::brazilian())
    }

    /// Binds settings to a specific catalog.
    ///
    /// ## Errors
    /// `InvalidConfiguration` if the settings are unusable with this catalog.
    pub fn with_catalog(
        config: CalculationConfig,
        catalog: &DenominationCatalog,
    ) -> CoreResult<Self> {
        config.validate(catalog)?;
        let active = config.active_in(catalog);
        debug!(
            policy = config.rounding_policy.name(),
            active = active.len(),
            prioritize_less_coins = config.prioritize_less_coins,
            "change calculator ready"
        );
        Ok(ChangeCalculator { config, active })
    }

    pub fn config(&self) -> &CalculationConfig {
        &self.config
    }

    /// Active denominations, largest first.
    pub fn active_denominations(&self) -> &[Denomination] {
        &self.active
    }

    /// Change for a purchase paid in cash.
    ///
    /// ## Errors
    /// - `InvalidAmount` if either amount is negative or above the maximum
    /// - `InsufficientPayment` if `paid < purchase`
    pub fn calculate(&self, purchase: Money, paid: Money) -> CoreResult<ChangeResult> {
        ensure_amount(purchase, "purchase")?;
        ensure_amount(paid, "paid")?;
        if paid < purchase {
            return Err(CoreError::InsufficientPayment { purchase, paid });
        }
        Ok(self.resolve(paid - purchase))
    }

    /// Breakdown for change already computed by the point-of-sale system.
    ///
    /// ## Errors
    /// `InvalidAmount` if the amount is negative or above the maximum.
    pub fn calculate_from_pdv(&self, change: Money) -> CoreResult<ChangeResult> {
        ensure_amount(change, "change")?;
        Ok(self.resolve(change))
    }

    fn resolve(&self, exact: Money) -> ChangeResult {
        if exact.is_zero() {
            debug!("no change due");
            return ChangeResult::no_change();
        }

        let outcome = apply_rounding(exact, &self.config.rounding_policy);
        let counts = breakdown(outcome.rounded, &self.active);
        let covered = covered_total(&counts);
        let uncovered = outcome.rounded - covered;
        let rounding_delta = covered - exact;

        debug!(
            exact = exact.cents(),
            rounded = covered.cents(),
            delta = rounding_delta.cents(),
            uncovered = uncovered.cents(),
            pieces = piece_count(&counts),
            "change calculated"
        );

        ChangeResult {
            exact_amount: exact,
            rounded_amount: covered,
            rounding_delta,
            breakdown: counts,
            is_exactly_representable: rounding_delta.is_zero(),
            explanation: explain(rounding_delta, uncovered, &self.config.rounding_policy),
        }
    }
}

/// Change for a purchase paid in cash, using the Brazilian catalog.
///
/// ```rust
/// use trokito_core::{calculate_change, CalculationConfig, Money};
///
/// let result = calculate_change(
///     Money::from_cents(1004),
///     Money::from_cents(2000),
///     &CalculationConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(result.exact_amount.cents(), 996);
/// assert_eq!(result.rounded_amount.cents(), 995);
/// assert_eq!(result.rounding_delta.cents(), -1);
/// ```
pub fn calculate_change(
    purchase: Money,
    paid: Money,
    config: &CalculationConfig,
) -> CoreResult<ChangeResult> {
    ChangeCalculator::new(config.clone())?.calculate(purchase, paid)
}

/// Breakdown for a change amount computed elsewhere, using the Brazilian catalog.
pub fn calculate_change_from_pdv(
    change: Money,
    config: &CalculationConfig,
) -> CoreResult<ChangeResult> {
    ChangeCalculator::new(config.clone())?.calculate_from_pdv(change)
}

// =============================================================================
// Helpers
// =============================================================================

fn ensure_amount(amount: Money, field: &str) -> CoreResult<()> {
    validate_amount_cents(amount.cents()).map_err(|_| {
        let reason = if amount.is_negative() {
            format!("{field} amount must not be negative")
        } else {
            format!("{field} amount exceeds the maximum")
        };
        CoreError::invalid_amount(amount.to_string(), reason)
    })
}

fn centavos(n: i64) -> String {
    if n == 1 {
        "1 centavo".to_string()
    } else {
        format!("{n} centavos")
    }
}

/// Describes the final delta. The tolerance note only appears when the
/// policy's tolerance covers what the customer owes.
fn explain(delta: Money, uncovered: Money, policy: &RoundingPolicy) -> Option<String> {
    let mut parts = Vec::new();

    if delta.is_positive() {
        parts.push(format!(
            "Troco arredondado para cima em {}",
            centavos(delta.cents())
        ));
    } else if delta.is_negative() {
        let owed = delta.abs().cents();
        let within_tolerance = policy.tolerance_cents().is_some_and(|t| owed <= t);
        if within_tolerance {
            parts.push(format!("Cliente deve {} (dentro da tolerância)", centavos(owed)));
        } else {
            parts.push(format!("Cliente deve {}", centavos(owed)));
        }
    }

    if uncovered.is_positive() {
        parts.push(format!(
            "{uncovered} não pode ser entregue com as denominações ativas"
        ));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
