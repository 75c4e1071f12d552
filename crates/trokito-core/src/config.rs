//! # Calculation Settings
//!
//! What the settings collaborator hands the engine for each calculation.
//! Loading and persisting settings is the front end's job.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::denomination::{Denomination, DenominationCatalog};
use crate::error::{CoreError, CoreResult};
use crate::rounding::RoundingPolicy;

/// Settings for one change calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CalculationConfig {
    pub rounding_policy: RoundingPolicy,

    /// Face values, in centavos, the cashier can hand out.
    pub active_denominations: Vec<i64>,

    /// Reserved for a fewer-coins optimizer. Greedy already minimizes
    /// pieces for BRL, so the flag is carried but has no effect.
    pub prioritize_less_coins: bool,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        CalculationConfig {
            rounding_policy: RoundingPolicy::default(),
            active_denominations: DenominationCatalog::brazilian().default_active_values(),
            prioritize_less_coins: true,
        }
    }
}

impl CalculationConfig {
    /// Checks the settings against a catalog.
    ///
    /// ## Errors
    /// `InvalidConfiguration` when the tolerance is negative, a listed value
    /// is not positive, or no catalog entry ends up active.
    pub fn validate(&self, catalog: &DenominationCatalog) -> CoreResult<()> {
        if let Some(tolerance) = self.rounding_policy.tolerance_cents() {
            if tolerance < 0 {
                return Err(CoreError::InvalidConfiguration(format!(
                    "rounding tolerance must not be negative (got {tolerance})"
                )));
            }
        }

        if let Some(bad) = self.active_denominations.iter().find(|v| **v <= 0) {
            return Err(CoreError::InvalidConfiguration(format!(
                "denomination values must be positive (got {bad})"
            )));
        }

        if self.active_in(catalog).is_empty() {
            return Err(CoreError::InvalidConfiguration(
                "no active denominations".to_string(),
            ));
        }

        Ok(())
    }

    /// Catalog entries enabled by these settings, largest first.
    pub fn active_in(&self, catalog: &DenominationCatalog) -> Vec<Denomination> {
        catalog.with_active(&self.active_denominations).active()
    }
}
