//! # trokito-core: Cash-Register Change & Till-Closing Engine
//!
//! This crate is the **heart** of Trokito. It answers two questions a
//! Brazilian cashier asks all day, as pure functions with zero I/O:
//!
//! 1. How much change do I give, and in which notes and coins?
//! 2. How much money is in my drawer at the end of the shift?
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Trokito Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front end (CLI / web UI)                        │   │
//! │  │    typed amounts ──► settings ──► result screens ──► CSV        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ trokito-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │ rounding  │  │ breakdown │  │  closing  │  │   │
//! │  │   │   Money   │  │  policy   │  │  greedy   │  │  summary  │  │   │
//! │  │   │  parsing  │  │  delta    │  │  counts   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │          ▲              ▲              ▲              ▲         │   │
//! │  │          └──────────────┴──── change ──┘              │         │   │
//! │  │                    (orchestrator)         record ─► export     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK (injected) • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type in integer centavos, pt-BR parsing and formatting
//! - [`denomination`] - BRL note/coin catalog and counted pairs
//! - [`rounding`] - Rounding policies for the exact change amount
//! - [`breakdown`] - Greedy note/coin decomposition
//! - [`change`] - The change orchestrator
//! - [`closing`] - Till-closing aggregation and sanity checks
//! - [`advisory`] - Hints for asking the customer for coins
//! - [`record`] - Timestamped history records
//! - [`export`] - CSV export of history
//! - [`config`] - Calculation settings
//! - [`validation`] - Operator input rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output. Clock and id generation are injected.
//! 2. **Integer Money**: every amount is centavos (i64); floats only at the edges
//! 3. **Total Algorithms**: rounding, breakdown and summary never fail on well-formed input
//! 4. **Explicit Errors**: only the orchestrator boundary raises, with typed errors
//!
//! ## Example Usage
//!
//! ```rust
//! use trokito_core::{calculate_change, CalculationConfig, Money};
//!
//! let purchase = Money::parse("23,50").unwrap();
//! let paid = Money::parse("R$ 50,00").unwrap();
//!
//! let result = calculate_change(purchase, paid, &CalculationConfig::default()).unwrap();
//!
//! assert_eq!(result.rounded_amount.cents(), 2650);
//! assert_eq!(result.piece_count(), 4); // R$ 20 + R$ 5 + R$ 1 + R$ 0,50
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod advisory;
pub mod breakdown;
pub mod change;
pub mod closing;
pub mod config;
pub mod denomination;
pub mod error;
pub mod export;
pub mod money;
pub mod record;
pub mod rounding;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use trokito_core::Money` instead of
// `use trokito_core::money::Money`

pub use advisory::{suggest_customer_coins, CoinSuggestion};
pub use breakdown::{breakdown, covered_total};
pub use change::{calculate_change, calculate_change_from_pdv, ChangeCalculator, ChangeResult};
pub use closing::{summarize, ClosingChecks, ClosingSummary, ClosingValidation, ClosingWarning};
pub use config::CalculationConfig;
pub use denomination::{
    CatalogFilter, Denomination, DenominationCatalog, DenominationCount, DenominationKind,
};
pub use error::{CoreError, CoreResult, ErrorCode, ValidationError};
pub use money::Money;
pub use record::{ChangeRecord, ClosingRecord, RecordStamper, SystemStamper};
pub use rounding::{apply_rounding, RoundingOutcome, RoundingPolicy};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// ISO 4217 code of the only supported currency.
pub const CURRENCY_CODE: &str = "BRL";

/// Largest amount accepted as input: R$ 999.999,99.
///
/// ## Business Reason
/// No single purchase at a counter comes close; anything larger is a typo
/// (an extra digit or a pasted barcode).
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999;

/// Largest piece count accepted for one denomination in a manual count.
pub const MAX_DENOMINATION_COUNT: u32 = 9999;

/// Default tolerance for the allow-owing policy (R$ 0,04).
///
/// ## Business Reason
/// 1-centavo coins are out of circulation. Below the R$ 0,05 coin the
/// customer simply owes the difference.
pub const DEFAULT_TOLERANCE_CENTS: i64 = 4;

/// Smallest coin a cashier can actually hand out.
pub const SMALLEST_CIRCULATING_COIN_CENTS: i64 = 5;

/// Operator name length bounds (after sanitizing).
pub const OPERATOR_NAME_MIN_LEN: usize = 2;
pub const OPERATOR_NAME_MAX_LEN: usize = 50;

/// Free-text observations on a closing are cut to this many characters.
pub const MAX_OBSERVATIONS_LEN: usize = 1000;
