//! # Money Module
//!
//! Provides the `Money` type: a Brazilian Real amount held as integer centavos.
//!
//! ## Why Integer Centavos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    50.00 - 23.47 = 26.529999999999998  ❌ WRONG!                        │
//! │                                                                         │
//! │  Greedy change on that value:                                           │
//! │    26.53 / 0.05 = 530.5999...  → floor → one coin short                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    5000 - 2347 = 2653 centavos, exact every time                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reais only exist at the edges: [`Money::parse`] / [`Money::from_reais`]
//! on the way in, [`fmt::Display`] / [`Money::to_decimal_string`] on the way out.
//!
//! ## Usage
//! ```rust
//! use trokito_core::money::Money;
//!
//! // Typed by the operator, pt-BR convention
//! let paid: Money = "R$ 50,00".parse().unwrap();
//! let purchase = Money::parse("23,50").unwrap();
//!
//! let change = paid - purchase;
//! assert_eq!(change.cents(), 2650);
//! assert_eq!(change.to_string(), "R$ 26,50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::MAX_AMOUNT_CENTS;

/// Centavos per real.
pub const CENTS_PER_REAL: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in centavos (1/100 of a Brazilian Real).
///
/// ## Design Decisions
/// - **i64 (signed)**: rounding deltas are negative when the customer owes
/// - **Single field tuple struct**: serializes as a bare integer
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  "R$ 50,00" ──parse──► Money(5000) ──┐                                  │
/// │  "23,50"    ──parse──► Money(2350) ──┴─► exact change Money(2650)      │
/// │                                              │                          │
/// │                                              ▼                          │
/// │                          rounding ──► breakdown ──► ChangeResult        │
/// │                                                                         │
/// │  Denomination.value, ClosingSummary totals: all Money, all centavos    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use trokito_core::money::Money;
    ///
    /// let note = Money::from_cents(2000); // R$ 20,00
    /// assert_eq!(note.cents(), 2000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal real amount to centavos using `round(value * 100)`.
    ///
    /// ## Errors
    /// `InvalidAmount` for NaN, infinite, negative or out-of-range values.
    ///
    /// ```rust
    /// use trokito_core::money::Money;
    ///
    /// assert_eq!(Money::from_reais(12.35).unwrap().cents(), 1235);
    /// assert_eq!(Money::from_reais(0.1 + 0.2).unwrap().cents(), 30);
    /// assert!(Money::from_reais(f64::NAN).is_err());
    /// assert!(Money::from_reais(-1.0).is_err());
    /// ```
    pub fn from_reais(value: f64) -> CoreResult<Self> {
        if !value.is_finite() {
            return Err(CoreError::invalid_amount(
                value.to_string(),
                "value is not a finite number",
            ));
        }

        if value < 0.0 {
            return Err(CoreError::invalid_amount(
                value.to_string(),
                "negative amounts are not allowed",
            ));
        }

        let cents = (value * CENTS_PER_REAL as f64).round();
        if cents > MAX_AMOUNT_CENTS as f64 {
            return Err(CoreError::invalid_amount(
                value.to_string(),
                "amount exceeds R$ 999.999,99",
            ));
        }

        Ok(Money(cents as i64))
    }

    /// Parses an amount typed by the operator.
    ///
    /// ## Accepted Forms
    /// ```text
    /// "R$ 12,35"   → 1235     currency prefix, comma decimal
    /// "12,35"      → 1235
    /// "12.35"      → 1235     dot decimal when there is no comma
    /// "1.234,56"   → 123456   dots are thousands separators next to a comma
    /// ",5"         → 50
    /// "7"          → 700
    /// ```
    ///
    /// ## Errors
    /// `InvalidAmount` for empty text, a sign, letters, more than two
    /// fractional digits, or amounts above R$ 999.999,99.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::invalid_amount(input, reason);

        let mut text = input.trim();
        if let Some(rest) = text
            .strip_prefix("R$")
            .or_else(|| text.strip_prefix("r$"))
        {
            text = rest.trim_start();
        }

        if text.is_empty() {
            return Err(invalid("amount is empty"));
        }
        if text.starts_with('-') {
            return Err(invalid("negative amounts are not allowed"));
        }
        let text = text.strip_prefix('+').unwrap_or(text);

        let normalized = match text.matches(',').count() {
            0 => text.to_string(),
            1 => text.replace('.', "").replace(',', "."),
            _ => return Err(invalid("more than one decimal separator")),
        };

        let mut parts = normalized.split('.');
        let whole = parts.next().unwrap_or("");
        let fraction = parts.next().unwrap_or("");
        if parts.next().is_some() {
            return Err(invalid("more than one decimal separator"));
        }

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("amount has no digits"));
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("amount must contain only digits and separators"));
        }
        if fraction.len() > 2 {
            return Err(invalid("at most two decimal places are allowed"));
        }

        let reais: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| invalid("amount exceeds R$ 999.999,99"))?
        };
        let centavos: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().unwrap_or(0) * 10,
            _ => fraction.parse::<i64>().unwrap_or(0),
        };

        let cents = reais
            .checked_mul(CENTS_PER_REAL)
            .and_then(|c| c.checked_add(centavos))
            .filter(|c| *c <= MAX_AMOUNT_CENTS)
            .ok_or_else(|| invalid("amount exceeds R$ 999.999,99"))?;

        Ok(Money(cents))
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-real portion (truncated toward zero).
    ///
    /// ```rust
    /// use trokito_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).reais(), 10);
    /// assert_eq!(Money::from_cents(-550).reais(), -5);
    /// ```
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / CENTS_PER_REAL
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % CENTS_PER_REAL).abs()
    }

    /// Returns the amount in reais as a float. Display and interop only.
    #[inline]
    pub fn to_reais(&self) -> f64 {
        self.0 as f64 / CENTS_PER_REAL as f64
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a denomination value by a piece count.
    ///
    /// ```rust
    /// use trokito_core::money::Money;
    ///
    /// let fifty_cents = Money::from_cents(50);
    /// assert_eq!(fifty_cents.times(3).cents(), 150);
    /// ```
    #[inline]
    pub const fn times(&self, count: u32) -> Self {
        Money(self.0 * count as i64)
    }

    /// Renders the amount without currency symbol or grouping: `1234,56`.
    ///
    /// This is the export format; it mirrors the comma convention of input.
    ///
    /// ```rust
    /// use trokito_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(123456).to_decimal_string(), "1234,56");
    /// assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0,05");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{},{:02}",
            sign,
            self.reais().abs(),
            self.centavos_part()
        )
    }
}

/// Inserts `.` every three digits, pt-BR style.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `R$ 1.234,56` (negative: `-R$ 5,50`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {},{:02}",
            sign,
            group_thousands(self.reais().unsigned_abs()),
            self.centavos_part()
        )
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
