//! # Error Types
//!
//! Domain-specific error types for trokito-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  trokito-core errors (this file)                                       │
//! │  ├── CoreError        - Orchestrator-boundary failures                 │
//! │  ├── ValidationError  - Field-level input validation failures          │
//! │  └── ErrorCode        - Stable machine-readable code per failure kind  │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the operator / front end sees             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Front end              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the orchestrator boundary raises. Rounding, breakdown and closing
//! aggregation are total functions over well-formed integer input.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Failures raised at the engine boundary, before any computation runs.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input is not a usable monetary value.
    ///
    /// ## When This Occurs
    /// - Text that is not a number ("doze reais", "12,3,4")
    /// - Negative, NaN or infinite values
    /// - More than two fractional digits in typed input
    /// - Amounts above R$ 999.999,99
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// Customer handed over less than the purchase total.
    ///
    /// ## User Workflow
    /// ```text
    /// Purchase: R$ 50,00   Paid: R$ 25,00
    ///      │
    ///      ▼
    /// calculate_change()
    ///      │
    ///      ▼
    /// InsufficientPayment { purchase: 5000, paid: 2500 }
    ///      │
    ///      ▼
    /// UI shows: "Valor pago é menor que o valor da compra"
    /// ```
    #[error("Insufficient payment: paid {paid} for a purchase of {purchase}")]
    InsufficientPayment { purchase: Money, paid: Money },

    /// Calculation settings cannot be used.
    ///
    /// ## When This Occurs
    /// - No active denomination left after filtering
    /// - A denomination value that is zero or negative
    /// - Negative rounding tolerance
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// CSV rendering failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for [`CoreError::InvalidAmount`].
    pub fn invalid_amount(input: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable code for this failure kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            CoreError::InsufficientPayment { .. } => ErrorCode::InsufficientPayment,
            CoreError::InvalidConfiguration(_) => ErrorCode::InvalidConfiguration,
            CoreError::Export(_) => ErrorCode::ExportFailed,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        }
    }
}

// =============================================================================
// Error Code
// =============================================================================

/// Machine-readable error code, stable across releases.
///
/// Front ends switch on this value to pick the plain-language message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidAmount,
    InsufficientPayment,
    InvalidConfiguration,
    ExportFailed,
    ValidationError,
}

impl ErrorCode {
    /// Returns the code as it appears on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::InsufficientPayment => "INSUFFICIENT_PAYMENT",
            ErrorCode::InvalidConfiguration => "INVALID_CONFIGURATION",
            ErrorCode::ExportFailed => "EXPORT_FAILED",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when typed operator input doesn't meet requirements
/// (piece counts, operator names).
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. a piece count with a decimal point).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientPayment {
            purchase: Money::from_cents(5000),
            paid: Money::from_cents(2500),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: paid R$ 25,00 for a purchase of R$ 50,00"
        );

        let err = CoreError::invalid_amount("abc", "not a number");
        assert_eq!(err.to_string(), "Invalid amount 'abc': not a number");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "operator".to_string(),
        };
        assert_eq!(err.to_string(), "operator is required");

        let err = ValidationError::TooShort {
            field: "operator".to_string(),
            min: 2,
        };
        assert_eq!(err.to_string(), "operator must be at least 2 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "count".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            CoreError::invalid_amount("-1", "negative").code().as_str(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            CoreError::InvalidConfiguration("empty".into()).code().to_string(),
            "INVALID_CONFIGURATION"
        );
        let json = serde_json::to_string(&ErrorCode::InsufficientPayment).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_PAYMENT\"");
    }
}
