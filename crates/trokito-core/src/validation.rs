//! # Validation Module
//!
//! Rules for what the operator types into the counting and closing forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  ├── Numeric keypad, max length                                        │
//! │  └── Immediate feedback                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Piece counts: integers 0-9999                                     │
//! │  ├── Operator name: 2-50 chars, markup stripped                        │
//! │  └── Observations: markup and script fragments stripped, capped        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine (change / closing)                                    │
//! │  └── InvalidAmount / InvalidConfiguration at the boundary              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use trokito_core::validation::{parse_quantity, validate_operator_name};
//!
//! assert_eq!(parse_quantity("12").unwrap(), 12);
//! assert_eq!(validate_operator_name("  Ana  ").unwrap(), "Ana");
//! ```

use crate::error::ValidationError;
use crate::{
    MAX_AMOUNT_CENTS, MAX_DENOMINATION_COUNT, MAX_OBSERVATIONS_LEN, OPERATOR_NAME_MAX_LEN,
    OPERATOR_NAME_MIN_LEN,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Characters never kept in free text.
const MARKUP_CHARS: &[char] = &['<', '>', '"', '\'', '&'];

// =============================================================================
// Numeric Validators
// =============================================================================

/// Parses a typed piece count.
///
/// ## Rules
/// - Blank input counts as zero
/// - Digits only, no sign or decimal point
/// - At most [`MAX_DENOMINATION_COUNT`] (9999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Till closing: R$ 0,25 row                                              │
/// │                                                                         │
/// │  Operator types: 40                                                    │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  parse_quantity("40") ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── "4,5" / "abc"? → InvalidFormat                               │
/// │       ├── "-3" / "12000"? → OutOfRange                                 │
/// │       └── OK → update_count(counts, 25, 40)                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn parse_quantity(input: &str) -> ValidationResult<u32> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0);
    }

    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must be a whole number".to_string(),
        });
    }

    if negative {
        return Err(quantity_out_of_range());
    }

    let value: i64 = digits.parse().map_err(|_| quantity_out_of_range())?;
    validate_quantity(value)
}

/// Validates a piece count given as a number.
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    if qty < 0 || qty > i64::from(MAX_DENOMINATION_COUNT) {
        return Err(quantity_out_of_range());
    }
    u32::try_from(qty).map_err(|_| quantity_out_of_range())
}

fn quantity_out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 0,
        max: i64::from(MAX_DENOMINATION_COUNT),
    }
}

/// Validates an amount in centavos.
///
/// ## Rules
/// - Zero is allowed (exact payment)
/// - Must not exceed R$ 999.999,99
///
/// ```rust
/// use trokito_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents(2650).is_ok());
/// assert!(validate_amount_cents(0).is_ok());
/// assert!(validate_amount_cents(-100).is_err());
/// ```
pub fn validate_amount_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_AMOUNT_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates and cleans an operator name.
///
/// ## Rules
/// - Surrounding whitespace trimmed, markup characters removed
/// - Cut to 50 characters
/// - At least 2 characters must remain
///
/// ## Returns
/// The cleaned name.
pub fn validate_operator_name(name: &str) -> ValidationResult<String> {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .take(OPERATOR_NAME_MAX_LEN)
        .collect();
    let cleaned = cleaned.trim().to_string();

    if cleaned.is_empty() {
        return Err(ValidationError::Required {
            field: "operator".to_string(),
        });
    }

    if cleaned.chars().count() < OPERATOR_NAME_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "operator".to_string(),
            min: OPERATOR_NAME_MIN_LEN,
        });
    }

    Ok(cleaned)
}

/// Cleans free-text observations for storage and export.
///
/// Removes markup characters, `javascript:` and inline `on…=` handlers,
/// then cuts to [`MAX_OBSERVATIONS_LEN`] characters. Never fails.
///
/// ```rust
/// use trokito_core::validation::sanitize_observations;
///
/// assert_eq!(sanitize_observations(" Faltou <R$ 2> "), "Faltou R$ 2");
/// ```
pub fn sanitize_observations(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect();
    let stripped = remove_ascii_case_insensitive(&stripped, "javascript:");
    let stripped = strip_inline_handlers(&stripped);
    stripped
        .trim()
        .chars()
        .take(MAX_OBSERVATIONS_LEN)
        .collect()
}

fn remove_ascii_case_insensitive(text: &str, needle: &str) -> String {
    let mut out = text.to_string();
    while let Some(pos) = out.to_ascii_lowercase().find(needle) {
        out.replace_range(pos..pos + needle.len(), "");
    }
    out
}

/// Drops `onxxx=` tokens that start a word.
fn strip_inline_handlers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let word_start = i == 0 || !chars[i - 1].is_alphanumeric();
        if word_start
            && i + 1 < chars.len()
            && chars[i].eq_ignore_ascii_case(&'o')
            && chars[i + 1].eq_ignore_ascii_case(&'n')
        {
            let mut j = i + 2;
            while j < chars.len() && (chars[j].is_ascii_alphanumeric() || chars[j] == '_') {
                j += 1;
            }
            if j > i + 2 && j < chars.len() && chars[j] == '=' {
                i = j + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
