//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Trokito                                │
//! │                                                                         │
//! │  trokito change --purchase 50 --paid 25                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<Report, ApiError>                                        │  │
//! │  │         │                                                        │  │
//! │  │  Settings Error? ─── ConfigError::Invalid ─────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Engine Error? ─── CoreError::InsufficientPayment ─ ApiError ──►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: Erro: Valor pago é menor que o valor da compra                │
//! │  --json: {"code":"INSUFFICIENT_PAYMENT","message":"..."}               │
//! │  exit:   1 (business / validation), 2 (configuration)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine supplies a stable code and English diagnostics; the message
//! shown to the cashier is chosen here, in plain Portuguese.

use serde::Serialize;
use trokito_core::{CoreError, ValidationError};

use crate::state::ConfigError;

/// Error returned from CLI commands.
///
/// ## Serialization
/// What `--json` prints to stderr when a command fails:
/// ```json
/// {
///   "code": "INSUFFICIENT_PAYMENT",
///   "message": "Valor pago é menor que o valor da compra"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Typed amount could not be used
    InvalidAmount,

    /// Paid less than the purchase
    InsufficientPayment,

    /// Field-level input problem (counts, operator name)
    ValidationError,

    /// Settings unusable (file, environment or values)
    InvalidConfiguration,

    /// CSV rendering or writing failed
    ExportFailed,

    /// Reading input files failed
    IoError,

    /// Unexpected failure
    Internal,
}

impl ErrorCode {
    /// Process exit status for this kind of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::InvalidConfiguration => 2,
            _ => 1,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::IoError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.code.exit_code()
    }
}

/// Converts engine errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount { input, reason } => {
                tracing::debug!(%input, %reason, "rejected amount");
                ApiError::new(
                    ErrorCode::InvalidAmount,
                    format!("Valor inválido: '{input}'"),
                )
            }
            CoreError::InsufficientPayment { purchase, paid } => ApiError::new(
                ErrorCode::InsufficientPayment,
                format!(
                    "Valor pago é menor que o valor da compra (pago {paid}, compra {purchase})"
                ),
            ),
            CoreError::InvalidConfiguration(reason) => ApiError::new(
                ErrorCode::InvalidConfiguration,
                format!("Configuração inválida: {reason}"),
            ),
            CoreError::Export(reason) => {
                tracing::error!("CSV export failed: {}", reason);
                ApiError::new(ErrorCode::ExportFailed, "Falha ao gerar o arquivo CSV")
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts field validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let message = match &err {
            ValidationError::Required { field } => format!("Campo obrigatório: {field}"),
            ValidationError::TooShort { field, min } => {
                format!("{field} deve ter pelo menos {min} caracteres")
            }
            ValidationError::TooLong { field, max } => {
                format!("{field} deve ter no máximo {max} caracteres")
            }
            ValidationError::OutOfRange { field, min, max } => {
                format!("{field} deve estar entre {min} e {max}")
            }
            ValidationError::InvalidFormat { field, reason } => {
                tracing::debug!(%field, %reason, "invalid format");
                format!("{field} em formato inválido")
            }
        };
        ApiError::validation(message)
    }
}

/// Converts settings errors to API errors.
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::InvalidConfiguration, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
