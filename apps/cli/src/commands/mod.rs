//! # Commands Module
//!
//! Every subcommand of the `trokito` binary.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs            ◄─── You are here (Report trait, shared rendering)
//! ├── change.rs         ◄─── Change calculation (purchase/paid or PDV)
//! ├── closing.rs        ◄─── Till closing summary and checks
//! ├── denominations.rs  ◄─── Catalog listing
//! ├── export.rs         ◄─── CSV export of saved records
//! └── config.rs         ◄─── Effective settings
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  clap Args ──► run_xxx(&args, &settings, ...) ──► Result<Report, ApiError>
//! │                                                        │                │
//! │                          --json ◄──────────────────────┤                │
//! │                serde_json::to_string_pretty            │                │
//! │                                                        ▼                │
//! │                                               Report::to_text()         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never print. They return a report and the caller decides the
//! format, which keeps them testable.

pub mod change;
pub mod closing;
pub mod config;
pub mod denominations;
pub mod export;

use serde::Serialize;
use trokito_core::{DenominationCount, DenominationKind};

use crate::error::ApiError;

/// Output of a command: serializable for `--json`, plus a text rendering.
pub trait Report: Serialize {
    fn to_text(&self) -> String;
}

/// Renders a report as pretty JSON or as text.
pub fn render<R: Report>(report: &R, json: bool) -> Result<String, ApiError> {
    if json {
        serde_json::to_string_pretty(report).map_err(|e| ApiError::internal(e.to_string()))
    } else {
        Ok(report.to_text())
    }
}

/// One line per entry: `  2 x R$ 20 (nota)`.
pub(crate) fn breakdown_lines(counts: &[DenominationCount]) -> Vec<String> {
    counts
        .iter()
        .map(|c| {
            let kind = match c.denomination.kind {
                DenominationKind::Note => "nota",
                DenominationKind::Coin => "moeda",
            };
            format!("  {} x {} ({})", c.count, c.denomination.label, kind)
        })
        .collect()
}
