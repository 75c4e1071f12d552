//! # Closing Command
//!
//! `trokito close --count 2000=3 --count 100=12 --operator Maria`
//!
//! Each `--count` is `<centavos>=<pieces>`. Repeating a value keeps the last.

use clap::Args;
use serde::Serialize;
use tracing::info;

use trokito_core::closing::{initialize_counts, update_count};
use trokito_core::record::create_closing_record;
use trokito_core::validation::{parse_quantity, validate_operator_name};
use trokito_core::{
    summarize, ClosingChecks, ClosingRecord, ClosingSummary, ClosingValidation,
    DenominationCatalog, Money, RecordStamper,
};

use super::{breakdown_lines, Report};
use crate::error::ApiError;
use crate::state::Settings;

/// Arguments for `trokito close`.
#[derive(Args, Debug, Clone, Default)]
pub struct CloseArgs {
    /// Counted pieces as <centavos>=<quantity>, e.g. 2000=3.
    #[arg(long = "count", value_name = "CENTS=QTY")]
    pub counts: Vec<String>,

    /// Operator closing the till (defaults to the configured one).
    #[arg(long)]
    pub operator: Option<String>,

    /// Free-text observations stored with the record.
    #[arg(long, visible_alias = "notes")]
    pub observations: Option<String>,

    /// Also warn when only notes were counted.
    #[arg(long)]
    pub strict: bool,

    /// Emit a closing record.
    #[arg(long)]
    pub record: bool,
}

/// Result of `trokito close`.
#[derive(Debug, Clone, Serialize)]
pub struct CloseReport {
    pub summary: ClosingSummary,
    pub validation: ClosingValidation,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<ClosingRecord>,
}

/// Summarizes a till count and runs the sanity checks.
///
/// Warnings never fail the command; only malformed input does.
pub fn run_close(
    args: &CloseArgs,
    settings: &Settings,
    stamper: &impl RecordStamper,
) -> Result<CloseReport, ApiError> {
    let catalog = DenominationCatalog::brazilian();
    let mut counts = initialize_counts(&catalog);

    for entry in &args.counts {
        let (value, quantity) = parse_count_entry(entry, &catalog)?;
        update_count(&mut counts, value, i64::from(quantity));
    }

    let operator = args
        .operator
        .as_deref()
        .or(settings.operator.as_deref())
        .map(validate_operator_name)
        .transpose()?;

    let summary = summarize(&counts);
    let checks = if args.strict {
        ClosingChecks::strict()
    } else {
        settings.closing_checks()
    };
    let validation = checks.validate(&summary);
    let warnings = validation.messages();

    info!(
        total = summary.total_amount.cents(),
        pieces = summary.total_piece_count,
        warnings = warnings.len(),
        "till counted"
    );

    let record = args.record.then(|| {
        create_closing_record(
            &counts,
            operator.as_deref(),
            args.observations.as_deref(),
            stamper,
        )
    });

    Ok(CloseReport {
        summary,
        validation,
        warnings,
        record,
    })
}

fn parse_count_entry(
    entry: &str,
    catalog: &DenominationCatalog,
) -> Result<(Money, u32), ApiError> {
    let (value, quantity) = entry.split_once('=').ok_or_else(|| {
        ApiError::validation(format!("Contagem '{entry}' deve ter o formato CENTAVOS=QUANTIDADE"))
    })?;

    let cents: i64 = value.trim().parse().map_err(|_| {
        ApiError::validation(format!("Denominação '{}' deve estar em centavos", value.trim()))
    })?;
    let value = Money::from_cents(cents);
    if catalog.get(value).is_none() {
        return Err(ApiError::validation(format!(
            "Denominação desconhecida: {value}"
        )));
    }

    Ok((value, parse_quantity(quantity)?))
}

impl Report for CloseReport {
    fn to_text(&self) -> String {
        let summary = &self.summary;
        let mut lines = Vec::new();

        lines.extend(breakdown_lines(&summary.counted_denominations));
        lines.push(format!("Total em notas: {}", summary.total_notes));
        lines.push(format!("Total em moedas: {}", summary.total_coins));
        lines.push(format!("Total: {}", summary.total_amount));
        lines.push(format!("Peças: {}", summary.total_piece_count));

        for warning in &self.warnings {
            lines.push(format!("Aviso: {warning}"));
        }

        if let Some(ref record) = self.record {
            lines.push(format!("Registro: {}", record.id));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{DateTime, TimeZone, Utc};

    struct TestStamper;

    impl RecordStamper for TestStamper {
        fn next_id(&self) -> String {
            "close-1".to_string()
        }

        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 5, 2, 22, 0, 0).unwrap()
        }
    }

    fn args(counts: &[&str]) -> CloseArgs {
        CloseArgs {
            counts: counts.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_close_notes_only_example() {
        let report = run_close(
            &args(&["10000=2", "5000=1", "500=1"]),
            &Settings::default(),
            &TestStamper,
        )
        .unwrap();
        assert_eq!(report.summary.total_notes.cents(), 25500);
        assert_eq!(report.summary.total_coins.cents(), 0);
        assert_eq!(report.summary.total_piece_count, 4);
        assert!(report.validation.is_valid);
        assert!(report.warnings.is_empty());
        assert_eq!(
            report.to_text(),
            "  2 x R$ 100 (nota)\n  1 x R$ 50 (nota)\n  1 x R$ 5 (nota)\nTotal em notas: R$ 255,00\nTotal em moedas: R$ 0,00\nTotal: R$ 255,00\nPeças: 4"
        );
    }

    #[test]
    fn test_strict_and_last_value_wins() {
        let close = CloseArgs {
            strict: true,
            ..args(&["2000=1", "2000=3"])
        };
        let report = run_close(&close, &Settings::default(), &TestStamper).unwrap();
        assert_eq!(report.summary.total_amount.cents(), 6000);
        assert_eq!(report.warnings, vec!["Apenas notas foram contadas"]);
        assert!(!report.validation.is_valid);
    }

    #[test]
    fn test_record_uses_configured_operator() {
        let mut settings = Settings::default();
        settings.operator = Some("Maria".into());
        let close = CloseArgs {
            record: true,
            observations: Some("Sobra <R$ 1>".into()),
            ..args(&["100=5", "2000=1"])
        };
        let report = run_close(&close, &settings, &TestStamper).unwrap();
        let record = report.record.unwrap();
        assert_eq!(record.id, "close-1");
        assert_eq!(record.operator.as_deref(), Some("Maria"));
        assert_eq!(record.observations.as_deref(), Some("Sobra R$ 1"));
        assert_eq!(record.summary.total_amount.cents(), 2500);
    }

    #[test]
    fn test_empty_count_is_flagged_not_failed() {
        let report = run_close(&args(&[]), &Settings::default(), &TestStamper).unwrap();
        assert!(!report.validation.is_valid);
        assert_eq!(report.warnings, vec!["Nenhum valor foi contado"]);
    }

    #[test]
    fn test_malformed_entries() {
        for bad in ["2000", "abc=1", "300=1", "2000=-1", "2000=1,5", "2000=10000"] {
            let err = run_close(&args(&[bad]), &Settings::default(), &TestStamper).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError, "entry {bad}");
        }

        let close = CloseArgs {
            operator: Some("J".into()),
            ..args(&["2000=1"])
        };
        let err = run_close(&close, &Settings::default(), &TestStamper).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
