//! # CSV Export
//!
//! Renders closing and change history as spreadsheet-friendly CSV. Every
//! cell is quoted, money uses the comma decimal of the input (`1234,56`)
//! and dates are `dd/mm/YYYY HH:MM:SS` in the store's local offset.
//!
//! Writes into memory only; saving the bytes is up to the caller.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::record::{ChangeRecord, ClosingRecord};

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Brasília time (UTC-3, no daylight saving since 2019).
pub const BRASILIA_UTC_OFFSET_SECONDS: i32 = -3 * 3600;

const CLOSING_HEADERS: [&str; 7] = [
    "Data/Hora",
    "Operador",
    "Total (R$)",
    "Total Notas (R$)",
    "Total Moedas (R$)",
    "Total Peças",
    "Observações",
];

const CHANGE_HEADERS: [&str; 6] = [
    "Data/Hora",
    "Valor Compra (R$)",
    "Valor Pago (R$)",
    "Troco (R$)",
    "Troco Exato (R$)",
    "Arredondamento (R$)",
];

/// CSV renderer for history records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvExporter {
    utc_offset_seconds: i32,
}

impl Default for CsvExporter {
    fn default() -> Self {
        CsvExporter {
            utc_offset_seconds: BRASILIA_UTC_OFFSET_SECONDS,
        }
    }
}

impl CsvExporter {
    /// Renders dates at a fixed offset from UTC, in seconds (east positive).
    pub fn with_utc_offset(utc_offset_seconds: i32) -> Self {
        CsvExporter { utc_offset_seconds }
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix())
    }

    fn format_date(&self, at: &DateTime<Utc>) -> String {
        at.with_timezone(&self.offset()).format(DATE_FORMAT).to_string()
    }

    /// Closing history, one row per record.
    pub fn closings(&self, records: &[ClosingRecord]) -> CoreResult<String> {
        let rows = records.iter().map(|r| {
            vec![
                self.format_date(&r.created_at),
                r.operator.clone().unwrap_or_else(|| "N/A".to_string()),
                r.summary.total_amount.to_decimal_string(),
                r.summary.total_notes.to_decimal_string(),
                r.summary.total_coins.to_decimal_string(),
                r.summary.total_piece_count.to_string(),
                r.observations.clone().unwrap_or_default(),
            ]
        });
        write_csv(&CLOSING_HEADERS, rows)
    }

    /// Change history, one row per record. PDV records leave purchase/paid blank.
    pub fn change_history(&self, records: &[ChangeRecord]) -> CoreResult<String> {
        let optional = |m: Option<Money>| m.map(|m| m.to_decimal_string()).unwrap_or_default();
        let rows = records.iter().map(|r| {
            vec![
                self.format_date(&r.created_at),
                optional(r.purchase),
                optional(r.paid),
                r.change_given.to_decimal_string(),
                r.exact_change.to_decimal_string(),
                r.rounding_applied.to_decimal_string(),
            ]
        });
        write_csv(&CHANGE_HEADERS, rows)
    }
}

/// Closing history with the default (Brasília) offset.
pub fn closings_to_csv(records: &[ClosingRecord]) -> CoreResult<String> {
    CsvExporter::default().closings(records)
}

/// Change history with the default (Brasília) offset.
pub fn change_history_to_csv(records: &[ChangeRecord]) -> CoreResult<String> {
    CsvExporter::default().change_history(records)
}

fn write_csv<I>(headers: &[&str], rows: I) -> CoreResult<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers).map_err(export_error)?;
    for row in rows {
        writer.write_record(&row).map_err(export_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CoreError::Export(e.to_string()))
}

fn export_error(err: csv::Error) -> CoreError {
    CoreError::Export(err.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::calculate_change;
    use crate::config::CalculationConfig;
    use crate::denomination::{DenominationCatalog, DenominationCount};
    use crate::record::tests::FixedStamper;
    use crate::record::{create_change_record, create_closing_record};

    fn count(cents: i64, n: u32) -> DenominationCount {
        let catalog = DenominationCatalog::brazilian();
        DenominationCount::new(catalog.get(Money::from_cents(cents)).unwrap().clone(), n)
    }

    #[test]
    fn test_closings_csv() {
        let records = vec![
            create_closing_record(
                &[count(2000, 60), count(25, 4)],
                Some("Maria"),
                Some("Sobra, \"conferir\""),
                &FixedStamper,
            ),
            create_closing_record(&[count(500, 1)], None, None, &FixedStamper),
        ];
        let csv = closings_to_csv(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            r#""Data/Hora","Operador","Total (R$)","Total Notas (R$)","Total Moedas (R$)","Total Peças","Observações""#
        );
        assert_eq!(
            lines[1],
            r#""15/03/2024 15:30:05","Maria","1201,00","1200,00","1,00","64","Sobra, conferir""#
        );
        assert_eq!(
            lines[2],
            r#""15/03/2024 15:30:05","N/A","5,00","5,00","0,00","1","""#
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_change_history_csv() {
        let purchase = Money::from_cents(1004);
        let paid = Money::from_cents(2000);
        let result = calculate_change(purchase, paid, &CalculationConfig::default()).unwrap();
        let records = vec![
            create_change_record(Some(purchase), Some(paid), &result, &FixedStamper),
            create_change_record(None, None, &result, &FixedStamper),
        ];

        let csv = CsvExporter::with_utc_offset(0).change_history(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with(r#""Data/Hora","Valor Compra (R$)""#));
        assert_eq!(
            lines[1],
            r#""15/03/2024 18:30:05","10,04","20,00","9,95","9,96","-0,01""#
        );
        assert_eq!(
            lines[2],
            r#""15/03/2024 18:30:05","","","9,95","9,96","-0,01""#
        );
    }

    #[test]
    fn test_empty_history_has_header_only() {
        let csv = change_history_to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
