//! # Denominations Command
//!
//! Lists the catalog with the active flags from settings.

use clap::Args;
use serde::Serialize;

use trokito_core::closing::quick_count_options;
use trokito_core::{CatalogFilter, DenominationCatalog, DenominationKind, Money};

use super::Report;
use crate::state::Settings;

/// Arguments for `trokito denominations`.
#[derive(Args, Debug, Clone, Default)]
pub struct DenominationsArgs {
    /// Only what is counted when closing the till (notes up to R$ 20).
    #[arg(long)]
    pub till: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenominationRow {
    pub value: Money,
    pub label: String,
    pub kind: DenominationKind,
    pub active: bool,
    pub quick_counts: [u32; 4],
}

/// Result of `trokito denominations`.
#[derive(Debug, Clone, Serialize)]
pub struct DenominationsReport {
    pub filter: CatalogFilter,
    pub denominations: Vec<DenominationRow>,
}

pub fn run_denominations(args: &DenominationsArgs, settings: &Settings) -> DenominationsReport {
    let filter = if args.till {
        CatalogFilter::TillClosing
    } else {
        CatalogFilter::Full
    };

    let catalog = DenominationCatalog::brazilian()
        .with_active(&settings.denominations.active)
        .filtered(filter);

    let denominations = catalog
        .all()
        .iter()
        .map(|d| DenominationRow {
            value: d.value,
            label: d.label.clone(),
            kind: d.kind,
            active: d.active,
            quick_counts: quick_count_options(d.value),
        })
        .collect();

    DenominationsReport {
        filter,
        denominations,
    }
}

impl Report for DenominationsReport {
    fn to_text(&self) -> String {
        self.denominations
            .iter()
            .map(|row| {
                let kind = match row.kind {
                    DenominationKind::Note => "nota",
                    DenominationKind::Coin => "moeda",
                };
                let status = if row.active { "ativa" } else { "inativa" };
                format!("{:<8} {:<6} {}", row.label, kind, status)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_listing() {
        let report = run_denominations(&DenominationsArgs::default(), &Settings::default());
        assert_eq!(report.denominations.len(), 13);
        let last = report.denominations.last().unwrap();
        assert_eq!(last.value.cents(), 1);
        assert!(!last.active);
        assert_eq!(report.denominations[0].quick_counts, [5, 10, 20, 50]);
    }

    #[test]
    fn test_till_listing_respects_settings() {
        let mut settings = Settings::default();
        settings.denominations.active = vec![2000, 100];
        let report = run_denominations(&DenominationsArgs { till: true }, &settings);
        assert_eq!(report.filter, CatalogFilter::TillClosing);
        assert_eq!(report.denominations.len(), 10);
        let active: Vec<i64> = report
            .denominations
            .iter()
            .filter(|r| r.active)
            .map(|r| r.value.cents())
            .collect();
        assert_eq!(active, vec![2000, 100]);

        let text = report.to_text();
        assert!(text.starts_with("R$ 20    nota   ativa\n"));
        assert!(text.contains("R$ 0,50  moeda  inativa"));
    }
}
