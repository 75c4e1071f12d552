//! # Export Command
//!
//! `trokito export closings --input closings.json [--output closings.csv]`
//!
//! Input is a JSON array of records as produced by `close --record --json`
//! or `change --record --json` and collected by the storage layer.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use trokito_core::export::CsvExporter;
use trokito_core::{ChangeRecord, ClosingRecord};

use super::Report;
use crate::error::ApiError;
use crate::state::Settings;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// Till closings.
    Closings,
    /// Change history.
    Changes,
}

/// Arguments for `trokito export`.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// What kind of records the input holds.
    #[arg(value_enum)]
    pub kind: ExportKind,

    /// JSON file with an array of records.
    #[arg(long)]
    pub input: PathBuf,

    /// Write the CSV here instead of printing it.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Result of `trokito export`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub kind: ExportKind,
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<PathBuf>,
    #[serde(skip)]
    pub csv: String,
}

pub fn run_export(args: &ExportArgs, settings: &Settings) -> Result<ExportReport, ApiError> {
    let exporter = CsvExporter::with_utc_offset(settings.export_offset_seconds());

    let (rows, csv) = match args.kind {
        ExportKind::Closings => {
            let records: Vec<ClosingRecord> = read_records(&args.input)?;
            (records.len(), exporter.closings(&records)?)
        }
        ExportKind::Changes => {
            let records: Vec<ChangeRecord> = read_records(&args.input)?;
            (records.len(), exporter.change_history(&records)?)
        }
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &csv).map_err(|e| {
            ApiError::io(format!("Não foi possível gravar {}: {e}", path.display()))
        })?;
        info!(?path, rows, "CSV written");
    }

    Ok(ExportReport {
        kind: args.kind,
        rows,
        written_to: args.output.clone(),
        csv,
    })
}

fn read_records<T: DeserializeOwned>(path: &PathBuf) -> Result<Vec<T>, ApiError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ApiError::io(format!("Não foi possível ler {}: {e}", path.display())))?;
    serde_json::from_str(&contents).map_err(|e| {
        ApiError::validation(format!("Arquivo {} inválido: {e}", path.display()))
    })
}

impl Report for ExportReport {
    fn to_text(&self) -> String {
        match self.written_to {
            Some(ref path) => format!("{} registro(s) exportado(s) para {}", self.rows, path.display()),
            None => self.csv.trim_end().to_string(),
        }
    }
}
