//! # Trokito CLI
//!
//! Command-line front end over `trokito-core`.
//!
//! ## Module Organization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         trokito_cli                                     │
//! │                                                                         │
//! │  lib.rs ◄─── You are here (Cli, dispatch, tracing setup)               │
//! │     │                                                                   │
//! │     ├── commands/   Subcommands, each returning a Report               │
//! │     ├── state/      Settings (defaults → TOML → TROKITO_* env)         │
//! │     └── error.rs    ApiError with stable codes and exit statuses       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup
//! 1. Parse arguments
//! 2. Install the tracing subscriber (stderr, `RUST_LOG` wins)
//! 3. Load settings
//! 4. Run the subcommand and print its report to stdout

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trokito_core::{RecordStamper, SystemStamper};

use commands::change::{run_change, ChangeArgs};
use commands::closing::{run_close, CloseArgs};
use commands::config::{run_config, ConfigArgs};
use commands::denominations::{run_denominations, DenominationsArgs};
use commands::export::{run_export, ExportArgs};
use commands::render;
use error::ApiError;
use state::Settings;

/// Trokito: change calculation and till closing in Brazilian reais.
#[derive(Parser, Debug)]
#[command(name = "trokito", version, about, long_about = None)]
pub struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, global = true, env = "TROKITO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print reports and errors as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calculate the change to hand back.
    Change(ChangeArgs),

    /// Summarize a till count.
    Close(CloseArgs),

    /// List denominations and which are active.
    Denominations(DenominationsArgs),

    /// Export saved records as CSV.
    Export(ExportArgs),

    /// Show the effective settings.
    Config(ConfigArgs),
}

/// Entry point used by the `trokito` binary.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("trokito v{} starting", env!("CARGO_PKG_VERSION"));

    match execute(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(code = ?err.code, "command failed");
            if cli.json {
                match serde_json::to_string(&err) {
                    Ok(json) => eprintln!("{json}"),
                    Err(_) => eprintln!("Erro: {}", err.message),
                }
            } else {
                eprintln!("Erro: {}", err.message);
            }
            ExitCode::from(err.exit_code())
        }
    }
}

/// Loads settings and runs the parsed command, returning what to print.
pub fn execute(cli: &Cli) -> Result<String, ApiError> {
    let settings = Settings::load(cli.config.clone())?;
    dispatch(&cli.command, &settings, &SystemStamper, cli.json)
}

/// Runs one command against already loaded settings.
pub fn dispatch(
    command: &Commands,
    settings: &Settings,
    stamper: &impl RecordStamper,
    json: bool,
) -> Result<String, ApiError> {
    match command {
        Commands::Change(args) => render(&run_change(args, settings, stamper)?, json),
        Commands::Close(args) => render(&run_close(args, settings, stamper)?, json),
        Commands::Denominations(args) => render(&run_denominations(args, settings), json),
        Commands::Export(args) => render(&run_export(args, settings)?, json),
        Commands::Config(args) => render(&run_config(args, settings)?, json),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,trokito=debug,trokito_core=debug,trokito_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    struct TestStamper;

    impl RecordStamper for TestStamper {
        fn next_id(&self) -> String {
            "rec-1".to_string()
        }

        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()
        }
    }

    #[test]
    fn cli_parse_change_purchase_paid() {
        let cli =
            Cli::try_parse_from(["trokito", "change", "--purchase", "23,50", "--paid", "50"])
                .unwrap();
        match cli.command {
            Commands::Change(args) => {
                assert_eq!(args.purchase.as_deref(), Some("23,50"));
                assert_eq!(args.paid.as_deref(), Some("50"));
                assert!(args.amount.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!cli.json);
    }

    #[test]
    fn cli_parse_change_requires_input() {
        assert!(Cli::try_parse_from(["trokito", "change"]).is_err());
        assert!(Cli::try_parse_from(["trokito", "change", "--purchase", "10"]).is_err());
        assert!(Cli::try_parse_from([
            "trokito", "change", "--purchase", "10", "--paid", "20", "--amount", "10"
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_close_with_global_flags() {
        let cli = Cli::try_parse_from([
            "trokito", "close", "--count", "2000=3", "--count", "100=12", "--notes", "ok",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Close(args) => {
                assert_eq!(args.counts, vec!["2000=3", "100=12"]);
                assert_eq!(args.observations.as_deref(), Some("ok"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_export_kind() {
        let cli = Cli::try_parse_from([
            "trokito", "export", "changes", "--input", "changes.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.kind, commands::export::ExportKind::Changes);
                assert_eq!(args.input, PathBuf::from("changes.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["trokito", "export", "sales", "--input", "x"]).is_err());
    }

    #[test]
    fn dispatch_renders_text_and_json() {
        let cli = Cli::try_parse_from(["trokito", "change", "--amount", "9,96"]).unwrap();
        let text = dispatch(&cli.command, &Settings::default(), &TestStamper, false).unwrap();
        assert!(text.starts_with("Troco: R$ 9,95"));

        let json = dispatch(&cli.command, &Settings::default(), &TestStamper, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["result"]["rounding_delta"], -1);
    }

    #[test]
    fn execute_reports_missing_config() {
        let cli = Cli::try_parse_from([
            "trokito", "--config", "/nonexistent/trokito.toml", "denominations",
        ])
        .unwrap();
        let err = execute(&cli).unwrap_err();
        assert_eq!(err.code, error::ErrorCode::InvalidConfiguration);
        assert_eq!(err.exit_code(), 2);
    }
}
