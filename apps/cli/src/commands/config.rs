//! # Config Command
//!
//! Prints the effective settings after file and environment overrides.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use super::Report;
use crate::error::ApiError;
use crate::state::Settings;

/// Arguments for `trokito config`.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Only print where the default config file is looked up.
    #[arg(long)]
    pub path: bool,
}

/// Result of `trokito config`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub default_path: Option<PathBuf>,
    pub settings: Settings,
    #[serde(skip)]
    path_only: bool,
    #[serde(skip)]
    rendered: String,
}

pub fn run_config(args: &ConfigArgs, settings: &Settings) -> Result<ConfigReport, ApiError> {
    Ok(ConfigReport {
        default_path: Settings::default_config_path(),
        settings: settings.clone(),
        path_only: args.path,
        rendered: settings.to_toml()?,
    })
}

impl Report for ConfigReport {
    fn to_text(&self) -> String {
        if self.path_only {
            return match self.default_path {
                Some(ref path) => path.display().to_string(),
                None => "Nenhum diretório de configuração disponível".to_string(),
            };
        }
        self.rendered.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_effective_settings() {
        let mut settings = Settings::default();
        settings.operator = Some("Maria".into());
        let report = run_config(&ConfigArgs::default(), &settings).unwrap();
        let text = report.to_text();
        assert!(text.contains("operator = \"Maria\""));
        assert!(text.contains("[rounding]"));
        assert!(text.contains("mode = \"allow-owing\""));

        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_json_has_settings() {
        let report = run_config(&ConfigArgs { path: true }, &Settings::default()).unwrap();
        let json = super::super::render(&report, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["settings"]["rounding"]["tolerance_cents"], 4);
        assert!(value.get("path_only").is_none());
    }
}
