//! # Settings
//!
//! Operator settings loaded at startup and turned into the engine's
//! [`CalculationConfig`].
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TROKITO_ROUNDING_POLICY=nearest-0.10                               │
//! │     TROKITO_TOLERANCE_CENTS=4                                          │
//! │     TROKITO_DENOMINATIONS=20000,10000,5000,...                         │
//! │     TROKITO_PRIORITIZE_LESS_COINS=true                                 │
//! │     TROKITO_OPERATOR=Maria                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/trokito/config.toml (Linux)                              │
//! │     ~/Library/Application Support/br.trokito.trokito/config.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     allow-owing up to R$ 0,04, every coin but R$ 0,01                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! operator = "Maria"
//! prioritize_less_coins = true
//!
//! [rounding]
//! mode = "allow-owing"   # nearest-0.05 | nearest-0.10 | allow-owing
//! tolerance_cents = 4
//!
//! [denominations]
//! active = [20000, 10000, 5000, 2000, 1000, 500, 200, 100, 50, 25, 10, 5]
//!
//! [closing]
//! strict_checks = false
//!
//! [export]
//! utc_offset_hours = -3
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use trokito_core::validation::validate_operator_name;
use trokito_core::{
    CalculationConfig, ClosingChecks, DenominationCatalog, RoundingPolicy,
    DEFAULT_TOLERANCE_CENTS,
};

// =============================================================================
// Errors
// =============================================================================

/// Settings could not be loaded or are unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to render settings: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Rounding Mode
// =============================================================================

/// Rounding policy as chosen in settings. The tolerance lives beside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundingMode {
    #[serde(rename = "nearest-0.05")]
    NearestFiveCents,
    #[serde(rename = "nearest-0.10")]
    NearestTenCents,
    #[default]
    #[serde(rename = "allow-owing")]
    AllowOwing,
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundingMode::NearestFiveCents => write!(f, "nearest-0.05"),
            RoundingMode::NearestTenCents => write!(f, "nearest-0.10"),
            RoundingMode::AllowOwing => write!(f, "allow-owing"),
        }
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nearest-0.05" | "nearest-5" | "nearest_5" => Ok(RoundingMode::NearestFiveCents),
            "nearest-0.10" | "nearest-10" | "nearest_10" => Ok(RoundingMode::NearestTenCents),
            "allow-owing" | "allow-owing-up-to-0.04" | "allow_owing" => {
                Ok(RoundingMode::AllowOwing)
            }
            other => Err(ConfigError::invalid(
                "rounding.mode",
                format!(
                    "unknown rounding mode '{other}'. Valid options: nearest-0.05, nearest-0.10, allow-owing"
                ),
            )),
        }
    }
}

// =============================================================================
// Settings Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundingSettings {
    pub mode: RoundingMode,
    /// Only used by `allow-owing`.
    pub tolerance_cents: i64,
}

impl Default for RoundingSettings {
    fn default() -> Self {
        RoundingSettings {
            mode: RoundingMode::default(),
            tolerance_cents: DEFAULT_TOLERANCE_CENTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenominationSettings {
    /// Face values in centavos.
    pub active: Vec<i64>,
}

impl Default for DenominationSettings {
    fn default() -> Self {
        DenominationSettings {
            active: DenominationCatalog::brazilian().default_active_values(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosingSettings {
    /// Also warn when a count holds notes only.
    pub strict_checks: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Offset used for dates in CSV files.
    pub utc_offset_hours: i32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            utc_offset_hours: -3,
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Effective settings for one run.
///
/// Plain values come before the tables so the TOML rendering stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default operator name for closings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    pub prioritize_less_coins: bool,

    pub rounding: RoundingSettings,

    pub denominations: DenominationSettings,

    pub closing: ClosingSettings,

    pub export: ExportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            operator: None,
            prioritize_less_coins: true,
            rounding: RoundingSettings::default(),
            denominations: DenominationSettings::default(),
            closing: ClosingSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings: defaults, then the TOML file, then `TROKITO_*` variables.
    ///
    /// An explicit path must exist. The default path is optional.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`Settings::load`] with a custom environment lookup.
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut settings = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path)),
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                other => {
                    debug!(path = ?other, "No config file, using defaults");
                    Self::default()
                }
            },
        };

        settings.apply_env_overrides(env)?;
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading settings from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(mode) = env("TROKITO_ROUNDING_POLICY") {
            debug!(mode = %mode, "Overriding rounding policy from environment");
            self.rounding.mode = mode.parse()?;
        }

        if let Some(tolerance) = env("TROKITO_TOLERANCE_CENTS") {
            self.rounding.tolerance_cents = tolerance.trim().parse().map_err(|_| {
                ConfigError::invalid("TROKITO_TOLERANCE_CENTS", "must be a whole number")
            })?;
        }

        if let Some(list) = env("TROKITO_DENOMINATIONS") {
            debug!(list = %list, "Overriding active denominations from environment");
            self.denominations.active = parse_denomination_list(&list)?;
        }

        if let Some(flag) = env("TROKITO_PRIORITIZE_LESS_COINS") {
            self.prioritize_less_coins = parse_bool(&flag).ok_or_else(|| {
                ConfigError::invalid("TROKITO_PRIORITIZE_LESS_COINS", "expected true or false")
            })?;
        }

        if let Some(operator) = env("TROKITO_OPERATOR") {
            self.operator = Some(operator);
        }

        Ok(())
    }

    /// Validates the settings against the engine's rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounding.tolerance_cents < 0 {
            return Err(ConfigError::invalid(
                "rounding.tolerance_cents",
                "must not be negative",
            ));
        }

        self.to_calculation_config()
            .validate(&DenominationCatalog::brazilian())
            .map_err(|e| ConfigError::invalid("denominations.active", e.to_string()))?;

        if let Some(ref operator) = self.operator {
            validate_operator_name(operator)
                .map_err(|e| ConfigError::invalid("operator", e.to_string()))?;
        }

        if !(-12..=14).contains(&self.export.utc_offset_hours) {
            return Err(ConfigError::invalid(
                "export.utc_offset_hours",
                "must be between -12 and 14",
            ));
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("br", "trokito", "trokito")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Engine settings for change calculation.
    pub fn to_calculation_config(&self) -> CalculationConfig {
        let rounding_policy = match self.rounding.mode {
            RoundingMode::NearestFiveCents => RoundingPolicy::NearestFiveCents,
            RoundingMode::NearestTenCents => RoundingPolicy::NearestTenCents,
            RoundingMode::AllowOwing => RoundingPolicy::AllowOwing {
                tolerance_cents: self.rounding.tolerance_cents,
            },
        };
        CalculationConfig {
            rounding_policy,
            active_denominations: self.denominations.active.clone(),
            prioritize_less_coins: self.prioritize_less_coins,
        }
    }

    /// Till-closing thresholds.
    pub fn closing_checks(&self) -> ClosingChecks {
        if self.closing.strict_checks {
            ClosingChecks::strict()
        } else {
            ClosingChecks::default()
        }
    }

    /// Offset for CSV dates, in seconds east of UTC.
    pub fn export_offset_seconds(&self) -> i32 {
        self.export.utc_offset_hours * 3600
    }

    /// Renders the settings as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn parse_denomination_list(list: &str) -> Result<Vec<i64>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                ConfigError::invalid(
                    "TROKITO_DENOMINATIONS",
                    format!("'{s}' is not a value in centavos"),
                )
            })
        })
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "sim" => Some(true),
        "false" | "0" | "no" | "nao" | "não" => Some(false),
        _ => None,
    }
}
