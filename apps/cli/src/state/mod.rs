//! # State Module
//!
//! Read-only state shared by every command for one run.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │   Settings::load()  ──►  Settings  ──┬──► to_calculation_config()      │
//! │   (file + env)                       ├──► closing_checks()             │
//! │                                      └──► export_offset_seconds()      │
//! │                                                                         │
//! │  Loaded once at startup; commands borrow it and never mutate it.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::{
    ClosingSettings, ConfigError, DenominationSettings, ExportSettings, RoundingMode,
    RoundingSettings, Settings,
};
