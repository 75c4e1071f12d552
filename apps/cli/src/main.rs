//! # trokito binary
//!
//! All wiring lives in the library so it can be tested; see [`trokito_cli::run`].

use std::process::ExitCode;

fn main() -> ExitCode {
    trokito_cli::run()
}
