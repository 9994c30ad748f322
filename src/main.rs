//! pipeline-compiler - compile CI workflow containers into steps
//!
//! ## Commands
//!
//! - `pipeline-compiler compile` - Compile a workflow file and print the steps as JSON
//!
//! ## Quick Start
//!
//! ```bash
//! # Compile with default settings
//! pipeline-compiler compile workflow.yaml --pretty
//!
//! # Compile with registries, secrets and limits from a config file
//! pipeline-compiler compile workflow.yaml --config compiler.yaml -o steps.json
//! ```

use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if std::env::var("PIPELINE_COMPILER_VERBOSE").is_ok() {
                eprintln!("{e:?}");
            }
            ExitCode::FAILURE
        }
    }
}
