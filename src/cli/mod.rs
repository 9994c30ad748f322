//! CLI for pipeline-compiler
//!
//! - `compile`: compile a workflow file into backend-agnostic steps

pub mod compile;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for pipeline-compiler
#[derive(Parser, Debug)]
#[command(name = "pipeline-compiler")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level, falling back to `PIPELINE_COMPILER_LOG` then the config
    /// file (overridden by `RUST_LOG`)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a workflow file into steps
    Compile {
        /// Workflow file with `services` and `steps`
        file: PathBuf,
        /// Compiler configuration (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Use sequential step identifiers
        #[arg(long)]
        sequential_ids: bool,
        /// Pretty-print JSON
        #[arg(short, long)]
        pretty: bool,
    },
}

/// Runs the CLI
pub fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Compile {
            file,
            config,
            output,
            sequential_ids,
            pretty,
        } => {
            let config = compile::load_config(config.as_deref())?;
            let level = args
                .log_level
                .or_else(|| std::env::var("PIPELINE_COMPILER_LOG").ok())
                .unwrap_or_else(|| config.log_level.clone());
            pipeline_compiler::infrastructure::init_logging(&level);

            let json = compile::run(
                &file,
                config,
                &compile::CompileOptions {
                    sequential_ids,
                    pretty,
                },
            )?;

            match output {
                Some(path) => std::fs::write(&path, json + "\n")
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}
