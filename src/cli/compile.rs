//! Compile command
//!
//! Reads a workflow file with `services` and `steps` lists of containers and
//! prints the compiled steps as JSON, services first.

use anyhow::{Context, Result};
use pipeline_compiler::compiler::{Compiler, SequentialIds};
use pipeline_compiler::infrastructure::CompilerConfig;
use pipeline_compiler::pipeline::{Container, Step, StepType};
use serde::Deserialize;
use std::path::Path;

/// Containers of a workflow file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Workflow {
    /// Background services
    pub services: Vec<Container>,
    /// Regular steps
    pub steps: Vec<Container>,
}

/// Options of the compile command
#[derive(Debug, Default)]
pub struct CompileOptions {
    /// Use sequential identifiers for reproducible output
    pub sequential_ids: bool,
    /// Pretty-print the JSON output
    pub pretty: bool,
}

/// Loads the configuration, or the defaults if no file is given
pub fn load_config(path: Option<&Path>) -> Result<CompilerConfig> {
    match path {
        Some(path) => CompilerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(CompilerConfig::default()),
    }
}

/// Compiles every container of a workflow
pub fn compile_workflow(
    workflow: &Workflow,
    config: CompilerConfig,
    sequential_ids: bool,
) -> Result<Vec<Step>> {
    let context = config.into_context().context("Invalid compiler config")?;
    let mut compiler = Compiler::new(context);
    if sequential_ids {
        compiler = compiler.with_id_generator(SequentialIds::new());
    }

    let mut steps = compiler
        .compile_all(&workflow.services, StepType::Service)
        .context("Failed to compile services")?;
    steps.extend(
        compiler
            .compile_all(&workflow.steps, StepType::Commands)
            .context("Failed to compile steps")?,
    );
    Ok(steps)
}

/// Runs the compile command and returns the JSON output
pub fn run(file: &Path, config: CompilerConfig, options: &CompileOptions) -> Result<String> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read workflow {}", file.display()))?;
    let workflow: Workflow = serde_yaml::from_str(&source)
        .with_context(|| format!("Failed to parse workflow {}", file.display()))?;

    let steps = compile_workflow(&workflow, config, options.sequential_ids)?;
    tracing::info!(count = steps.len(), "compiled workflow");

    let output = if options.pretty {
        serde_json::to_string_pretty(&steps)?
    } else {
        serde_json::to_string(&steps)?
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const WORKFLOW: &str = r"
services:
  - name: database
    image: postgres:16
steps:
  - name: test
    image: golang:1.22
    commands: [go test ./...]
  - name: publish
    image: plugins/docker
    settings:
      repo: org/app
";

    #[test]
    fn test_compile_workflow() {
        let workflow: Workflow = serde_yaml::from_str(WORKFLOW).unwrap();
        let steps = compile_workflow(&workflow, CompilerConfig::default(), true).unwrap();

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].name, "database");
        assert_eq!(steps[0].step_type, StepType::Service);
        assert!(steps[0].detached);
        assert_eq!(steps[1].working_dir, "/workspace");
        assert_eq!(steps[2].environment["PLUGIN_REPO"], "org/app");
        assert!(steps[2].privileged);
    }

    #[test]
    fn test_run_reads_files() {
        let mut workflow = tempfile::NamedTempFile::new().unwrap();
        write!(workflow, "{WORKFLOW}").unwrap();

        let output = run(
            workflow.path(),
            CompilerConfig::default(),
            &CompileOptions {
                sequential_ids: true,
                ..Default::default()
            },
        )
        .unwrap();
        let steps: Vec<Step> = serde_json::from_str(&output).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].uuid, "step-0000000000000000");
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "prefix: ci_7\nlog_level: debug\n").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.prefix, "ci_7");
        assert_eq!(config.log_level, "debug");
        assert_eq!(load_config(None).unwrap().log_level, "info");
    }

    #[test]
    fn test_compile_error_is_reported() {
        let workflow: Workflow =
            serde_yaml::from_str("steps:\n  - name: bad\n    image: alpine\n    ports: [web]")
                .unwrap();
        let err = compile_workflow(&workflow, CompilerConfig::default(), true).unwrap_err();
        assert!(err.to_string().contains("Failed to compile steps"));
    }
}
