//! # pipeline-compiler - CI workflow step compiler
//!
//! Compiles the containers of a parsed CI workflow into backend-agnostic
//! [`Step`]s that a container runtime, Kubernetes, or a local executor can
//! run without knowing the workflow syntax.
//!
//! Compilation resolves every pipeline-wide policy for a step: environment
//! precedence, secret visibility, plugin settings, privilege escalation,
//! registry credentials, resource limits, and backend options.
//!
//! ## Quick Start
//!
//! ```
//! use pipeline_compiler::prelude::*;
//!
//! let context = CompilationContext::builder()
//!     .prefix("ci_42")
//!     .base("/workspace")
//!     .path("src/app")
//!     .secret(Secret::new("token", "s3cr3t"))
//!     .build();
//! let compiler = Compiler::new(context);
//!
//! let container = Container::new("test", "golang:1.22")
//!     .with_commands(["go test ./..."])
//!     .with_secret("token", "api_token");
//!
//! let step = compiler.compile(&container, StepType::Commands).unwrap();
//! assert_eq!(step.working_dir, "/workspace/src/app");
//! assert_eq!(step.environment["API_TOKEN"], "s3cr3t");
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <https://www.apache.org/licenses/LICENSE-2.0>)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or <https://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod compiler;
pub mod infrastructure;
pub mod pipeline;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use compiler::{CompilationContext, Compiler, Registry, Secret};
pub use infrastructure::{CompilerConfig, ConfigError};
pub use pipeline::{CompileError, Container, Step, StepType};

/// Version of the pipeline-compiler crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
