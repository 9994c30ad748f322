//! Infrastructure layer
//!
//! Configuration loading and logging setup around the compiler.

mod config;
mod logging;

pub use config::{CompilerConfig, ConfigError};
pub use logging::init_logging;
