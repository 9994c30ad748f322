//! Prelude module for common imports

pub use crate::compiler::{
    CompilationContext, CompilationContextBuilder, Compiler, IdGenerator, Registry, Secret,
    SequentialIds, UuidV7Ids,
};
pub use crate::infrastructure::{CompilerConfig, ConfigError};
pub use crate::pipeline::{
    BackendOptions, CompileError, Container, FailurePolicy, ResourceLimits, SettingsError, Step,
    StepType, Validate, When,
};
