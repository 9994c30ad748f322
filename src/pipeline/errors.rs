//! Error types for step compilation

use std::num::ParseIntError;
use thiserror::Error;

/// Errors that abort the compilation of a container into a step.
///
/// Any of these aborts the whole pipeline compile; callers never hand a
/// partially compiled pipeline to the scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// An extra host entry is not of the form `name:ip`
    #[error("extra host '{host}' must be of the form 'name:ip'")]
    ExtraHostFormat {
        /// The offending entry, verbatim.
        host: String,
    },

    /// A requested secret does not exist or may not be used by this step
    #[error("secret \"{name}\" not found or not allowed to be used")]
    SecretNotFound {
        /// Source name of the requested secret.
        name: String,
    },

    /// Plugin settings could not be converted into environment variables
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A declared port is not a valid port number
    #[error(transparent)]
    Port(#[from] ParseIntError),
}

/// Errors raised while turning plugin settings into environment variables
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A `from_secret` reference names a secret that is missing or unavailable
    #[error("secret \"{name}\" not found or not allowed to be used")]
    SecretNotFound {
        /// Name referenced by `from_secret`.
        name: String,
    },

    /// A setting value could not be encoded
    #[error("failed to encode setting '{key}': {reason}")]
    Encode {
        /// Setting key as declared.
        key: String,
        /// Encoder message.
        reason: String,
    },
}

/// Validation errors for compiler configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Workspace prefix cannot be empty
    #[error("workspace prefix cannot be empty")]
    EmptyPrefix,

    /// Base path must be absolute
    #[error("base path must be absolute, got '{base}'")]
    RelativeBase {
        /// The configured base path.
        base: String,
    },

    /// Registry entry without a hostname
    #[error("registry #{index} has an empty hostname")]
    EmptyRegistryHostname {
        /// Position of the registry in configuration order.
        index: usize,
    },

    /// Secret entry without a name
    #[error("secret #{index} has an empty name")]
    EmptySecretName {
        /// Position of the secret in configuration order.
        index: usize,
    },
}
