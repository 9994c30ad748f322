//! Core types shared by containers and compiled steps

#![allow(clippy::must_use_candidate)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the pipeline does when a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the pipeline
    #[default]
    Fail,
    /// Ignore the failure and carry on
    Ignore,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

/// Container resource limits.
///
/// Zero (or an empty CPU set) means "not set".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// Memory plus swap limit in bytes
    pub mem_swap_limit: i64,
    /// Memory limit in bytes
    pub mem_limit: i64,
    /// Size of `/dev/shm` in bytes
    pub shm_size: i64,
    /// CPU CFS quota
    pub cpu_quota: i64,
    /// Relative CPU weight
    pub cpu_shares: i64,
    /// CPUs the step may run on, e.g. `0-3`
    pub cpu_set: String,
}

impl ResourceLimits {
    /// Returns true if no limit is set
    #[must_use]
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

/// Trait for types that can be validated
#[allow(clippy::missing_errors_doc)]
pub trait Validate {
    /// Type of validation error
    type Error;

    /// Validates this type
    fn validate(&self) -> std::result::Result<(), Self::Error>;
}
