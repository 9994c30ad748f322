//! Pipeline domain types
//!
//! Containers are what the workflow author declared; steps are what the
//! compiler hands to the scheduler and the backends.

pub mod backend;
pub mod container;
pub mod errors;
pub mod step;
pub mod types;
pub mod when;

pub use backend::{
    BackendOptions, KubernetesBackendOptions, Resources, SecProfile, SecProfileType,
    SecurityContext, TaintEffect, Toleration, TolerationOperator,
};
pub use container::{
    Container, ContainerBackendOptions, KubernetesOptions, ResourceRequirements, SecProfileSpec,
    SecretRequest, SecurityContextSpec, TolerationSpec,
};
pub use errors::{CompileError, SettingsError, ValidationError};
pub use step::{Auth, Conn, HostAlias, Port, Step, StepType};
pub use types::{FailurePolicy, ResourceLimits, Validate};
pub use when::{Constraint, ConstraintList, When};
