//! Backend-specific options carried by compiled steps
//!
//! Backends that do not understand an option section ignore it. The
//! Kubernetes section mirrors the subset of the pod spec a step may set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Options for every supported backend
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackendOptions {
    /// Kubernetes pod options
    #[serde(default)]
    pub kubernetes: KubernetesBackendOptions,
}

/// Kubernetes pod options for a single step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubernetesBackendOptions {
    /// Resource requests and limits
    pub resources: Resources,

    /// Service account the pod runs as
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_account_name: String,

    /// Node label selector
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub node_selector: HashMap<String, String>,

    /// Taint tolerations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,

    /// Pod security context. `None` inherits the platform default, which is
    /// not the same as an explicit, empty context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContext>,
}

/// Kubernetes resource requests and limits, keyed by resource name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    /// Requested amounts, e.g. `cpu: 500m`
    pub requests: HashMap<String, String>,
    /// Hard limits, e.g. `memory: 1Gi`
    pub limits: HashMap<String, String>,
}

/// How a toleration matches a taint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TolerationOperator {
    /// Key and value must both match
    #[default]
    Equal,
    /// Only the key must match
    Exists,
}

/// Effect of a taint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaintEffect {
    /// Do not schedule new pods
    NoSchedule,
    /// Avoid scheduling new pods
    PreferNoSchedule,
    /// Evict running pods
    NoExecute,
}

/// A taint toleration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Toleration {
    /// Taint key
    pub key: String,
    /// Match operator
    pub operator: TolerationOperator,
    /// Taint value
    pub value: String,
    /// Matched effect; `None` matches all effects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<TaintEffect>,
    /// Seconds a `NoExecute` taint is tolerated before eviction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toleration_seconds: Option<i64>,
}

/// Pod security context
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityContext {
    /// Run containers privileged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
    /// Refuse to start containers running as root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_non_root: Option<bool>,
    /// UID of the container process
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<i64>,
    /// GID of the container process
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_group: Option<i64>,
    /// Supplementary group owning mounted volumes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fs_group: Option<i64>,
    /// Seccomp profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seccomp_profile: Option<SecProfile>,
    /// AppArmor profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apparmor_profile: Option<SecProfile>,
}

/// Kind of a seccomp or AppArmor profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecProfileType {
    /// Container runtime default profile
    RuntimeDefault,
    /// Profile loaded on the node
    Localhost,
    /// No profile
    Unconfined,
}

/// A seccomp or AppArmor profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecProfile {
    /// Profile kind
    #[serde(rename = "type")]
    pub profile_type: SecProfileType,
    /// Path of a `Localhost` profile on the node
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub localhost_profile: String,
}
