//! Container definitions: the compiler's input
//!
//! A container is one declared step or service of a workflow, as produced by
//! the workflow parser. The compiler only reads it.

#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use super::backend::{SecProfileType, TaintEffect, TolerationOperator};
use super::types::{FailurePolicy, ResourceLimits};
use super::when::When;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// One declared step or service of a workflow
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    /// Step name
    pub name: String,
    /// Image reference
    pub image: String,
    /// Always pull the image
    pub pull: bool,
    /// Run privileged
    pub privileged: bool,
    /// Working directory, absolute or relative to the workspace
    pub directory: String,
    /// Entrypoint override
    pub entrypoint: Vec<String>,
    /// Shell commands
    pub commands: Vec<String>,
    /// Declared environment
    pub environment: HashMap<String, String>,
    /// Volume specs, e.g. `cache:/cache`
    pub volumes: Vec<String>,
    /// Extra `/etc/hosts` entries as `name:ip`
    pub extra_hosts: Vec<String>,
    /// Tmpfs mount points
    pub tmpfs: Vec<String>,
    /// Host devices
    pub devices: Vec<String>,
    /// DNS servers
    pub dns: Vec<String>,
    /// DNS search domains
    pub dns_search: Vec<String>,
    /// Network mode, e.g. `host`
    pub network_mode: String,
    /// Exposed ports as `number[/protocol]`
    pub ports: Vec<String>,
    /// Run in the background
    pub detached: bool,
    /// Plugin parameters
    pub settings: BTreeMap<String, Value>,
    /// Secrets exposed as environment variables
    pub secrets: Vec<SecretRequest>,
    /// Resource limits
    #[serde(flatten)]
    pub limits: ResourceLimits,
    /// Backend-specific options
    pub backend_options: ContainerBackendOptions,
    /// Execution constraints
    pub when: When,
    /// Failure policy; `None` means fail the pipeline
    pub failure: Option<FailurePolicy>,
}

impl Container {
    /// Creates a container with a name and image
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            ..Default::default()
        }
    }

    /// Adds commands
    pub fn with_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.extend(commands.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Sets a plugin setting
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Requests a secret under a target variable name
    pub fn with_secret(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.secrets.push(SecretRequest {
            source: source.into(),
            target: target.into(),
        });
        self
    }

    /// Returns true if the container is a plugin: it runs the image's own
    /// entrypoint, driven by settings, instead of shell commands.
    pub fn is_plugin(&self) -> bool {
        self.commands.is_empty() && self.entrypoint.is_empty()
    }
}

/// A secret requested by a container.
///
/// Deserializes from a plain name (`token`, target `TOKEN`) or from a map
/// with `source` and `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SecretRequestForm")]
pub struct SecretRequest {
    /// Name of the configured secret
    pub source: String,
    /// Environment variable that receives the value
    pub target: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SecretRequestForm {
    Name(String),
    Mapping { source: String, target: String },
}

impl From<SecretRequestForm> for SecretRequest {
    fn from(form: SecretRequestForm) -> Self {
        match form {
            SecretRequestForm::Name(name) => Self {
                source: name.clone(),
                target: name,
            },
            SecretRequestForm::Mapping { source, target } => Self { source, target },
        }
    }
}

/// Backend-specific options as declared on a container
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerBackendOptions {
    /// Kubernetes options
    pub kubernetes: KubernetesOptions,
}

/// Kubernetes options as declared on a container
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubernetesOptions {
    /// Resource requests and limits
    pub resources: ResourceRequirements,
    /// Service account name
    pub service_account_name: String,
    /// Node label selector
    pub node_selector: HashMap<String, String>,
    /// Taint tolerations
    pub tolerations: Vec<TolerationSpec>,
    /// Security context
    pub security_context: Option<SecurityContextSpec>,
}

/// Declared Kubernetes resource requests and limits
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRequirements {
    /// Requested amounts
    pub requests: HashMap<String, String>,
    /// Hard limits
    pub limits: HashMap<String, String>,
}

/// Declared taint toleration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TolerationSpec {
    /// Taint key
    pub key: String,
    /// Match operator
    pub operator: TolerationOperator,
    /// Taint value
    pub value: String,
    /// Matched effect
    pub effect: Option<TaintEffect>,
    /// Seconds the taint is tolerated
    pub toleration_seconds: Option<i64>,
}

/// Declared pod security context
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityContextSpec {
    /// Run privileged
    pub privileged: Option<bool>,
    /// Refuse to run as root
    pub run_as_non_root: Option<bool>,
    /// Process UID
    pub run_as_user: Option<i64>,
    /// Process GID
    pub run_as_group: Option<i64>,
    /// Volume group
    pub fs_group: Option<i64>,
    /// Seccomp profile
    pub seccomp_profile: Option<SecProfileSpec>,
    /// AppArmor profile
    pub apparmor_profile: Option<SecProfileSpec>,
}

/// Declared seccomp or AppArmor profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecProfileSpec {
    /// Profile kind
    #[serde(rename = "type")]
    pub profile_type: SecProfileType,
    /// Node-local profile path
    #[serde(default)]
    pub localhost_profile: String,
}
