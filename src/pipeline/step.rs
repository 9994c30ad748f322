//! Compiled steps
//!
//! A [`Step`] is the backend-agnostic unit of work handed to the scheduler
//! and the execution backends. It no longer references the workflow syntax.

#![allow(clippy::must_use_candidate)]

use super::backend::BackendOptions;
use super::types::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of a compiled step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// Regular step gating the pipeline on its exit code
    Commands,
    /// Background service running alongside the steps
    Service,
}

impl StepType {
    /// Returns true for background services
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service)
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commands => write!(f, "commands"),
            Self::Service => write!(f, "service"),
        }
    }
}

/// An `/etc/hosts` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostAlias {
    /// Host name
    pub name: String,
    /// Address the name resolves to
    pub ip: String,
}

/// A network the step is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conn {
    /// Network name
    pub name: String,
    /// Names the step is reachable under on this network
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// An exposed port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Port number
    pub number: u16,
    /// Protocol, empty when not given
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.protocol.is_empty() {
            write!(f, "{}", self.number)
        } else {
            write!(f, "{}/{}", self.number, self.protocol)
        }
    }
}

/// Image pull credentials
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Auth {
    /// Registry user
    pub username: String,
    /// Registry password
    pub password: String,
}

impl Auth {
    /// Returns true if no credentials were resolved
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A compiled step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Unique, time-ordered identifier
    pub uuid: String,
    /// Step name
    pub name: String,
    /// Step kind
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Image reference
    pub image: String,
    /// Always pull the image
    pub pull: bool,
    /// Runs in the background
    pub detached: bool,
    /// Runs privileged
    pub privileged: bool,
    /// Working directory; empty for detached steps without commands
    pub working_dir: String,
    /// Fully merged environment
    pub environment: HashMap<String, String>,
    /// Shell commands
    pub commands: Vec<String>,
    /// Entrypoint override
    pub entrypoint: Vec<String>,
    /// Extra `/etc/hosts` entries
    pub extra_hosts: Vec<HostAlias>,
    /// Volume specs in mount order
    pub volumes: Vec<String>,
    /// Tmpfs mount points
    pub tmpfs: Vec<String>,
    /// Host devices
    pub devices: Vec<String>,
    /// Attached networks, the workspace network first
    pub networks: Vec<Conn>,
    /// DNS servers
    pub dns: Vec<String>,
    /// DNS search domains
    pub dns_search: Vec<String>,
    /// Memory plus swap limit in bytes
    pub mem_swap_limit: i64,
    /// Memory limit in bytes
    pub mem_limit: i64,
    /// `/dev/shm` size in bytes
    pub shm_size: i64,
    /// CPU CFS quota
    pub cpu_quota: i64,
    /// Relative CPU weight
    pub cpu_shares: i64,
    /// Allowed CPUs
    pub cpu_set: String,
    /// Pull credentials
    pub auth_config: Auth,
    /// Run while the pipeline is successful
    pub on_success: bool,
    /// Run once the pipeline has failed
    pub on_failure: bool,
    /// Failure policy
    pub failure: FailurePolicy,
    /// Network mode
    pub network_mode: String,
    /// Exposed ports
    pub ports: Vec<Port>,
    /// Backend-specific options
    pub backend_options: BackendOptions,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}): {}", self.step_type, self.name, self.image)
    }
}
