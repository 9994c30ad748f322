//! Compilation context
//!
//! Configuration shared by every step of one pipeline compile. It is built
//! once and only read while compiling.

#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use super::registry::Registry;
use super::secrets::{Secret, SecretMap};
use crate::pipeline::ResourceLimits;
use std::collections::HashMap;

/// Pipeline-wide settings applied to every compiled step
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompilationContext {
    pub(crate) prefix: String,
    pub(crate) base: String,
    pub(crate) path: String,
    pub(crate) environment: HashMap<String, String>,
    pub(crate) volumes: Vec<String>,
    pub(crate) networks: Vec<String>,
    pub(crate) escalated: Vec<String>,
    pub(crate) registries: Vec<Registry>,
    pub(crate) limits: ResourceLimits,
    pub(crate) secrets: SecretMap,
    pub(crate) event: Option<String>,
    pub(crate) local: bool,
}

impl CompilationContext {
    /// Creates a new context builder
    pub fn builder() -> CompilationContextBuilder {
        CompilationContextBuilder::new()
    }

    /// Workspace name prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Base path of the workspace
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Path of the repository within the workspace
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name of the workspace network
    pub fn default_network(&self) -> String {
        format!("{}_default", self.prefix)
    }

    /// Workspace volume spec, mounting the workspace volume on the base path
    pub fn workspace_volume(&self) -> String {
        format!("{}_default:{}", self.prefix, self.base)
    }

    /// Global environment
    pub fn environment(&self) -> &HashMap<String, String> {
        &self.environment
    }

    /// Registry credentials in match order
    pub fn registries(&self) -> &[Registry] {
        &self.registries
    }

    /// Default resource limits
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Secrets of the compilation
    pub fn secrets(&self) -> &SecretMap {
        &self.secrets
    }

    /// Event that triggered the pipeline
    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    /// Returns true if steps run directly on the host
    pub fn is_local(&self) -> bool {
        self.local
    }
}

/// Builder for [`CompilationContext`]
#[derive(Debug, Clone, Default)]
pub struct CompilationContextBuilder {
    context: CompilationContext,
}

impl CompilationContextBuilder {
    /// Creates a builder with an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the workspace name prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.context.prefix = prefix.into();
        self
    }

    /// Sets the workspace base path
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.context.base = base.into();
        self
    }

    /// Sets the repository path within the workspace
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.context.path = path.into();
        self
    }

    /// Sets a global environment variable, overriding containers
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.environment.insert(key.into(), value.into());
        self
    }

    /// Adds global environment variables
    pub fn environment(mut self, environment: HashMap<String, String>) -> Self {
        self.context.environment.extend(environment);
        self
    }

    /// Adds a volume mounted into every step
    pub fn volume(mut self, volume: impl Into<String>) -> Self {
        self.context.volumes.push(volume.into());
        self
    }

    /// Adds volumes mounted into every step
    pub fn volumes(mut self, mut volumes: Vec<String>) -> Self {
        self.context.volumes.append(&mut volumes);
        self
    }

    /// Adds a network every step joins
    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.context.networks.push(network.into());
        self
    }

    /// Adds networks every step joins
    pub fn networks(mut self, mut networks: Vec<String>) -> Self {
        self.context.networks.append(&mut networks);
        self
    }

    /// Adds an image whose plugin steps always run privileged
    pub fn escalate(mut self, image: impl Into<String>) -> Self {
        self.context.escalated.push(image.into());
        self
    }

    /// Adds registry credentials; earlier registries take precedence
    pub fn registry(mut self, registry: Registry) -> Self {
        self.context.registries.push(registry);
        self
    }

    /// Adds registry credentials in order
    pub fn registries(mut self, registries: impl IntoIterator<Item = Registry>) -> Self {
        self.context.registries.extend(registries);
        self
    }

    /// Sets default resource limits
    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.context.limits = limits;
        self
    }

    /// Adds a secret
    pub fn secret(mut self, secret: Secret) -> Self {
        self.context.secrets.insert(secret);
        self
    }

    /// Adds secrets
    pub fn secrets(mut self, secrets: impl IntoIterator<Item = Secret>) -> Self {
        for secret in secrets {
            self.context.secrets.insert(secret);
        }
        self
    }

    /// Sets the event that triggered the pipeline
    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.context.event = Some(event.into());
        self
    }

    /// Runs steps on the host instead of in containers
    pub fn local(mut self, local: bool) -> Self {
        self.context.local = local;
        self
    }

    /// Builds the context
    pub fn build(self) -> CompilationContext {
        self.context
    }
}
