//! Step compiler
//!
//! Turns one [`Container`] into one [`Step`]. Compilation reads the
//! [`CompilationContext`] captured at construction and nothing else; it
//! performs no I/O and never mutates its inputs, so a single [`Compiler`]
//! may compile the containers of a pipeline from several threads.

pub mod backend;
pub mod context;
pub mod ids;
pub mod image;
pub mod limits;
pub mod parse;
pub mod registry;
pub mod secrets;
pub mod settings;
pub mod workspace;

pub use backend::{convert_backend_options, convert_kubernetes_options};
pub use context::{CompilationContext, CompilationContextBuilder};
pub use ids::{IdGenerator, SequentialIds, UuidV7Ids};
pub use image::{match_hostname, match_image, trim_image};
pub use limits::merge_limits;
pub use parse::{parse_extra_host, parse_port};
pub use registry::{Registry, resolve_auth};
pub use secrets::{Secret, SecretDenial, SecretMap};
pub use settings::params_to_env;

use crate::pipeline::{CompileError, Conn, Container, Step, StepType};
use std::sync::Arc;

/// Variable holding the workspace path inside a step
pub const WORKSPACE_ENV: &str = "CI_WORKSPACE";

/// Compiles containers into steps
#[derive(Debug, Clone)]
pub struct Compiler {
    context: CompilationContext,
    ids: Arc<dyn IdGenerator>,
}

impl Compiler {
    /// Creates a compiler issuing UUID v7 step identifiers
    #[must_use]
    pub fn new(context: CompilationContext) -> Self {
        Self {
            context,
            ids: Arc::new(UuidV7Ids),
        }
    }

    /// Replaces the identifier source
    #[must_use]
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Returns the compilation context
    #[must_use]
    pub fn context(&self) -> &CompilationContext {
        &self.context
    }

    /// Compiles a container into a step.
    ///
    /// # Errors
    ///
    /// Fails on a malformed extra host or port, on a requested secret that
    /// is missing or hidden from the step, and on settings that cannot be
    /// turned into environment variables.
    pub fn compile(&self, container: &Container, step_type: StepType) -> Result<Step, CompileError> {
        let span = tracing::debug_span!("compile_step", step = %container.name, kind = %step_type);
        let _enter = span.enter();

        let ctx = &self.context;
        let uuid = self.ids.next_id();

        let mut networks = vec![Conn {
            name: ctx.default_network(),
            aliases: vec![container.name.clone()],
        }];
        networks.extend(ctx.networks.iter().map(|name| Conn {
            name: name.clone(),
            aliases: Vec::new(),
        }));

        let extra_hosts = container
            .extra_hosts
            .iter()
            .map(|host| parse_extra_host(host))
            .collect::<Result<Vec<_>, _>>()?;

        let mut volumes = Vec::with_capacity(1 + ctx.volumes.len() + container.volumes.len());
        if !ctx.local {
            volumes.push(ctx.workspace_volume());
        }
        volumes.extend(ctx.volumes.iter().cloned());
        volumes.extend(container.volumes.iter().cloned());

        let mut environment = container.environment.clone();
        environment.extend(
            ctx.environment
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        environment.insert(
            WORKSPACE_ENV.to_string(),
            workspace::join(&[&ctx.base, &ctx.path]),
        );

        let detached = step_type.is_service() || container.detached;

        let working_dir = if !detached || !container.commands.is_empty() {
            self.step_workdir(container)
        } else {
            String::new()
        };

        if !detached {
            let available = ctx.secrets.available_values(container, ctx.event());
            params_to_env(&container.settings, &mut environment, &available)?;
        }

        let mut privileged = container.privileged;
        if !privileged && container.is_plugin() && match_image(&container.image, &ctx.escalated) {
            tracing::info!(image = %container.image, "running plugin step privileged");
            privileged = true;
        }

        let auth_config = resolve_auth(&container.image, &ctx.registries);

        for requested in &container.secrets {
            let Some(secret) = ctx.secrets.get(&requested.source) else {
                tracing::debug!(secret = %requested.source, "requested secret does not exist");
                return Err(CompileError::SecretNotFound {
                    name: requested.source.clone(),
                });
            };
            if let Some(reason) = secret.denial(container, ctx.event()) {
                tracing::debug!(secret = %requested.source, %reason, "requested secret is hidden from step");
                return Err(CompileError::SecretNotFound {
                    name: requested.source.clone(),
                });
            }
            environment.insert(requested.target.to_uppercase(), secret.value.clone());
        }

        let backend_options = convert_backend_options(&container.backend_options);

        let limits = merge_limits(&ctx.limits, &container.limits);

        let ports = container
            .ports
            .iter()
            .map(|port| parse_port(port))
            .collect::<Result<Vec<_>, _>>()?;

        let on_success = container.when.includes_status_success();
        let on_failure = container.when.includes_status_failure();

        let failure = container.failure.unwrap_or_default();

        let step = Step {
            uuid,
            name: container.name.clone(),
            step_type,
            image: container.image.clone(),
            pull: container.pull,
            detached,
            privileged,
            working_dir,
            environment,
            commands: container.commands.clone(),
            entrypoint: container.entrypoint.clone(),
            extra_hosts,
            volumes,
            tmpfs: container.tmpfs.clone(),
            devices: container.devices.clone(),
            networks,
            dns: container.dns.clone(),
            dns_search: container.dns_search.clone(),
            mem_swap_limit: limits.mem_swap_limit,
            mem_limit: limits.mem_limit,
            shm_size: limits.shm_size,
            cpu_quota: limits.cpu_quota,
            cpu_shares: limits.cpu_shares,
            cpu_set: limits.cpu_set,
            auth_config,
            on_success,
            on_failure,
            failure,
            network_mode: container.network_mode.clone(),
            ports,
            backend_options,
        };

        tracing::debug!(%step, uuid = %step.uuid, detached, privileged, "compiled step");
        Ok(step)
    }

    /// Compiles containers in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`Compiler::compile`]; no steps are
    /// returned in that case.
    pub fn compile_all(
        &self,
        containers: &[Container],
        step_type: StepType,
    ) -> Result<Vec<Step>, CompileError> {
        containers
            .iter()
            .map(|container| self.compile(container, step_type))
            .collect()
    }

    fn step_workdir(&self, container: &Container) -> String {
        if workspace::is_abs(&container.directory) {
            return container.directory.clone();
        }
        workspace::join(&[&self.context.base, &self.context.path, &container.directory])
    }
}
