//! Configuration management
//!
//! The file form of a [`CompilationContext`]. YAML and JSON files are
//! accepted; the format is picked from the file extension.

use crate::compiler::{CompilationContext, Registry, Secret};
use crate::pipeline::{ResourceLimits, Validate, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config '{path}': {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The YAML document is malformed
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON document is malformed
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration is well-formed but not usable
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

/// Compiler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Workspace name prefix
    pub prefix: String,
    /// Workspace base path
    pub base: String,
    /// Repository path within the workspace
    pub path: String,
    /// Global environment, overriding container values
    pub environment: HashMap<String, String>,
    /// Volumes mounted into every step
    pub volumes: Vec<String>,
    /// Networks every step joins
    pub networks: Vec<String>,
    /// Plugin images that always run privileged
    pub escalate: Vec<String>,
    /// Registry credentials, in match order
    pub registries: Vec<Registry>,
    /// Default resource limits
    pub limits: ResourceLimits,
    /// Secrets
    pub secrets: Vec<Secret>,
    /// Event that triggered the pipeline
    pub event: Option<String>,
    /// Run steps on the host
    pub local: bool,
    /// Log level
    pub log_level: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            prefix: "ci".to_string(),
            base: "/workspace".to_string(),
            path: String::new(),
            environment: HashMap::new(),
            volumes: Vec::new(),
            networks: Vec::new(),
            escalate: vec![
                "plugins/docker".to_string(),
                "plugins/gcr".to_string(),
                "plugins/ecr".to_string(),
            ],
            registries: Vec::new(),
            limits: ResourceLimits::default(),
            secrets: Vec::new(),
            event: None,
            local: false,
            log_level: "info".to_string(),
        }
    }
}

impl Validate for CompilerConfig {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.prefix.is_empty() {
            return Err(ValidationError::EmptyPrefix);
        }
        if !self.base.starts_with('/') {
            return Err(ValidationError::RelativeBase {
                base: self.base.clone(),
            });
        }
        if let Some(index) = self.registries.iter().position(|r| r.hostname.is_empty()) {
            return Err(ValidationError::EmptyRegistryHostname { index });
        }
        if let Some(index) = self.secrets.iter().position(|s| s.name.is_empty()) {
            return Err(ValidationError::EmptySecretName { index });
        }
        Ok(())
    }
}

impl CompilerConfig {
    /// Parses a YAML document
    ///
    /// # Errors
    ///
    /// Fails if the document is not valid YAML for this type.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Parses a JSON document
    ///
    /// # Errors
    ///
    /// Fails if the document is not valid JSON for this type.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Loads a configuration file; `.json` files are read as JSON, anything
    /// else as YAML.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&source)?
        } else {
            Self::from_yaml_str(&source)?
        };
        tracing::debug!(path = %path.display(), "loaded compiler config");
        Ok(config)
    }

    /// Validates the configuration and turns it into a compilation context
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate.
    pub fn into_context(self) -> Result<CompilationContext, ConfigError> {
        self.validate()?;

        let mut builder = CompilationContext::builder()
            .prefix(self.prefix)
            .base(self.base)
            .path(self.path)
            .environment(self.environment)
            .volumes(self.volumes)
            .networks(self.networks)
            .registries(self.registries)
            .limits(self.limits)
            .secrets(self.secrets)
            .local(self.local);
        for image in self.escalate {
            builder = builder.escalate(image);
        }
        if let Some(event) = self.event {
            builder = builder.event(event);
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = CompilerConfig::default();
        assert_eq!(config.prefix, "ci");
        assert_eq!(config.base, "/workspace");
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_config() {
        let yaml = r"
prefix: ci_42
base: /build
path: src/github.com/org/app
environment:
  CI: 'true'
registries:
  - hostname: ghcr.io
    username: bot
    password: token
secrets:
  - name: docker_password
    value: pw
    plugins_only: [plugins/docker]
limits:
  cpu_quota: 200
event: push
";
        let config = CompilerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.prefix, "ci_42");
        assert_eq!(config.registries[0].username, "bot");
        assert_eq!(config.secrets[0].plugins_only, vec!["plugins/docker"]);
        assert_eq!(config.limits.cpu_quota, 200);
        assert_eq!(config.escalate.len(), 3);

        let context = config.into_context().unwrap();
        assert_eq!(context.prefix(), "ci_42");
        assert_eq!(context.event(), Some("push"));
        assert_eq!(context.limits().cpu_quota, 200);
        assert!(context.secrets().get("DOCKER_PASSWORD").is_some());
    }

    #[test]
    fn test_validation() {
        let config = CompilerConfig {
            prefix: String::new(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptyPrefix));

        let config = CompilerConfig {
            base: "workspace".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::RelativeBase { .. })
        ));

        let config = CompilerConfig {
            registries: vec![Registry::new("ghcr.io", "a", "b"), Registry::default()],
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyRegistryHostname { index: 1 })
        );

        let config = CompilerConfig {
            secrets: vec![Secret::new("", "x")],
            ..Default::default()
        };
        assert!(matches!(
            config.into_context(),
            Err(ConfigError::Invalid(ValidationError::EmptySecretName { index: 0 }))
        ));
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"prefix": "from_json", "local": true}}"#).unwrap();
        let config = CompilerConfig::from_file(json.path()).unwrap();
        assert_eq!(config.prefix, "from_json");
        assert!(config.local);

        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "prefix: from_yaml").unwrap();
        let config = CompilerConfig::from_file(yaml.path()).unwrap();
        assert_eq!(config.prefix, "from_yaml");
    }

    #[test]
    fn test_missing_file() {
        let err = CompilerConfig::from_file("/nonexistent/compiler.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/compiler.yaml"));
    }
}
