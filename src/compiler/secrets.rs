//! Secrets available to a compilation
//!
//! A secret is visible to a step only if its filters admit the step.
//! Filters are checked on every use; nothing about visibility is stored on
//! the secret itself.

use super::image::match_image;
use crate::pipeline::Container;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A named secret value with access filters
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Secret {
    /// Secret name, matched case-insensitively
    pub name: String,
    /// Secret value
    pub value: String,
    /// Plugin images allowed to read the secret. When non-empty, only plugin
    /// steps running one of these images may use it.
    pub plugins_only: Vec<String>,
    /// Pipeline events the secret is exposed to; empty means all events
    pub events: Vec<String>,
}

/// Why a secret is hidden from a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretDenial {
    /// The secret is restricted to plugins and the step runs commands
    NotAPlugin,
    /// The step's image is not one of the allowed plugin images
    ImageNotAllowed,
    /// The pipeline event is not one of the allowed events
    EventNotAllowed,
}

impl fmt::Display for SecretDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAPlugin => write!(f, "only plugins may use this secret"),
            Self::ImageNotAllowed => write!(f, "image is not an allowed plugin"),
            Self::EventNotAllowed => write!(f, "pipeline event is not allowed"),
        }
    }
}

impl Secret {
    /// Creates an unrestricted secret
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Restricts the secret to plugin steps running one of `images`
    #[must_use]
    pub fn for_plugins<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plugins_only = images.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts the secret to the given pipeline events
    #[must_use]
    pub fn for_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = events.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the reason the secret is hidden from `container` during a
    /// pipeline triggered by `event`, or `None` if it is available.
    #[must_use]
    pub fn denial(&self, container: &Container, event: Option<&str>) -> Option<SecretDenial> {
        if !self.plugins_only.is_empty() {
            if !container.is_plugin() {
                return Some(SecretDenial::NotAPlugin);
            }
            if !match_image(&container.image, &self.plugins_only) {
                return Some(SecretDenial::ImageNotAllowed);
            }
        }
        if !self.events.is_empty() && !event.is_some_and(|e| self.events.iter().any(|a| a == e)) {
            return Some(SecretDenial::EventNotAllowed);
        }
        None
    }

    /// Returns true if `container` may read the secret
    #[must_use]
    pub fn available(&self, container: &Container, event: Option<&str>) -> bool {
        self.denial(container, event).is_none()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("plugins_only", &self.plugins_only)
            .field("events", &self.events)
            .finish()
    }
}

/// Secrets of a compilation, keyed by lowercased name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecretMap(HashMap<String, Secret>);

impl SecretMap {
    /// Creates an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a secret, replacing any secret with the same name
    pub fn insert(&mut self, secret: Secret) {
        self.0.insert(secret.name.to_lowercase(), secret);
    }

    /// Looks a secret up by name, ignoring case
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Secret> {
        self.0.get(&name.to_lowercase())
    }

    /// Returns the values of all secrets `container` may read, keyed by
    /// lowercased name
    #[must_use]
    pub fn available_values(
        &self,
        container: &Container,
        event: Option<&str>,
    ) -> HashMap<String, String> {
        self.0
            .iter()
            .filter(|(_, secret)| secret.available(container, event))
            .map(|(name, secret)| (name.clone(), secret.value.clone()))
            .collect()
    }

    /// Returns the number of secrets
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no secrets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Secret> for SecretMap {
    fn from_iter<I: IntoIterator<Item = Secret>>(iter: I) -> Self {
        let mut map = Self::new();
        for secret in iter {
            map.insert(secret);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(image: &str) -> Container {
        Container::new("publish", image)
    }

    fn commands(image: &str) -> Container {
        Container::new("build", image).with_commands(["make"])
    }

    #[test]
    fn test_unrestricted_secret_is_available_everywhere() {
        let secret = Secret::new("token", "abc");
        assert!(secret.available(&plugin("plugins/docker"), Some("push")));
        assert!(secret.available(&commands("golang"), None));
    }

    #[test]
    fn test_plugin_restriction() {
        let secret = Secret::new("docker_password", "pw").for_plugins(["plugins/docker"]);

        assert!(secret.available(&plugin("plugins/docker:20"), Some("push")));
        assert_eq!(
            secret.denial(&commands("plugins/docker"), Some("push")),
            Some(SecretDenial::NotAPlugin)
        );
        assert_eq!(
            secret.denial(&plugin("plugins/s3"), Some("push")),
            Some(SecretDenial::ImageNotAllowed)
        );
    }

    #[test]
    fn test_event_restriction() {
        let secret = Secret::new("deploy_key", "k").for_events(["tag", "deployment"]);

        assert!(secret.available(&commands("alpine"), Some("tag")));
        assert_eq!(
            secret.denial(&commands("alpine"), Some("pull_request")),
            Some(SecretDenial::EventNotAllowed)
        );
        assert_eq!(
            secret.denial(&commands("alpine"), None),
            Some(SecretDenial::EventNotAllowed)
        );
    }

    #[test]
    fn test_secret_map_is_case_insensitive() {
        let map: SecretMap = [Secret::new("Docker_Password", "pw")].into_iter().collect();
        assert!(map.get("docker_password").is_some());
        assert!(map.get("DOCKER_PASSWORD").is_some());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_available_values_filters_hidden_secrets() {
        let map: SecretMap = [
            Secret::new("token", "abc"),
            Secret::new("docker_password", "pw").for_plugins(["plugins/docker"]),
        ]
        .into_iter()
        .collect();

        let values = map.available_values(&commands("golang"), Some("push"));
        assert_eq!(values.len(), 1);
        assert_eq!(values["token"], "abc");
    }

    #[test]
    fn test_debug_redacts_value() {
        let debug = format!("{:?}", Secret::new("token", "s3cr3t"));
        assert!(debug.contains("token"));
        assert!(!debug.contains("s3cr3t"));
    }
}
