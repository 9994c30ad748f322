//! Registry credential matching

use super::image::match_hostname;
use crate::pipeline::Auth;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pull credentials for a container registry
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    /// Registry host, e.g. `ghcr.io`, or its URL
    pub hostname: String,
    /// User name
    pub username: String,
    /// Password or token
    pub password: String,
}

impl Registry {
    /// Creates registry credentials
    #[must_use]
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns true if `image` is pulled from this registry
    #[must_use]
    pub fn matches(&self, image: &str) -> bool {
        match_hostname(image, &self.hostname)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Returns the credentials of the first registry serving `image`, or empty
/// credentials if none does.
#[must_use]
pub fn resolve_auth(image: &str, registries: &[Registry]) -> Auth {
    registries
        .iter()
        .find(|registry| registry.matches(image))
        .map(|registry| Auth {
            username: registry.username.clone(),
            password: registry.password.clone(),
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let registries = [
            Registry::new("ghcr.io", "first", "one"),
            Registry::new("https://ghcr.io", "second", "two"),
        ];
        let auth = resolve_auth("ghcr.io/org/app:1.0", &registries);
        assert_eq!(auth.username, "first");
        assert_eq!(auth.password, "one");
    }

    #[test]
    fn test_skips_other_registries() {
        let registries = [
            Registry::new("quay.io", "quay", "q"),
            Registry::new("docker.io", "hub", "h"),
        ];
        let auth = resolve_auth("golang:1.22", &registries);
        assert_eq!(auth.username, "hub");
    }

    #[test]
    fn test_no_match_is_empty() {
        let registries = [Registry::new("quay.io", "quay", "q")];
        assert!(resolve_auth("ghcr.io/org/app", &registries).is_empty());
        assert!(resolve_auth("ghcr.io/org/app", &[]).is_empty());
    }
}
