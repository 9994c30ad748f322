//! Container image reference helpers
//!
//! Image names are compared in their normalized form, so `golang`,
//! `library/golang:1.22` and `docker.io/library/golang@sha256:...` all name
//! the same repository.

use once_cell::sync::Lazy;
use regex::Regex;

/// Registry used for references without an explicit domain
pub const DEFAULT_DOMAIN: &str = "docker.io";
const LEGACY_DEFAULT_DOMAIN: &str = "index.docker.io";
const OFFICIAL_REPO_PREFIX: &str = "library/";

static PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*(?:/[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*)*$")
        .expect("valid repository path pattern")
});
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("valid tag pattern"));
static DIGEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9a-fA-F]{32,}$")
        .expect("valid digest pattern")
});
static IMAGE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-f0-9]{64}$").expect("valid image id pattern"));

/// A parsed image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Registry host, possibly with a port
    pub domain: String,
    /// Repository path within the registry
    pub path: String,
    /// Tag, if any
    pub tag: Option<String>,
    /// Content digest, if any
    pub digest: Option<String>,
}

impl ImageRef {
    /// Parses an image reference, returning `None` if it is malformed
    #[must_use]
    pub fn parse(reference: &str) -> Option<Self> {
        if reference.is_empty() || IMAGE_ID_RE.is_match(reference) {
            return None;
        }

        let (name, digest) = match reference.split_once('@') {
            Some((name, digest)) if DIGEST_RE.is_match(digest) => (name, Some(digest.to_string())),
            Some(_) => return None,
            None => (reference, None),
        };

        let (domain, remainder) = split_domain(name);

        let (path, tag) = match remainder.rsplit_once(':') {
            Some((path, tag)) if TAG_RE.is_match(tag) => (path, Some(tag.to_string())),
            Some(_) => return None,
            None => (remainder, None),
        };

        let path = if domain == DEFAULT_DOMAIN && !path.contains('/') {
            format!("{OFFICIAL_REPO_PREFIX}{path}")
        } else {
            path.to_string()
        };

        if !PATH_RE.is_match(&path) {
            return None;
        }

        Some(Self {
            domain,
            path,
            tag,
            digest,
        })
    }

    /// Returns the short name a user would type, without tag or digest
    #[must_use]
    pub fn familiar_name(&self) -> String {
        if self.domain != DEFAULT_DOMAIN {
            return format!("{}/{}", self.domain, self.path);
        }
        match self.path.strip_prefix(OFFICIAL_REPO_PREFIX) {
            Some(short) if !short.contains('/') => short.to_string(),
            _ => self.path.clone(),
        }
    }
}

fn split_domain(name: &str) -> (String, &str) {
    match name.split_once('/') {
        Some((first, rest))
            if first.contains(['.', ':'])
                || first == "localhost"
                || first.to_lowercase() != first =>
        {
            let domain = if first == LEGACY_DEFAULT_DOMAIN {
                DEFAULT_DOMAIN
            } else {
                first
            };
            (domain.to_string(), rest)
        }
        _ => (DEFAULT_DOMAIN.to_string(), name),
    }
}

/// Strips tag and digest from an image reference and returns its familiar
/// name. Malformed references are returned unchanged.
#[must_use]
pub fn trim_image(name: &str) -> String {
    ImageRef::parse(name).map_or_else(|| name.to_string(), |image| image.familiar_name())
}

/// Returns true if `image` names the same repository as any of `candidates`
pub fn match_image<S: AsRef<str>>(image: &str, candidates: &[S]) -> bool {
    let image = trim_image(image);
    candidates
        .iter()
        .any(|candidate| trim_image(candidate.as_ref()) == image)
}

/// Returns true if `image` is pulled from `hostname`.
///
/// `hostname` may be a bare host (`ghcr.io`, `registry:5000`) or a URL, in
/// which case only its host and port are compared.
#[must_use]
pub fn match_hostname(image: &str, hostname: &str) -> bool {
    let Some(image) = ImageRef::parse(image) else {
        return false;
    };
    image.domain == normalize_hostname(hostname)
}

fn normalize_hostname(hostname: &str) -> String {
    let host = if hostname.starts_with("http://") || hostname.starts_with("https://") {
        url::Url::parse(hostname)
            .ok()
            .and_then(|parsed| {
                let host = parsed.host_str()?.to_string();
                Some(match parsed.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host,
                })
            })
            .unwrap_or_else(|| hostname.to_string())
    } else {
        hostname.to_string()
    };
    if host == LEGACY_DEFAULT_DOMAIN {
        DEFAULT_DOMAIN.to_string()
    } else {
        host
    }
}
