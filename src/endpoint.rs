//! Call target descriptors and the concrete address used for one attempt.

use url::Url;

/// How a call target is specified: by logical service name (resolved to an
/// instance at call time) or as a literal absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Logical service name; an instance is picked from the registered pool
    /// on every attempt.
    Name(String),
    /// Fixed absolute URL, used as-is on every attempt.
    Url(String),
}

impl Endpoint {
    pub fn name(service: impl Into<String>) -> Self {
        Endpoint::Name(service.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        Endpoint::Url(url.into())
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Name(s) => write!(f, "name:{}", s),
            Endpoint::Url(s) => write!(f, "url:{}", s),
        }
    }
}

/// Where a resolved address came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Picked from the instance pool registered under a service name.
    Resolved { service: String, instance: usize },
    /// Supplied directly as a literal URL.
    Literal,
}

/// Concrete base address for a single attempt. Recreated on every attempt so
/// a service name can map to a different instance across retries.
#[derive(Debug, Clone)]
pub struct Target {
    pub url: Url,
    pub provenance: Provenance,
}

impl Target {
    /// Full request URL for this attempt: the template path appended to the
    /// target's base path. An empty template path leaves the base untouched
    /// (literal URLs may already carry their path).
    pub fn request_url(&self, path: &str) -> Url {
        if path.is_empty() {
            return self.url.clone();
        }
        let mut url = self.url.clone();
        let joined = format!(
            "{}/{}",
            self.url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }
}
