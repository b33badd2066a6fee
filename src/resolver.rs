//! Resolver interface for turning an endpoint descriptor into the concrete
//! address used by one attempt.
//!
//! The executor only depends on the `Resolve` trait and calls it once per
//! attempt, never caching across attempts, so a service name can land on a
//! different instance when a retry happens. Literal URLs flow through the
//! same call and resolve to themselves; resolution is never a place where
//! retry behavior may fork on the descriptor kind.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use url::Url;

use crate::endpoint::{Endpoint, Provenance, Target};

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The service name has no registered instances. Fatal, never retried.
    #[error("no instances registered for service `{0}`")]
    NoInstances(String),
    /// An address could not be parsed as an absolute URL.
    #[error("invalid url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Turns an endpoint descriptor into the target for a single attempt.
pub trait Resolve {
    fn resolve(&self, endpoint: &Endpoint) -> Result<Target, ResolveError>;
}

/// Instance pool for one service name. The URL list is immutable after
/// construction; only the rotation cursor moves.
#[derive(Debug)]
struct Pool {
    instances: Vec<Url>,
    cursor: AtomicUsize,
}

/// Resolver over a static instance table (service name -> base URLs), with
/// round-robin rotation across instances. The table is built once from
/// configuration and safe for concurrent reads.
#[derive(Debug, Default)]
pub struct StaticResolver {
    pools: HashMap<String, Pool>,
}

impl StaticResolver {
    /// Builds a resolver from a `service name -> base URLs` table, parsing
    /// every address up front so bad configuration fails before any call.
    pub fn from_table<S: AsRef<str>>(
        table: &HashMap<String, Vec<S>>,
    ) -> Result<Self, ResolveError> {
        let mut pools = HashMap::new();
        for (service, addrs) in table {
            let mut instances = Vec::with_capacity(addrs.len());
            for addr in addrs {
                let url = Url::parse(addr.as_ref()).map_err(|source| ResolveError::InvalidUrl {
                    url: addr.as_ref().to_string(),
                    source,
                })?;
                instances.push(url);
            }
            pools.insert(
                service.clone(),
                Pool {
                    instances,
                    cursor: AtomicUsize::new(0),
                },
            );
        }
        Ok(Self { pools })
    }
}

impl Resolve for StaticResolver {
    fn resolve(&self, endpoint: &Endpoint) -> Result<Target, ResolveError> {
        match endpoint {
            Endpoint::Name(service) => {
                let pool = self
                    .pools
                    .get(service)
                    .filter(|p| !p.instances.is_empty())
                    .ok_or_else(|| ResolveError::NoInstances(service.clone()))?;
                let idx = pool.cursor.fetch_add(1, Ordering::Relaxed) % pool.instances.len();
                Ok(Target {
                    url: pool.instances[idx].clone(),
                    provenance: Provenance::Resolved {
                        service: service.clone(),
                        instance: idx,
                    },
                })
            }
            Endpoint::Url(raw) => {
                let url = Url::parse(raw).map_err(|source| ResolveError::InvalidUrl {
                    url: raw.clone(),
                    source,
                })?;
                Ok(Target {
                    url,
                    provenance: Provenance::Literal,
                })
            }
        }
    }
}
