//! DNS resolution via hickory-resolver.
//!
//! This module provides the production [`HostResolver`] implementation on top
//! of hickory's async stub resolver, including the mapping from hickory's
//! error shapes to the [`ErrorKind`] taxonomy.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;

use crate::error::DnsBruteError;
use crate::resolver::{HostResolver, LookupError};
use crate::types::ErrorKind;

/// Address-lookup client backed by hickory's `TokioAsyncResolver`.
///
/// The client owns its sockets and connection state; one instance is shared
/// by all concurrent lookup tasks. The per-lookup timeout lives in the
/// resolver options, so callers never wrap lookups in their own deadline.
#[derive(Clone)]
pub struct HickoryClient {
    resolver: TokioAsyncResolver,
}

impl HickoryClient {
    /// Create a client using the system resolver configuration
    /// (/etc/resolv.conf or the platform equivalent).
    pub fn from_system(timeout: Duration) -> Result<Self, DnsBruteError> {
        let (config, mut opts) = hickory_resolver::system_conf::read_system_conf().map_err(|e| {
            DnsBruteError::resolver(format!("failed to read system resolver config: {}", e))
        })?;
        opts.timeout = timeout;
        Ok(Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        })
    }

    /// Create a client that queries the given upstream servers over UDP.
    pub fn with_nameservers(
        nameservers: &[SocketAddr],
        timeout: Duration,
    ) -> Result<Self, DnsBruteError> {
        if nameservers.is_empty() {
            return Err(DnsBruteError::resolver("no nameservers provided"));
        }

        let mut config = ResolverConfig::new();
        for addr in nameservers {
            config.add_name_server(NameServerConfig::new(*addr, Protocol::Udp));
        }

        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;

        Ok(Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        })
    }

    /// Create a client from run configuration: explicit nameservers when
    /// given, the system configuration otherwise.
    pub fn from_config(config: &crate::types::BruteConfig) -> Result<Self, DnsBruteError> {
        if config.nameservers.is_empty() {
            Self::from_system(config.timeout)
        } else {
            Self::with_nameservers(&config.nameservers, config.timeout)
        }
    }
}

#[async_trait]
impl HostResolver for HickoryClient {
    async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupError> {
        let lookup = self
            .resolver
            .lookup_ip(hostname)
            .await
            .map_err(classify)?;

        let addresses: Vec<IpAddr> = lookup.iter().collect();
        if addresses.is_empty() {
            // A lookup that "succeeds" with zero address records is the
            // no-data case, same as a NOERROR/empty answer.
            return Err(LookupError::new(
                ErrorKind::NoData,
                "lookup returned no address records",
            ));
        }

        Ok(addresses)
    }
}

/// Map a hickory resolve error onto the outcome taxonomy.
///
/// NXDOMAIN and empty answers are the bulk of any brute-force run; SERVFAIL
/// and timeouts are transient upstream conditions. Everything else keeps its
/// raw description under `Unexpected` so nothing is silently flattened.
fn classify(err: ResolveError) -> LookupError {
    let detail = err.to_string();
    let kind = match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NXDomain => ErrorKind::NotFound,
            ResponseCode::NoError => ErrorKind::NoData,
            ResponseCode::ServFail => ErrorKind::ServerFailure,
            _ => ErrorKind::Unexpected,
        },
        ResolveErrorKind::Timeout => ErrorKind::Timeout,
        _ => ErrorKind::Unexpected,
    };
    LookupError::new(kind, detail)
}
