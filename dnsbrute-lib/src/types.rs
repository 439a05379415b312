//! Core data types for DNS subdomain enumeration.
//!
//! This module defines all the main data structures used throughout the library,
//! including lookup outcomes, the aggregated result set, and run configuration.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Classification of a failed lookup.
///
/// `NotFound` and `NoData` are expected, high-frequency outcomes of a brute
/// force run and are never treated as alarms. The remaining kinds indicate
/// conditions worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The name does not exist (NXDOMAIN)
    #[serde(rename = "not_found")]
    NotFound,

    /// The query succeeded but returned zero address records
    #[serde(rename = "no_data")]
    NoData,

    /// No response from the upstream server within the deadline
    #[serde(rename = "timeout")]
    Timeout,

    /// The upstream server reported a failure (SERVFAIL)
    #[serde(rename = "server_failure")]
    ServerFailure,

    /// Any error shape the classifier does not recognize
    #[serde(rename = "unexpected")]
    Unexpected,
}

impl ErrorKind {
    /// Whether this kind is an expected, non-actionable brute-force outcome.
    ///
    /// Expected kinds are logged at debug verbosity at most; the rest are
    /// report-worthy.
    pub fn is_expected(&self) -> bool {
        matches!(self, ErrorKind::NotFound | ErrorKind::NoData)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::NoData => write!(f, "no data"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::ServerFailure => write!(f, "server failure"),
            ErrorKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

/// A candidate name that resolved to one or more addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedHost {
    /// The fully qualified name that was looked up (e.g. "www.example.com")
    pub name: String,

    /// Addresses returned by the resolver, in the order they were returned
    pub addresses: Vec<IpAddr>,
}

impl ResolvedHost {
    /// The addresses joined with ", ", the form used in tabular output.
    pub fn joined_addresses(&self) -> String {
        self.addresses
            .iter()
            .map(|ip| ip.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A candidate name whose lookup failed, with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedHost {
    /// The fully qualified name that was looked up
    pub name: String,

    /// Failure classification
    pub kind: ErrorKind,

    /// Raw error description from the resolver
    pub detail: String,
}

/// The classified result of one lookup attempt.
///
/// Exactly one `Outcome` is produced per candidate name that was ever
/// admitted for lookup, regardless of how the lookup ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The name resolved to at least one address
    Resolved(ResolvedHost),

    /// The lookup failed with a classified error
    Failed(FailedHost),
}

impl Outcome {
    /// The candidate name this outcome belongs to.
    pub fn name(&self) -> &str {
        match self {
            Outcome::Resolved(host) => &host.name,
            Outcome::Failed(host) => &host.name,
        }
    }
}

/// Accumulated results of an enumeration run.
///
/// Both sequences reflect completion order, which is nondeterministic under
/// concurrency. The set is append-only while the run is in progress and
/// read-only once it terminates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Names that resolved, with their addresses
    pub resolved: Vec<ResolvedHost>,

    /// Names that failed, with error classification
    pub failed: Vec<FailedHost>,
}

impl ResultSet {
    /// Total number of settled lookups in this set.
    pub fn total(&self) -> usize {
        self.resolved.len() + self.failed.len()
    }

    /// Number of failures of the given kind.
    pub fn failed_count(&self, kind: ErrorKind) -> usize {
        self.failed.iter().filter(|f| f.kind == kind).count()
    }
}

/// Configuration options for an enumeration run.
///
/// Captured once before the run starts and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BruteConfig {
    /// Maximum number of concurrent in-flight lookups
    /// Default: 512
    pub concurrency: usize,

    /// Timeout for each individual lookup
    /// Default: 5 seconds
    #[serde(skip)] // Don't serialize Duration directly
    pub timeout: Duration,

    /// Upstream DNS servers to query (UDP).
    /// Empty means the system resolver configuration is used.
    pub nameservers: Vec<SocketAddr>,
}

impl Default for BruteConfig {
    /// Create a sensible default configuration.
    ///
    /// The concurrency default matches what a brute force against a typical
    /// recursive resolver sustains without being throttled.
    fn default() -> Self {
        Self {
            concurrency: 512,
            timeout: Duration::from_secs(5),
            nameservers: Vec::new(),
        }
    }
}

impl BruteConfig {
    /// Create a new configuration with custom concurrency.
    ///
    /// Automatically clamps the ceiling to 1..=10_000 to keep it a positive,
    /// non-absurd bound.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 10_000);
        self
    }

    /// Set the per-lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set explicit upstream nameservers, replacing the system configuration.
    pub fn with_nameservers(mut self, nameservers: Vec<SocketAddr>) -> Self {
        self.nameservers = nameservers;
        self
    }
}
