//! Resolver clients for address lookups.
//!
//! This module defines the boundary the enumeration engine depends on: a
//! single async "resolve name to addresses" operation whose failures arrive
//! already classified. The production implementation wraps hickory-resolver;
//! tests substitute their own implementations.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::types::ErrorKind;

/// DNS client implementation
pub mod hickory;

// Re-export commonly used types
pub use hickory::HickoryClient;

/// A lookup failure with its classification and the raw error description.
#[derive(Debug, Clone)]
pub struct LookupError {
    /// Failure classification
    pub kind: ErrorKind,
    /// Raw error description from the underlying resolver
    pub detail: String,
}

impl LookupError {
    /// Create a new classified lookup error.
    pub fn new<D: Into<String>>(kind: ErrorKind, detail: D) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

/// The single operation the engine requires from a DNS resolution facility.
///
/// Implementations own their connection/socket resources and their own
/// timeout; the engine never sees either. Lookups for different names may be
/// issued concurrently against one shared client.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve a hostname to its addresses.
    ///
    /// Returns the addresses in the order the upstream returned them, or a
    /// classified error. A successful lookup always carries at least one
    /// address; "zero records" surfaces as [`ErrorKind::NoData`].
    async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupError>;
}
