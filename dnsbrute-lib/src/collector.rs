//! Result aggregation for concurrent lookups.
//!
//! The collector is the single mutation point for run state: every settled
//! lookup records exactly one outcome here, and everything else only reads
//! snapshots.

use std::sync::{Mutex, PoisonError};

use crate::types::{Outcome, ResultSet};

/// Append-only store of classified outcomes, shared by all in-flight lookups.
///
/// Both sequences reflect completion order. Interior mutability is limited to
/// the two appends under one lock; snapshots clone the current state so
/// readers never hold the lock across await points.
#[derive(Debug, Default)]
pub struct ResultCollector {
    inner: Mutex<ResultSet>,
}

impl ResultCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one settled outcome.
    ///
    /// Safe to call concurrently from any number of completing lookups.
    pub fn record(&self, outcome: Outcome) {
        let mut set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match outcome {
            Outcome::Resolved(host) => set.resolved.push(host),
            Outcome::Failed(host) => set.failed.push(host),
        }
    }

    /// A point-in-time copy of the accumulated results.
    ///
    /// Usable mid-run (progress reporting) as well as after completion.
    pub fn snapshot(&self) -> ResultSet {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of outcomes recorded so far.
    pub fn settled(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total()
    }

    /// Consume the collector and return the final result set.
    pub fn into_results(self) -> ResultSet {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorKind, FailedHost, ResolvedHost};

    #[test]
    fn test_record_routes_by_tag() {
        let collector = ResultCollector::new();
        collector.record(Outcome::Resolved(ResolvedHost {
            name: "www.example.com".to_string(),
            addresses: vec!["192.0.2.1".parse().unwrap()],
        }));
        collector.record(Outcome::Failed(FailedHost {
            name: "dev.example.com".to_string(),
            kind: ErrorKind::NotFound,
            detail: "nxdomain".to_string(),
        }));

        let set = collector.snapshot();
        assert_eq!(set.resolved.len(), 1);
        assert_eq!(set.failed.len(), 1);
        assert_eq!(set.resolved[0].name, "www.example.com");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let collector = ResultCollector::new();
        let before = collector.snapshot();
        collector.record(Outcome::Failed(FailedHost {
            name: "x.example.com".to_string(),
            kind: ErrorKind::Timeout,
            detail: "deadline elapsed".to_string(),
        }));

        assert_eq!(before.total(), 0);
        assert_eq!(collector.settled(), 1);
    }
}
