// dnsbrute-lib/tests/integration.rs

//! Integration tests for the enumeration engine, driven by a stub resolver.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use dnsbrute_lib::{
    BruteConfig, BruteForcer, ErrorKind, HostResolver, LookupError, Outcome, ResultCollector,
};

/// Scripted resolver: resolves the names in `hits`, fails everything else
/// with `miss_kind`. Tracks in-flight lookups so tests can assert the
/// concurrency ceiling.
struct StubResolver {
    hits: HashMap<String, Vec<IpAddr>>,
    miss_kind: ErrorKind,
    delay: Duration,
    inflight: AtomicUsize,
    max_inflight: AtomicUsize,
    calls: AtomicUsize,
}

impl StubResolver {
    fn new(miss_kind: ErrorKind, delay: Duration) -> Self {
        Self {
            hits: HashMap::new(),
            miss_kind,
            delay,
            inflight: AtomicUsize::new(0),
            max_inflight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    fn with_hit(mut self, name: &str, addresses: &[&str]) -> Self {
        self.hits.insert(
            name.to_string(),
            addresses.iter().map(|a| a.parse().unwrap()).collect(),
        );
        self
    }

    fn max_seen(&self) -> usize {
        self.max_inflight.load(Ordering::SeqCst)
    }

    fn admitted(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostResolver for StubResolver {
    async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.inflight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_inflight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.inflight.fetch_sub(1, Ordering::SeqCst);

        match self.hits.get(hostname) {
            Some(addresses) => Ok(addresses.clone()),
            None => Err(LookupError::new(self.miss_kind, "name does not exist")),
        }
    }
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// The canonical five-candidate scenario: one hit, four not-found.
#[tokio::test]
async fn test_single_hit_among_not_founds() {
    let resolver = Arc::new(
        StubResolver::new(ErrorKind::NotFound, Duration::ZERO)
            .with_hit("a.test.local", &["10.0.0.1"]),
    );
    let forcer = BruteForcer::with_resolver(BruteConfig::default(), resolver.clone());

    let results = forcer
        .run(&labels(&["a", "b", "c", "d", "e"]), "test.local")
        .await
        .unwrap();

    assert_eq!(results.resolved.len(), 1);
    assert_eq!(results.resolved[0].name, "a.test.local");
    assert_eq!(
        results.resolved[0].addresses,
        vec!["10.0.0.1".parse::<IpAddr>().unwrap()]
    );

    assert_eq!(results.failed.len(), 4);
    for failure in &results.failed {
        assert_eq!(failure.kind, ErrorKind::NotFound);
    }
}

/// The number of concurrently in-flight lookups never exceeds the ceiling.
#[tokio::test]
async fn test_concurrency_ceiling_never_exceeded() {
    let resolver = Arc::new(StubResolver::new(
        ErrorKind::NotFound,
        Duration::from_millis(5),
    ));
    let config = BruteConfig::default().with_concurrency(8);
    let forcer = BruteForcer::with_resolver(config, resolver.clone());

    let names: Vec<String> = (0..100).map(|i| format!("host{}", i)).collect();
    let results = forcer.run(&names, "test.local").await.unwrap();

    assert_eq!(results.total(), 100);
    assert!(
        resolver.max_seen() <= 8,
        "ceiling violated: saw {} in-flight lookups",
        resolver.max_seen()
    );
    // The load is wide enough that the ceiling should actually be reached.
    assert!(resolver.max_seen() >= 2);
}

/// A ceiling of one degrades to fully sequential execution, and no candidate
/// is ever skipped.
#[tokio::test]
async fn test_ceiling_of_one_is_sequential() {
    let resolver = Arc::new(StubResolver::new(
        ErrorKind::NotFound,
        Duration::from_millis(2),
    ));
    let config = BruteConfig::default().with_concurrency(1);
    let forcer = BruteForcer::with_resolver(config, resolver.clone());

    let results = forcer
        .run(&labels(&["a", "b", "c", "d", "e"]), "test.local")
        .await
        .unwrap();

    assert_eq!(resolver.max_seen(), 1);
    assert_eq!(results.total(), 5);
    assert_eq!(resolver.admitted(), 5);
}

/// Exactly one outcome per admitted candidate: no loss, no duplication.
#[tokio::test]
async fn test_exactly_one_outcome_per_candidate() {
    let resolver = Arc::new(
        StubResolver::new(ErrorKind::NotFound, Duration::from_millis(1))
            .with_hit("host3.test.local", &["192.0.2.3"])
            .with_hit("host7.test.local", &["192.0.2.7", "192.0.2.8"]),
    );
    let config = BruteConfig::default().with_concurrency(4);
    let forcer = BruteForcer::with_resolver(config, resolver.clone());

    let names: Vec<String> = (0..20).map(|i| format!("host{}", i)).collect();
    let results = forcer.run(&names, "test.local").await.unwrap();

    assert_eq!(results.total(), 20);

    let mut seen = HashSet::new();
    for host in &results.resolved {
        assert!(seen.insert(host.name.clone()), "duplicate {}", host.name);
    }
    for host in &results.failed {
        assert!(seen.insert(host.name.clone()), "duplicate {}", host.name);
    }

    let expected: HashSet<String> = (0..20).map(|i| format!("host{}.test.local", i)).collect();
    assert_eq!(seen, expected);
}

/// Mixed failure kinds are all recorded and countable in aggregate.
#[tokio::test]
async fn test_failure_kinds_are_aggregated() {
    struct KindedResolver;

    #[async_trait]
    impl HostResolver for KindedResolver {
        async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupError> {
            match hostname.split('.').next().unwrap_or_default() {
                "up" => Ok(vec!["198.51.100.1".parse().unwrap()]),
                "empty" => Err(LookupError::new(ErrorKind::NoData, "no address records")),
                "slow" => Err(LookupError::new(ErrorKind::Timeout, "deadline elapsed")),
                "broken" => Err(LookupError::new(ErrorKind::ServerFailure, "SERVFAIL")),
                "odd" => Err(LookupError::new(ErrorKind::Unexpected, "garbled response")),
                _ => Err(LookupError::new(ErrorKind::NotFound, "nxdomain")),
            }
        }
    }

    let forcer = BruteForcer::with_resolver(BruteConfig::default(), Arc::new(KindedResolver));
    let results = forcer
        .run(
            &labels(&["up", "empty", "slow", "broken", "odd", "gone"]),
            "test.local",
        )
        .await
        .unwrap();

    assert_eq!(results.resolved.len(), 1);
    assert_eq!(results.failed_count(ErrorKind::NoData), 1);
    assert_eq!(results.failed_count(ErrorKind::Timeout), 1);
    assert_eq!(results.failed_count(ErrorKind::ServerFailure), 1);
    assert_eq!(results.failed_count(ErrorKind::Unexpected), 1);
    assert_eq!(results.failed_count(ErrorKind::NotFound), 1);

    // Unexpected failures keep their raw detail.
    let odd = results
        .failed
        .iter()
        .find(|f| f.kind == ErrorKind::Unexpected)
        .unwrap();
    assert_eq!(odd.detail, "garbled response");
}

/// Cancelling mid-run returns a consistent partial result set: every admitted
/// candidate settles, nothing past the interrupt is admitted, and the run
/// returns instead of raising.
#[tokio::test]
async fn test_cancel_mid_run_yields_partial_results() {
    let resolver = Arc::new(StubResolver::new(
        ErrorKind::NotFound,
        Duration::from_millis(20),
    ));
    let config = BruteConfig::default().with_concurrency(2);
    let forcer = BruteForcer::with_resolver(config, resolver.clone());
    let token = forcer.cancel_token();

    let names: Vec<String> = (0..100).map(|i| format!("host{}", i)).collect();
    let handle = tokio::spawn(async move { forcer.run(&names, "test.local").await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();

    let results = handle.await.unwrap().unwrap();

    // Partial: far fewer than the full candidate list at this pace.
    assert!(results.total() < 100);
    // Consistent: exactly the admitted lookups settled, no more, no less.
    assert_eq!(results.total(), resolver.admitted());
}

/// A run whose every lookup fails still completes and keeps going after each
/// failure.
#[tokio::test]
async fn test_failures_never_abort_the_batch() {
    let resolver = Arc::new(StubResolver::new(ErrorKind::Unexpected, Duration::ZERO));
    let forcer = BruteForcer::with_resolver(BruteConfig::default(), resolver.clone());

    let names: Vec<String> = (0..50).map(|i| format!("host{}", i)).collect();
    let results = forcer.run(&names, "test.local").await.unwrap();

    assert_eq!(results.resolved.len(), 0);
    assert_eq!(results.failed.len(), 50);
}

/// The progress hook fires exactly once per settled lookup.
#[tokio::test]
async fn test_progress_hook_fires_once_per_lookup() {
    let resolver = Arc::new(StubResolver::new(
        ErrorKind::NotFound,
        Duration::from_millis(1),
    ));
    let settled = Arc::new(AtomicUsize::new(0));
    let counter = settled.clone();

    let forcer = BruteForcer::with_resolver(
        BruteConfig::default().with_concurrency(4),
        resolver.clone(),
    )
    .with_progress_hook(Arc::new(move |_outcome: &Outcome| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let names: Vec<String> = (0..30).map(|i| format!("host{}", i)).collect();
    let results = forcer.run(&names, "test.local").await.unwrap();

    assert_eq!(results.total(), 30);
    assert_eq!(settled.load(Ordering::SeqCst), 30);
}

/// The streaming variant yields exactly one outcome per candidate, bounded
/// by the same ceiling.
#[tokio::test]
async fn test_run_stream_yields_every_candidate() {
    use futures::StreamExt;

    let resolver = Arc::new(
        StubResolver::new(ErrorKind::NotFound, Duration::from_millis(1))
            .with_hit("a.test.local", &["10.0.0.9"]),
    );
    let forcer = BruteForcer::with_resolver(
        BruteConfig::default().with_concurrency(4),
        resolver.clone(),
    );

    let names = labels(&["a", "b", "c", "d", "e", "f"]);
    let outcomes: Vec<Outcome> = forcer.run_stream(&names, "test.local").collect().await;

    assert_eq!(outcomes.len(), 6);
    let resolved = outcomes
        .iter()
        .filter(|o| matches!(o, Outcome::Resolved(_)))
        .count();
    assert_eq!(resolved, 1);
    assert!(resolver.max_seen() <= 4);
}

/// An invalid target domain is rejected before any lookup is admitted.
#[tokio::test]
async fn test_invalid_domain_is_rejected() {
    let resolver = Arc::new(StubResolver::new(ErrorKind::NotFound, Duration::ZERO));
    let forcer = BruteForcer::with_resolver(BruteConfig::default(), resolver.clone());

    let result = forcer.run(&labels(&["www"]), "not a domain").await;
    assert!(result.is_err());
    assert_eq!(resolver.admitted(), 0);
}

/// Snapshots taken while lookups are still recording stay internally
/// consistent and never exceed the final total.
#[tokio::test]
async fn test_collector_snapshot_mid_run() {
    let collector = Arc::new(ResultCollector::new());

    let mut writers = Vec::new();
    for i in 0..10 {
        let collector = collector.clone();
        writers.push(tokio::spawn(async move {
            for j in 0..20 {
                collector.record(Outcome::Failed(dnsbrute_lib::FailedHost {
                    name: format!("w{}-{}.test.local", i, j),
                    kind: ErrorKind::NotFound,
                    detail: "nxdomain".to_string(),
                }));
                tokio::task::yield_now().await;
            }
        }));
    }

    // Interleave snapshots with the writers.
    for _ in 0..10 {
        let snapshot = collector.snapshot();
        assert!(snapshot.total() <= 200);
        tokio::task::yield_now().await;
    }

    for writer in writers {
        writer.await.unwrap();
    }

    assert_eq!(collector.snapshot().total(), 200);
}
