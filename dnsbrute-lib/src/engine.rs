//! The enumeration engine.
//!
//! This module provides the primary `BruteForcer` struct that drives a run:
//! it admits lookups under the configured concurrency ceiling, spawns one
//! task per candidate name, aggregates classified outcomes, and honors
//! cooperative cancellation.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{Stream, StreamExt};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::collector::ResultCollector;
use crate::error::DnsBruteError;
use crate::resolver::{HickoryClient, HostResolver};
use crate::types::{BruteConfig, ErrorKind, FailedHost, Outcome, ResolvedHost, ResultSet};
use crate::utils::{make_fqdn, normalize_domain, sanitize_labels, validate_domain};

/// Callback invoked once per settled lookup, with the outcome just recorded.
///
/// This is the progress boundary: a consumer may hang a counter or progress
/// bar off it. The engine works identically with no hook installed.
pub type ProgressHook = Arc<dyn Fn(&Outcome) + Send + Sync>;

/// Drives a bounded-concurrency enumeration run.
///
/// The forcer owns the resolver client, the concurrency gate, and the
/// cancellation token for the run. Lookups for all candidate names go through
/// one shared resolver; at most `config.concurrency` are in flight at a time.
///
/// # Example
///
/// ```rust,no_run
/// use dnsbrute_lib::{BruteForcer, BruteConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let forcer = BruteForcer::with_config(BruteConfig::default())?;
///     let labels = vec!["www".to_string(), "mail".to_string()];
///     let results = forcer.run(&labels, "example.com").await?;
///
///     for host in &results.resolved {
///         println!("{} -> {}", host.name, host.joined_addresses());
///     }
///     Ok(())
/// }
/// ```
pub struct BruteForcer {
    /// Configuration settings for this run
    config: BruteConfig,
    /// Shared resolver client all lookup tasks go through
    resolver: Arc<dyn HostResolver>,
    /// Cooperative cancellation for the admission loop
    cancel: CancellationToken,
    /// Optional per-settled-lookup callback
    progress: Option<ProgressHook>,
}

impl BruteForcer {
    /// Create a forcer with default configuration and the system resolver.
    pub fn new() -> Result<Self, DnsBruteError> {
        Self::with_config(BruteConfig::default())
    }

    /// Create a forcer with custom configuration.
    ///
    /// Builds a [`HickoryClient`] from the configuration: explicit
    /// nameservers when given, the system resolver configuration otherwise.
    pub fn with_config(config: BruteConfig) -> Result<Self, DnsBruteError> {
        let resolver = Arc::new(HickoryClient::from_config(&config)?);
        Ok(Self::with_resolver(config, resolver))
    }

    /// Create a forcer with a custom resolver implementation.
    ///
    /// This is the seam tests use to substitute a stub resolver; it is also
    /// how an embedding application supplies its own DNS facility.
    pub fn with_resolver(config: BruteConfig, resolver: Arc<dyn HostResolver>) -> Self {
        Self {
            config,
            resolver,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Install a progress hook invoked once per settled lookup.
    pub fn with_progress_hook(mut self, hook: ProgressHook) -> Self {
        self.progress = Some(hook);
        self
    }

    /// A handle that cancels this forcer's run when triggered.
    ///
    /// On cancellation the run stops admitting new lookups, lets in-flight
    /// lookups drain, and returns the results accumulated so far. A forcer
    /// whose token has fired stays cancelled; build a new one for a new run.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Get the configuration for this forcer.
    pub fn config(&self) -> &BruteConfig {
        &self.config
    }

    /// Enumerate all candidate names formed from `labels` under `domain`.
    ///
    /// Labels are taken in input order; blank and comment entries are
    /// skipped. Each admitted candidate settles with exactly one outcome in
    /// the returned set, in completion order. A failing lookup never aborts
    /// the batch, and an interrupt yields the partial set instead of an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `DnsBruteError` only if `domain` is syntactically invalid.
    pub async fn run(&self, labels: &[String], domain: &str) -> Result<ResultSet, DnsBruteError> {
        validate_domain(domain)?;
        let domain = normalize_domain(domain);
        let labels = sanitize_labels(labels);

        let collector = Arc::new(ResultCollector::new());
        let gate = Arc::new(Semaphore::new(self.config.concurrency));
        let mut lookups: JoinSet<()> = JoinSet::new();
        let started = Instant::now();

        info!(
            domain = %domain,
            candidates = labels.len(),
            concurrency = self.config.concurrency,
            "starting enumeration"
        );

        for label in &labels {
            // Admission: wait for a free slot, unless the run was cancelled
            // in the meantime. The permit travels with the lookup task and is
            // released exactly once, when that task settles.
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    warn!(
                        admitted = lookups.len(),
                        "interrupt received, draining in-flight lookups"
                    );
                    break;
                }
                permit = Arc::clone(&gate).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break, // gate closed, nothing further can be admitted
                },
            };

            let name = make_fqdn(label, &domain);
            let resolver = Arc::clone(&self.resolver);
            let collector = Arc::clone(&collector);
            let progress = self.progress.clone();

            lookups.spawn(async move {
                let outcome = lookup(&*resolver, name).await;
                collector.record(outcome.clone());
                if let Some(hook) = &progress {
                    hook(&outcome);
                }
                drop(permit); // slot freed only after the outcome is recorded
            });
        }

        // Drain: every admitted lookup settles before the run returns.
        while let Some(joined) = lookups.join_next().await {
            if let Err(e) = joined {
                // A crashed task released its permit on drop; the batch goes on.
                error!(error = %e, "lookup task failed to join");
            }
        }

        let results = Arc::try_unwrap(collector)
            .map(ResultCollector::into_results)
            .unwrap_or_else(|shared| shared.snapshot());

        info!(
            resolved = results.resolved.len(),
            failed = results.failed.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "enumeration finished"
        );

        Ok(results)
    }

    /// Enumerate candidates and yield outcomes as a stream, as they settle.
    ///
    /// The same concurrency ceiling applies, enforced by the stream's buffer
    /// rather than the admission gate. This variant does not aggregate and
    /// does not observe the cancellation token; callers stop a run by
    /// dropping the stream. Prefer [`run`](Self::run) when a final
    /// [`ResultSet`] is wanted.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use dnsbrute_lib::BruteForcer;
    /// use futures::StreamExt;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let forcer = BruteForcer::new()?;
    ///     let labels = vec!["www".to_string(), "mail".to_string()];
    ///
    ///     let mut outcomes = forcer.run_stream(&labels, "example.com");
    ///     while let Some(outcome) = outcomes.next().await {
    ///         println!("{} settled", outcome.name());
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn run_stream(
        &self,
        labels: &[String],
        domain: &str,
    ) -> Pin<Box<dyn Stream<Item = Outcome> + Send + '_>> {
        let domain = normalize_domain(domain);
        let names: Vec<String> = sanitize_labels(labels)
            .iter()
            .map(|label| make_fqdn(label, &domain))
            .collect();

        let lookups = names.into_iter().map(move |name| {
            let resolver = Arc::clone(&self.resolver);
            async move { lookup(&*resolver, name).await }
        });

        Box::pin(futures::stream::iter(lookups).buffer_unordered(self.config.concurrency))
    }
}

/// Perform one lookup and map its result into exactly one classified outcome.
async fn lookup(resolver: &dyn HostResolver, name: String) -> Outcome {
    match resolver.resolve(&name).await {
        Ok(addresses) => {
            debug!(name = %name, count = addresses.len(), "resolved");
            Outcome::Resolved(ResolvedHost { name, addresses })
        }
        Err(err) => {
            match err.kind {
                // The bulk of a brute force: names that simply don't exist.
                ErrorKind::NotFound | ErrorKind::NoData => {
                    debug!(name = %name, kind = %err.kind, "lookup failed")
                }
                ErrorKind::Timeout => warn!(name = %name, "lookup timed out"),
                ErrorKind::ServerFailure => {
                    warn!(name = %name, detail = %err.detail, "upstream server failure")
                }
                ErrorKind::Unexpected => {
                    error!(name = %name, detail = %err.detail, "unexpected lookup error")
                }
            }
            Outcome::Failed(FailedHost {
                name,
                kind: err.kind,
                detail: err.detail,
            })
        }
    }
}
