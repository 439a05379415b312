//! Console display for the dnsbrute CLI.
//!
//! This module handles all human-facing output: msfconsole-style status
//! lines, live hit lines, the stderr progress counter, and the run summary.
//! Uses only the `console` crate. Structured output (JSON/CSV) lives in
//! `main.rs`; nothing here ever writes to a report destination.

use console::{pad_str, style, Alignment, Term};
use dnsbrute_lib::{ErrorKind, FailedHost, ResolvedHost, ResultSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// ── Status lines ─────────────────────────────────────────────────────────────

/// `[*]` informational status line, to stderr.
pub fn info(message: &str) {
    eprintln!("{} {}", style("[*]").blue().bold(), message);
}

/// `[!]` warning status line, to stderr.
pub fn warn(message: &str) {
    eprintln!("{} {}", style("[!]").yellow().bold(), message);
}

/// `[-]` error status line, to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", style("[-]").red().bold(), message);
}

// ── Live results ─────────────────────────────────────────────────────────────

/// Print one resolved hit as it completes: `[+] name  addresses`.
pub fn print_hit(host: &ResolvedHost) {
    let padded = pad_str(&host.name, 30, Alignment::Left, None);
    println!(
        "{} {}\t{}",
        style("[+]").green().bold(),
        padded,
        host.joined_addresses()
    );
}

/// Print one report-worthy failure (timeouts, server failures, unexpected).
///
/// Expected not-found/no-data outcomes are never printed here; they would
/// drown everything else on a typical run.
pub fn print_failure(host: &FailedHost) {
    match host.kind {
        ErrorKind::Timeout => warn(&format!("Timeout for {}", host.name)),
        ErrorKind::ServerFailure => warn(&format!("Server failure for {}", host.name)),
        ErrorKind::Unexpected => error(&format!(
            "{} generated an unexpected error: {}",
            host.name, host.detail
        )),
        ErrorKind::NotFound | ErrorKind::NoData => {}
    }
}

// ── Progress counter ─────────────────────────────────────────────────────────

/// A `done/total` counter on stderr, rewritten in place per settled lookup.
///
/// Stays silent when stderr is not a terminal or when disabled, so the
/// display collaborator can be entirely absent.
pub struct Progress {
    term: Term,
    total: usize,
    done: AtomicUsize,
    enabled: bool,
}

impl Progress {
    /// Create a counter for `total` lookups.
    pub fn new(total: usize, enabled: bool) -> Self {
        let term = Term::stderr();
        let enabled = enabled && term.is_term();
        Self {
            term,
            total,
            done: AtomicUsize::new(0),
            enabled,
        }
    }

    /// Mark one lookup settled and redraw the counter line.
    pub fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if !self.enabled {
            return;
        }
        let _ = self.term.clear_line();
        let _ = self.term.write_str(&format!(
            "{} {}/{} checked",
            style("[*]").blue().bold(),
            done,
            self.total
        ));
    }

    /// Clear the counter line before final output.
    pub fn finish(&self) {
        if self.enabled {
            let _ = self.term.clear_line();
        }
    }
}

// ── Header & summary ─────────────────────────────────────────────────────────

/// Print the run header.
pub fn print_header(domain: &str, total: usize, concurrency: usize) {
    info(&format!(
        "Starting {} DNS lookups for {} (concurrency {})...",
        total, domain, concurrency
    ));
}

/// Print the final run summary with per-kind failure counts.
pub fn print_summary(results: &ResultSet, elapsed: Duration, interrupted: bool) {
    if interrupted {
        warn("Run interrupted; results below are partial.");
    }

    info(&format!(
        "Completed, {} subdomains found ({} lookups in {:.1}s).",
        style(results.resolved.len()).green().bold(),
        results.total(),
        elapsed.as_secs_f64()
    ));

    let not_found = results.failed_count(ErrorKind::NotFound);
    let no_data = results.failed_count(ErrorKind::NoData);
    if not_found + no_data > 0 {
        info(&format!(
            "{}",
            style(format!(
                "{} names did not exist, {} had no address records",
                not_found, no_data
            ))
            .dim()
        ));
    }

    let timeouts = results.failed_count(ErrorKind::Timeout);
    let server_failures = results.failed_count(ErrorKind::ServerFailure);
    let unexpected = results.failed_count(ErrorKind::Unexpected);

    if timeouts + server_failures + unexpected > 0 {
        let mut parts = Vec::new();
        if timeouts > 0 {
            parts.push(format!("{} timeouts", timeouts));
        }
        if server_failures > 0 {
            parts.push(format!("{} server failures", server_failures));
        }
        if unexpected > 0 {
            parts.push(format!("{} unexpected errors", unexpected));
        }
        warn(&format!("Lookup issues: {}", parts.join(", ")));
    }
}
