//! # dnsbrute Library
//!
//! A fast, bounded-concurrency DNS subdomain enumeration library.
//!
//! Given an ordered word list and a target domain, the library resolves every
//! generated candidate name through one shared resolver client, classifies
//! each outcome, and aggregates the results - with a hard ceiling on the
//! number of in-flight lookups and graceful, drain-style cancellation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dnsbrute_lib::{BruteForcer, BruteConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BruteConfig::default().with_concurrency(256);
//!     let forcer = BruteForcer::with_config(config)?;
//!
//!     let labels = vec!["www".to_string(), "mail".to_string(), "dev".to_string()];
//!     let results = forcer.run(&labels, "example.com").await?;
//!
//!     for host in &results.resolved {
//!         println!("{}\t{}", host.name, host.joined_addresses());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded Concurrency**: a semaphore-gated admission ceiling (default 512)
//! - **Outcome Classification**: not-found, no-data, timeout, server-failure, unexpected
//! - **Graceful Cancellation**: stop admitting, drain in-flight, keep partial results
//! - **Pluggable Resolution**: bring your own resolver behind one async trait

// Re-export main public API types and functions
// This makes them available as dnsbrute_lib::TypeName
pub use collector::ResultCollector;
pub use config::{
    load_env_config, parse_nameserver, parse_timeout_string, ConfigManager, DefaultsConfig,
    EnvConfig, FileConfig, OutputConfig,
};
pub use engine::{BruteForcer, ProgressHook};
pub use error::DnsBruteError;
pub use resolver::{HickoryClient, HostResolver, LookupError};
pub use types::{
    BruteConfig, ErrorKind, FailedHost, Outcome, ResolvedHost, ResultSet,
};
pub use utils::{is_valid_label, make_fqdn, normalize_domain, sanitize_labels, validate_domain};

// Internal modules - not part of the public module tree
mod collector;
mod config;
mod engine;
mod error;
mod resolver;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DnsBruteError>;

// Library version for display purposes
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
