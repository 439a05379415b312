//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and environment
//! variables. Merging into a [`BruteConfig`](crate::types::BruteConfig) with
//! proper precedence (CLI > env > local file > global file > defaults) is the
//! caller's concern; this module only discovers, parses, and validates.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::DnsBruteError;

/// Configuration loaded from TOML files.
///
/// This represents the structure of configuration files users can create to
/// set default values:
///
/// ```toml
/// [defaults]
/// concurrency = 256
/// timeout = "3s"
/// nameservers = ["1.1.1.1", "9.9.9.9:53"]
///
/// [output]
/// csv_headers = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Output formatting preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default concurrency ceiling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Default per-lookup timeout (as string, e.g. "5s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Default upstream nameservers, "ip" or "ip:port"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Vec<String>>,

    /// Default word-list path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordlist: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Include the CSV header row by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_headers: Option<bool>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new config manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load a specific configuration file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DnsBruteError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| DnsBruteError::file_error(path.display().to_string(), e.to_string()))?;
        let config: FileConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Discover and load configuration with standard precedence.
    ///
    /// Later files never override values already set by earlier ones:
    /// 1. `./.dnsbrute.toml` (project-local)
    /// 2. `~/.dnsbrute.toml`
    /// 3. `~/.config/dnsbrute/config.toml` (XDG)
    pub fn discover_and_load(&self) -> Result<FileConfig, DnsBruteError> {
        let mut merged = FileConfig::default();

        for path in self.discovery_paths() {
            if !path.exists() {
                continue;
            }
            match self.load_file(&path) {
                Ok(config) => merge_file_config(&mut merged, config),
                Err(e) if self.verbose => {
                    eprintln!("Warning: skipping config file {}: {}", path.display(), e);
                }
                Err(_) => {}
            }
        }

        Ok(merged)
    }

    fn discovery_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".dnsbrute.toml")];

        if let Some(home) = env::var_os("HOME") {
            let home = PathBuf::from(home);
            paths.push(home.join(".dnsbrute.toml"));
            paths.push(home.join(".config").join("dnsbrute").join("config.toml"));
        }

        paths
    }
}

/// Fill unset fields of `base` from `next` (first-found wins).
fn merge_file_config(base: &mut FileConfig, next: FileConfig) {
    match (&mut base.defaults, next.defaults) {
        (Some(base_defaults), Some(next_defaults)) => {
            if base_defaults.concurrency.is_none() {
                base_defaults.concurrency = next_defaults.concurrency;
            }
            if base_defaults.timeout.is_none() {
                base_defaults.timeout = next_defaults.timeout;
            }
            if base_defaults.nameservers.is_none() {
                base_defaults.nameservers = next_defaults.nameservers;
            }
            if base_defaults.wordlist.is_none() {
                base_defaults.wordlist = next_defaults.wordlist;
            }
        }
        (None, next_defaults) => base.defaults = next_defaults,
        _ => {}
    }

    if base.output.is_none() {
        base.output = next.output;
    }
}

/// Configuration sourced from `DNSBRUTE_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub nameservers: Option<Vec<String>>,
    pub wordlist: Option<String>,
}

/// Read `DNSBRUTE_*` environment variables.
///
/// Invalid values are reported (when `verbose`) and ignored rather than
/// failing the run.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    let mut config = EnvConfig::default();

    if let Ok(value) = env::var("DNSBRUTE_CONCURRENCY") {
        match value.parse::<usize>() {
            Ok(n) if n > 0 => config.concurrency = Some(n),
            _ if verbose => eprintln!("Warning: ignoring invalid DNSBRUTE_CONCURRENCY={}", value),
            _ => {}
        }
    }

    if let Ok(value) = env::var("DNSBRUTE_TIMEOUT") {
        config.timeout = Some(value);
    }

    if let Ok(value) = env::var("DNSBRUTE_NAMESERVER") {
        let servers: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !servers.is_empty() {
            config.nameservers = Some(servers);
        }
    }

    if let Ok(value) = env::var("DNSBRUTE_WORDLIST") {
        config.wordlist = Some(value);
    }

    config
}

/// Parse a timeout string like "5s", "500ms" or "2m" into a duration.
///
/// A bare number is taken as seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Result<Duration, DnsBruteError> {
    let timeout_str = timeout_str.trim().to_lowercase();
    let invalid = || DnsBruteError::config(format!("Invalid timeout '{}'", timeout_str));

    if let Some(ms) = timeout_str.strip_suffix("ms") {
        return ms
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| invalid());
    }
    if let Some(s) = timeout_str.strip_suffix('s') {
        return s
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| invalid());
    }
    if let Some(m) = timeout_str.strip_suffix('m') {
        return m
            .parse::<u64>()
            .map(|m| Duration::from_secs(m * 60))
            .map_err(|_| invalid());
    }

    // Assume seconds if no unit
    timeout_str
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| invalid())
}

/// Parse a nameserver string, defaulting the port to 53 when absent.
pub fn parse_nameserver(input: &str) -> Result<SocketAddr, DnsBruteError> {
    let input = input.trim();

    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }

    // Bare IP: append the standard DNS port
    if let Ok(ip) = input.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, 53));
    }

    Err(DnsBruteError::config(format!(
        "Invalid nameserver '{}': expected ip or ip:port",
        input
    )))
}
