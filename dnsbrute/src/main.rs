//! dnsbrute CLI Application
//!
//! A command-line interface for brute-force DNS subdomain enumeration.
//! This CLI application provides a user-friendly interface to the
//! dnsbrute-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use dnsbrute_lib::{
    load_env_config, normalize_domain, parse_nameserver, parse_timeout_string, sanitize_labels,
    BruteConfig, BruteForcer, ConfigManager, DnsBruteError, FileConfig, Outcome, ResultSet,
};
use std::process;
use std::sync::Arc;
use std::time::Instant;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for dnsbrute
#[derive(Parser, Debug)]
#[command(name = "dnsbrute")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Brute force DNS subdomains asynchronously")]
#[command(
    long_about = "Brute force DNS subdomains asynchronously.\n\nResolves every word-list label under the target domain with a bounded number of in-flight lookups, classifies each outcome, and reports the names that exist."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Target domain to enumerate (e.g. example.com)
    #[arg(value_name = "DOMAIN", help_heading = "Target Selection")]
    pub domain: String,

    /// Word list with one subdomain label per line
    #[arg(
        short = 'w',
        long = "wordlist",
        value_name = "FILE",
        help_heading = "Target Selection"
    )]
    pub wordlist: Option<String>,

    /// Preview generated names without resolving them
    #[arg(long = "dry-run", help_heading = "Target Selection")]
    pub dry_run: bool,

    /// Max concurrent lookups (default: 512)
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub concurrency: Option<usize>,

    /// Per-lookup timeout, e.g. 5s, 500ms, 1m (default: 5s)
    #[arg(
        short = 't',
        long = "timeout",
        value_name = "DUR",
        help_heading = "Performance"
    )]
    pub timeout: Option<String>,

    /// Upstream DNS server as ip or ip:port (repeatable; default: system resolvers)
    #[arg(short = 'n', long = "nameserver", value_name = "ADDR", action = clap::ArgAction::Append, help_heading = "Resolution")]
    pub nameservers: Option<Vec<String>>,

    /// Output the full result set as JSON to stdout
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Output resolved names as CSV to stdout
    #[arg(long = "csv", help_heading = "Output Format")]
    pub csv: bool,

    /// Write resolved names as a CSV file (Hostname,IPs)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output Format"
    )]
    pub output: Option<String>,

    /// Disable the live progress counter
    #[arg(long = "no-progress", help_heading = "Output Format")]
    pub no_progress: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Configuration")]
    pub verbose: u8,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(args.verbose);

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Run the enumeration
    match run_brute(args).await {
        Ok(interrupted) => {
            if interrupted {
                // Conventional exit status for a SIGINT-terminated run
                process::exit(130);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Wire repeated -v flags to the log subscriber.
///
/// RUST_LOG still wins when set, so `RUST_LOG=dnsbrute_lib=trace` works for
/// targeted debugging regardless of flags.
fn init_tracing(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    // Can't have multiple structured output formats on stdout
    if args.json && args.csv {
        return Err("Cannot specify multiple output formats (--json, --csv)".to_string());
    }

    if let Some(0) = args.concurrency {
        return Err("Concurrency must be at least 1".to_string());
    }

    Ok(())
}

/// Main enumeration logic. Returns whether the run was interrupted.
async fn run_brute(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    // Build configuration with full precedence chain
    let (config, settings) = build_config(&args)?;

    let wordlist_path = settings.wordlist.clone().ok_or_else(|| {
        "You must specify a word list with --wordlist (or DNSBRUTE_WORDLIST, or a config file)"
            .to_string()
    })?;

    let labels = read_wordlist(&wordlist_path).await?;
    let domain = normalize_domain(&args.domain);

    // Dry-run: print candidate names and exit without resolving
    if args.dry_run {
        for label in &labels {
            println!("{}", dnsbrute_lib::make_fqdn(label, &domain));
        }
        ui::info(&format!("{} names would be resolved", labels.len()));
        return Ok(false);
    }

    ui::print_header(&domain, labels.len(), config.concurrency);

    // Live display: hit lines go to stdout, so they are suppressed when
    // stdout carries a structured report.
    let live = !args.json && !args.csv;
    let verbose = args.verbose;
    let progress = Arc::new(ui::Progress::new(labels.len(), !args.no_progress));
    let hook_progress = progress.clone();

    let forcer = BruteForcer::with_config(config)?.with_progress_hook(Arc::new(
        move |outcome: &Outcome| {
            match outcome {
                Outcome::Resolved(host) if live => ui::print_hit(host),
                Outcome::Failed(host) if live && verbose >= 1 => ui::print_failure(host),
                _ => {}
            }
            hook_progress.tick();
        },
    ));

    // Ctrl-C stops admissions and lets in-flight lookups drain
    let token = forcer.cancel_token();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ui::warn("Caught keyboard interrupt, draining in-flight lookups...");
            token.cancel();
        }
    });

    let started = Instant::now();
    let results = forcer.run(&labels, &domain).await?;
    let elapsed = started.elapsed();

    progress.finish();
    let interrupted = forcer.cancel_token().is_cancelled();
    watcher.abort();

    // Structured stdout reports
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if args.csv {
        print!("{}", format_csv(&results, settings.csv_headers));
    }

    // CSV file report (written even for an interrupted, partial run)
    if let Some(path) = &args.output {
        write_csv_file(path, &results, settings.csv_headers)?;
        ui::info(&format!(
            "Wrote {} resolved names to {}",
            results.resolved.len(),
            path
        ));
    }

    ui::print_summary(&results, elapsed, interrupted);

    Ok(interrupted)
}

/// Settings that live outside `BruteConfig`: collaborator concerns the CLI
/// resolves from the same precedence chain.
struct CliSettings {
    wordlist: Option<String>,
    csv_headers: bool,
}

/// Build BruteConfig from CLI arguments with config file integration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (DNSBRUTE_*)
/// 3. Local config file (./.dnsbrute.toml)
/// 4. Global config files (~/.dnsbrute.toml, XDG)
/// 5. Built-in defaults
fn build_config(args: &Args) -> Result<(BruteConfig, CliSettings), Box<dyn std::error::Error>> {
    let verbose = args.verbose >= 1;
    let config_manager = ConfigManager::new(verbose);

    // Step 1: Load config files (explicit path beats discovery)
    let file_config: FileConfig = if let Some(explicit_path) = &args.config {
        config_manager
            .load_file(explicit_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit_path, e))?
    } else if let Ok(env_path) = std::env::var("DNSBRUTE_CONFIG") {
        config_manager
            .load_file(&env_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_path, e))?
    } else {
        config_manager.discover_and_load().unwrap_or_default()
    };

    let mut config = BruteConfig::default();
    let mut settings = CliSettings {
        wordlist: None,
        csv_headers: true,
    };

    let mut nameserver_strings: Option<Vec<String>> = None;

    // Step 2: Apply config file values
    if let Some(defaults) = &file_config.defaults {
        if let Some(concurrency) = defaults.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(timeout) = &defaults.timeout {
            config = config.with_timeout(parse_timeout_string(timeout)?);
        }
        if defaults.nameservers.is_some() {
            nameserver_strings = defaults.nameservers.clone();
        }
        settings.wordlist = defaults.wordlist.clone();
    }
    if let Some(output) = &file_config.output {
        if let Some(csv_headers) = output.csv_headers {
            settings.csv_headers = csv_headers;
        }
    }

    // Step 3: Apply environment variables (DNSBRUTE_*)
    let env_config = load_env_config(verbose);
    if let Some(concurrency) = env_config.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(timeout) = &env_config.timeout {
        config = config.with_timeout(parse_timeout_string(timeout)?);
    }
    if env_config.nameservers.is_some() {
        nameserver_strings = env_config.nameservers;
    }
    if env_config.wordlist.is_some() {
        settings.wordlist = env_config.wordlist;
    }

    // Step 4: Apply CLI arguments (highest precedence)
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(timeout) = &args.timeout {
        config = config.with_timeout(parse_timeout_string(timeout)?);
    }
    if args.nameservers.is_some() {
        nameserver_strings = args.nameservers.clone();
    }
    if args.wordlist.is_some() {
        settings.wordlist = args.wordlist.clone();
    }

    // Parse nameserver strings once, wherever they came from
    if let Some(strings) = nameserver_strings {
        let nameservers = strings
            .iter()
            .map(|s| parse_nameserver(s))
            .collect::<Result<Vec<_>, _>>()?;
        config = config.with_nameservers(nameservers);
    }

    Ok((config, settings))
}

/// Read the word list: one label per line, blanks and '#' comments skipped.
async fn read_wordlist(path: &str) -> Result<Vec<String>, DnsBruteError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DnsBruteError::file_error(path, e.to_string()))?;

    let labels = sanitize_labels(content.lines());
    if labels.is_empty() {
        return Err(DnsBruteError::file_error(
            path,
            "word list contains no usable labels",
        ));
    }

    Ok(labels)
}

/// Render the resolved table as CSV: hostname plus comma-joined addresses.
fn format_csv(results: &ResultSet, headers: bool) -> String {
    let mut out = String::new();
    if headers {
        out.push_str("Hostname,IPs\n");
    }
    for host in &results.resolved {
        out.push_str(&format!("{},\"{}\"\n", host.name, host.joined_addresses()));
    }
    out
}

/// Write the resolved table to a CSV file.
fn write_csv_file(
    path: &str,
    results: &ResultSet,
    headers: bool,
) -> Result<(), DnsBruteError> {
    std::fs::write(path, format_csv(results, headers))
        .map_err(|e| DnsBruteError::file_error(path, e.to_string()))
}
