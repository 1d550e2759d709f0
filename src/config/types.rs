//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_NAMESERVERS, DKIM_SELECTORS, DNS_ATTEMPTS, DNS_LIFETIME,
    DNS_QUERY_TIMEOUT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Resolver configuration.
///
/// Built once at startup and handed to the resolver client; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Recursive resolvers, queried in the given order
    pub nameservers: Vec<IpAddr>,
    /// Timeout for a single query to a single nameserver
    pub query_timeout: Duration,
    /// Total time allowed for one lookup, including retries against other nameservers
    pub lifetime: Duration,
    /// Attempts per lookup
    pub attempts: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            nameservers: DEFAULT_NAMESERVERS.to_vec(),
            query_timeout: DNS_QUERY_TIMEOUT,
            lifetime: DNS_LIFETIME,
            attempts: DNS_ATTEMPTS,
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use dnscheck::Config;
///
/// let config = Config {
///     max_concurrency: 4,
///     extra_selectors: vec!["selector1".to_string()],
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Resolver configuration
    pub resolver: ResolverSettings,

    /// Maximum number of domains analyzed concurrently
    pub max_concurrency: usize,

    /// Upper bound on one domain analysis
    pub analysis_timeout: Duration,

    /// Selectors probed after the built-in DKIM selector list
    pub extra_selectors: Vec<String>,
}

impl Config {
    /// Returns the full DKIM selector list: the built-in selectors followed by
    /// any extra ones, without duplicates.
    pub fn dkim_selectors(&self) -> Vec<String> {
        let mut selectors: Vec<String> = DKIM_SELECTORS.iter().map(|s| s.to_string()).collect();
        for extra in &self.extra_selectors {
            if !selectors.iter().any(|s| s == extra) {
                selectors.push(extra.clone());
            }
        }
        selectors
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            resolver: ResolverSettings::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            analysis_timeout: crate::config::constants::ANALYSIS_TIMEOUT,
            extra_selectors: Vec::new(),
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Single domain
/// dnscheck example.com
///
/// # Domains from a file, one per line, with a custom resolver
/// dnscheck --file domains.txt --nameserver 9.9.9.9
///
/// # Domains from stdin
/// cat domains.txt | dnscheck --file -
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "dnscheck",
    about = "Checks the SPF, DMARC and DKIM records of one or more domains."
)]
pub struct Opt {
    /// Domains to analyze
    #[arg(value_parser)]
    pub domains: Vec<String>,

    /// File with one domain per line (`-` reads stdin)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Recursive resolver to query (repeatable, queried in order)
    #[arg(long = "nameserver", env = "DNSCHECK_NAMESERVERS", value_delimiter = ',')]
    pub nameservers: Vec<IpAddr>,

    /// Per-query timeout in seconds
    #[arg(long, default_value_t = DNS_QUERY_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Total time budget per lookup in seconds
    #[arg(long, default_value_t = DNS_LIFETIME.as_secs())]
    pub lifetime_secs: u64,

    /// Maximum number of domains analyzed concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Additional DKIM selector to probe (repeatable)
    #[arg(long = "selector")]
    pub selectors: Vec<String>,

    /// Pretty-print the JSON output instead of one report per line
    #[arg(long)]
    pub pretty: bool,
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        let nameservers = if opt.nameservers.is_empty() {
            DEFAULT_NAMESERVERS.to_vec()
        } else {
            opt.nameservers.clone()
        };
        Config {
            log_level: opt.log_level.clone(),
            log_format: opt.log_format.clone(),
            resolver: ResolverSettings {
                nameservers,
                query_timeout: Duration::from_secs(opt.timeout_secs),
                lifetime: Duration::from_secs(opt.lifetime_secs),
                attempts: DNS_ATTEMPTS,
            },
            max_concurrency: opt.max_concurrency.max(1),
            extra_selectors: opt.selectors.clone(),
            ..Default::default()
        }
    }
}
