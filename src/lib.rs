//! dnscheck library: email-authentication analysis of domains over DNS
//!
//! This library inspects the SPF, DMARC and DKIM records a domain publishes,
//! estimates how many DNS lookups its SPF policy needs, and reports what is
//! missing or malformed as numeric warning codes.
//!
//! # Example
//!
//! ```no_run
//! use dnscheck::{run_check, Config};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     max_concurrency: 4,
//!     ..Default::default()
//! };
//!
//! let domains = vec!["example.com".to_string(), "example.org".to_string()];
//! let batch = run_check(&config, domains, &CancellationToken::new()).await?;
//! for result in &batch.results {
//!     println!("{}", serde_json::to_string(result)?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod analysis;
pub mod config;
pub mod dns;
mod domain;
mod error_handling;
pub mod initialization;
pub mod lookups;
pub mod records;

// Re-export public API
pub use analysis::{analyze_domain, analyze_domain_with_cancel, AnalysisReport, Analyzer};
pub use config::{Config, LogFormat, LogLevel, Opt, ResolverSettings};
pub use dns::{DnsClient, HickoryDnsClient};
pub use domain::{is_lookup_name, validate_domain, Domain};
pub use error_handling::{
    AnalysisError, DnsError, InitializationError, LookupError, WarningCode, WarningStats,
};
pub use lookups::count_lookups;
pub use run::{read_domains, run_batch, run_check, BatchReport, DomainResult};

// Internal run module (batch analysis over many domains)
mod run {
    use anyhow::{Context, Result};
    use chrono::{DateTime, Utc};
    use std::path::Path;
    use std::sync::Arc;

    use futures::stream::{self, StreamExt};
    use log::{debug, info, warn};
    use serde::ser::{Serialize, SerializeMap, Serializer};
    use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
    use tokio_util::sync::CancellationToken;

    use crate::analysis::{AnalysisReport, Analyzer};
    use crate::config::Config;
    use crate::dns::{DnsClient, HickoryDnsClient};
    use crate::error_handling::{AnalysisError, WarningCode, WarningStats};

    /// Outcome of analyzing one input domain.
    ///
    /// Serializes to `{"domain": .., "report": ..}`, or `{"domain": .., "error": ..}`
    /// when the analysis timed out or was cancelled.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DomainResult {
        /// The domain exactly as given in the input
        pub domain: String,
        /// The report, or why there is none
        pub outcome: std::result::Result<AnalysisReport, String>,
    }

    impl Serialize for DomainResult {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(2))?;
            map.serialize_entry("domain", &self.domain)?;
            match &self.outcome {
                Ok(report) => map.serialize_entry("report", report)?,
                Err(error) => map.serialize_entry("error", error)?,
            }
            map.end()
        }
    }

    /// Results of a batch run.
    pub struct BatchReport {
        /// One entry per input domain, in input order
        pub results: Vec<DomainResult>,
        /// Warning counters over every completed report
        pub stats: WarningStats,
        /// When the run started
        pub started_at: DateTime<Utc>,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    impl BatchReport {
        /// Number of domains that produced no report.
        pub fn failed(&self) -> usize {
            self.results.iter().filter(|r| r.outcome.is_err()).count()
        }
    }

    fn record_stats(stats: &WarningStats, report: &AnalysisReport) {
        for code in report.all_warnings() {
            stats.increment_warning(code);
        }
        if report.spf_lookup_count.is_none()
            && !report.warnings.contains(&WarningCode::InvalidDomain)
        {
            stats.increment_lookup_failure();
        }
    }

    /// Analyzes `domains` with `client`, at most `config.max_concurrency` at a time.
    ///
    /// Each analysis gets `config.analysis_timeout`; an analysis that runs out of
    /// time is cancelled and reported as an error entry. Cancelling `cancel`
    /// stops every analysis still running; domains not yet started are reported
    /// as cancelled without querying.
    pub async fn run_batch(
        config: &Config,
        client: Arc<dyn DnsClient>,
        domains: Vec<String>,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let started_at = Utc::now();
        let start_time = std::time::Instant::now();
        let analyzer = Analyzer::with_selectors(client, config.dkim_selectors());
        let stats = WarningStats::new();
        let total = domains.len();
        info!(
            "Analyzing {total} domain(s) with concurrency {}",
            config.max_concurrency
        );

        let analyzer = &analyzer;
        let stats_ref = &stats;
        let timeout = config.analysis_timeout;
        let results: Vec<DomainResult> = stream::iter(domains)
            .map(|domain| async move {
                let token = cancel.child_token();
                let outcome = match tokio::time::timeout(
                    timeout,
                    analyzer.analyze_with_cancel(&domain, &token),
                )
                .await
                {
                    Ok(Ok(report)) => {
                        record_stats(stats_ref, &report);
                        Ok(report)
                    }
                    Ok(Err(AnalysisError::Cancelled(_))) => {
                        debug!("Analysis of {domain} cancelled");
                        Err("analysis cancelled".to_string())
                    }
                    Err(_) => {
                        token.cancel();
                        stats_ref.increment_timeout();
                        warn!(
                            "Timeout analyzing {domain} after {} seconds",
                            timeout.as_secs()
                        );
                        Err(format!("analysis timed out after {}s", timeout.as_secs()))
                    }
                };
                DomainResult { domain, outcome }
            })
            .buffered(config.max_concurrency.max(1))
            .collect()
            .await;

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        info!("Analyzed {total} domain(s) in {elapsed_seconds:.1}s");

        BatchReport {
            results,
            stats,
            started_at,
            elapsed_seconds,
        }
    }

    /// Builds a resolver client from `config` and runs [`run_batch`] with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolver cannot be initialized.
    pub async fn run_check(
        config: &Config,
        domains: Vec<String>,
        cancel: &CancellationToken,
    ) -> Result<BatchReport> {
        let client = HickoryDnsClient::from_settings(&config.resolver)
            .context("Failed to initialize DNS resolver")?;
        Ok(run_batch(config, Arc::new(client), domains, cancel).await)
    }

    async fn collect_domains<R: AsyncBufRead + Unpin>(reader: R) -> Vec<String> {
        let mut lines = reader.lines();
        let mut domains = Vec::new();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read line from input: {e}");
                    break;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            domains.push(trimmed.to_string());
        }
        domains
    }

    /// Reads one domain per line from `path` (`-` reads stdin).
    ///
    /// Blank lines and lines starting with `#` are skipped. Domains are not
    /// validated here: invalid ones get an `INVALID_DOMAIN` report.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub async fn read_domains(path: &Path) -> Result<Vec<String>> {
        let domains = if path.as_os_str() == "-" {
            info!("Reading domains from stdin");
            collect_domains(BufReader::new(tokio::io::stdin())).await
        } else {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            collect_domains(BufReader::new(file)).await
        };
        info!("Total domains in input: {}", domains.len());
        Ok(domains)
    }
}
