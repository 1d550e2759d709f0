//! Domain analysis orchestration.
//!
//! Validates the domain, fetches SPF, DMARC and DKIM concurrently, computes
//! the SPF lookup budget and turns what it found into warning codes.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::{DKIM_SELECTORS, MAX_LOOKUPS};
use crate::dns::DnsClient;
use crate::domain::Domain;
use crate::error_handling::{AnalysisError, LookupError, WarningCode};
use crate::lookups::count_lookups_with;
use crate::records::{fetch_dkim_with_selectors, fetch_dmarc, fetch_spf};

use super::report::{AnalysisReport, DkimReport, DkimResult, DmarcReport, SpfReport};

/// Analyzes domains against one resolver client and DKIM selector list.
///
/// Holds no per-analysis state; one instance can serve concurrent analyses.
#[derive(Clone)]
pub struct Analyzer {
    client: Arc<dyn DnsClient>,
    selectors: Arc<[String]>,
}

impl Analyzer {
    /// Creates an analyzer probing the built-in DKIM selectors.
    pub fn new(client: Arc<dyn DnsClient>) -> Self {
        Self::with_selectors(client, builtin_selectors())
    }

    /// Creates an analyzer probing `selectors`, in order.
    pub fn with_selectors(client: Arc<dyn DnsClient>, selectors: Vec<String>) -> Self {
        Self {
            client,
            selectors: selectors.into(),
        }
    }

    /// DKIM selectors probed, in order.
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Analyzes `domain`. Never fails: problems are reported as warnings.
    pub async fn analyze(&self, domain: &str) -> AnalysisReport {
        analyze_with_selectors(self.client.as_ref(), domain, &self.selectors).await
    }

    /// Analyzes `domain`, giving up as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Cancelled` if `cancel` fired before the report
    /// was complete.
    pub async fn analyze_with_cancel(
        &self,
        domain: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        analyze_cancellable(self.client.as_ref(), domain, &self.selectors, cancel).await
    }
}

fn builtin_selectors() -> Vec<String> {
    DKIM_SELECTORS.iter().map(|s| s.to_string()).collect()
}

/// `RECORD_NOT_FOUND` for none, `MULTIPLE_RECORDS_FOUND` for more than one.
fn record_count_warnings(count: usize) -> Vec<WarningCode> {
    match count {
        0 => vec![WarningCode::RecordNotFound],
        1 => Vec::new(),
        _ => vec![WarningCode::MultipleRecordsFound],
    }
}

/// Analyzes `domain` with the built-in DKIM selectors.
///
/// # Examples
///
/// ```no_run
/// use dnscheck::analysis::analyze_domain;
/// use dnscheck::config::ResolverSettings;
/// use dnscheck::dns::HickoryDnsClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HickoryDnsClient::from_settings(&ResolverSettings::default())?;
/// let report = analyze_domain(&client, "example.com").await;
/// println!("{}", serde_json::to_string(&report)?);
/// # Ok(())
/// # }
/// ```
pub async fn analyze_domain(client: &dyn DnsClient, domain: &str) -> AnalysisReport {
    analyze_with_selectors(client, domain, &builtin_selectors()).await
}

/// Analyzes `domain` with the built-in DKIM selectors, giving up as soon as
/// `cancel` fires.
///
/// # Errors
///
/// Returns `AnalysisError::Cancelled` if `cancel` fired before the report was
/// complete.
pub async fn analyze_domain_with_cancel(
    client: &dyn DnsClient,
    domain: &str,
    cancel: &CancellationToken,
) -> Result<AnalysisReport, AnalysisError> {
    analyze_cancellable(client, domain, &builtin_selectors(), cancel).await
}

/// Analyzes `domain`, probing `selectors` for DKIM.
pub async fn analyze_with_selectors(
    client: &dyn DnsClient,
    domain: &str,
    selectors: &[String],
) -> AnalysisReport {
    // Nothing else holds this token, so the walk cannot be cancelled
    build_report(client, domain, selectors, &CancellationToken::new())
        .await
        .unwrap_or_else(|e| {
            log::error!("Analysis of {domain} stopped: {e}");
            AnalysisReport::default()
        })
}

/// Races the analysis against `cancel`. In-flight queries are dropped on
/// cancellation; nothing keeps running in the background.
async fn analyze_cancellable(
    client: &dyn DnsClient,
    domain: &str,
    selectors: &[String],
    cancel: &CancellationToken,
) -> Result<AnalysisReport, AnalysisError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AnalysisError::Cancelled(domain.to_string())),
        result = build_report(client, domain, selectors, cancel) => result,
    }
}

async fn build_report(
    client: &dyn DnsClient,
    input: &str,
    selectors: &[String],
    cancel: &CancellationToken,
) -> Result<AnalysisReport, AnalysisError> {
    let Some(domain) = Domain::parse(input) else {
        log::debug!("Rejected invalid domain {input:?}");
        return Ok(AnalysisReport::invalid_domain());
    };
    let name = domain.as_str();

    let (spf_records, dmarc_records, dkim_records) = tokio::join!(
        fetch_spf(client, name),
        fetch_dmarc(client, name),
        fetch_dkim_with_selectors(client, name, selectors),
    );

    let spf = SpfReport {
        warnings: record_count_warnings(spf_records.len()),
        records: spf_records,
    };
    let dmarc = DmarcReport {
        warnings: record_count_warnings(dmarc_records.len()),
        records: dmarc_records,
    };
    // Several selectors per domain is normal, so no "multiple" warning here
    let dkim = DkimReport {
        warnings: if dkim_records.is_empty() {
            vec![WarningCode::RecordNotFound]
        } else {
            Vec::new()
        },
        results: dkim_records
            .into_iter()
            .map(|record| DkimResult {
                warnings: if record.syntax_error {
                    vec![WarningCode::RecordSyntaxError]
                } else {
                    Vec::new()
                },
                record,
            })
            .collect(),
    };

    let mut report = AnalysisReport {
        spf,
        dmarc,
        dkim,
        ..Default::default()
    };

    let mut visited = HashSet::new();
    match count_lookups_with(client, name, &mut visited, cancel).await {
        Ok(count) => {
            report.spf_lookup_count = Some(count);
            if count > MAX_LOOKUPS {
                report.spf.warnings.push(WarningCode::LookupsLimit);
            }
        }
        Err(LookupError::Cancelled) => {
            return Err(AnalysisError::Cancelled(input.to_string()));
        }
        Err(e) => {
            log::error!("Error counting SPF lookups for {domain}: {e}");
            report.spf_lookup_count = None;
        }
    }

    if report.spf.records.is_empty()
        && report.dmarc.records.is_empty()
        && report.dkim.results.is_empty()
    {
        report.warnings.push(WarningCode::DomainNotFound);
    }

    log::debug!(
        "Analyzed {domain}: {} warning(s), spf_lookup_count={:?}",
        report.all_warnings().len(),
        report.spf_lookup_count
    );
    Ok(report)
}
