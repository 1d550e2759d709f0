//! SPF lookup-budget calculation.
//!
//! Estimates how many DNS-consuming mechanisms an SPF evaluation of a domain
//! would need, following `include` and `redirect` recursively. The walk shares
//! one visited set across the whole call tree: a domain reached through two
//! sibling includes is counted once. This undercounts compared to a real SPF
//! evaluation but keeps the number of queries bounded.

use std::collections::HashSet;

use futures::future::{BoxFuture, FutureExt};
use tokio_util::sync::CancellationToken;

use crate::config::MAX_LOOKUPS;
use crate::dns::DnsClient;
use crate::error_handling::LookupError;
use crate::records::fetch_spf_strict;

/// How one SPF term affects the lookup budget.
#[derive(Debug, PartialEq, Eq)]
enum Term<'a> {
    /// `include:` or `redirect=`, costing one lookup plus the target's own
    Recurse(&'a str),
    /// `a`, `mx`, `ptr`, `exists` and their `:`/`/` forms
    Lookup,
    /// Anything that needs no DNS query
    Free,
}

/// Classifies a lowercased SPF term. A leading qualifier is ignored.
fn classify(term: &str) -> Term<'_> {
    let term = term.trim_start_matches(['+', '-', '~', '?']);

    if let Some(target) = term.strip_prefix("include:") {
        return Term::Recurse(target);
    }
    if let Some(target) = term.strip_prefix("redirect=") {
        return Term::Recurse(target);
    }
    if matches!(term, "a" | "mx" | "ptr")
        || ["a:", "mx:", "ptr:", "a/", "mx/", "exists:"]
            .iter()
            .any(|prefix| term.starts_with(prefix))
    {
        return Term::Lookup;
    }
    Term::Free
}

/// Counts the DNS lookups needed to evaluate the SPF policy of `domain`.
///
/// Starts from an empty visited set. The result is capped at `MAX_LOOKUPS + 1`:
/// any value above [`MAX_LOOKUPS`] means "over the limit", not an exact count.
///
/// `include` and `redirect` targets with service labels such as
/// `_spf.example.net` are followed like any other name. A check that only
/// follows strict host names skips them and reports fewer lookups:
/// `include:_spf.example.net` pointing at `v=spf1 a mx -all` counts 3 here,
/// where such a check counts 1.
///
/// # Errors
///
/// Returns `LookupError::Dns` if a TXT query fails for a reason other than
/// missing data.
pub async fn count_lookups(client: &dyn DnsClient, domain: &str) -> Result<u32, LookupError> {
    let mut visited = HashSet::new();
    count_lookups_with(client, domain, &mut visited, &CancellationToken::new()).await
}

/// Counts lookups like [`count_lookups`], threading an explicit visited set
/// and stopping with `LookupError::Cancelled` once `cancel` fires.
///
/// Domains already in `visited` count as zero. Names are compared lowercased.
pub async fn count_lookups_with(
    client: &dyn DnsClient,
    domain: &str,
    visited: &mut HashSet<String>,
    cancel: &CancellationToken,
) -> Result<u32, LookupError> {
    walk(client, domain.to_ascii_lowercase(), visited, cancel).await
}

fn walk<'a>(
    client: &'a dyn DnsClient,
    domain: String,
    visited: &'a mut HashSet<String>,
    cancel: &'a CancellationToken,
) -> BoxFuture<'a, Result<u32, LookupError>> {
    async move {
        if cancel.is_cancelled() {
            return Err(LookupError::Cancelled);
        }
        if !visited.insert(domain.clone()) {
            log::trace!("SPF lookup walk already visited {domain}");
            return Ok(0);
        }

        let records = fetch_spf_strict(client, &domain).await?;
        let mut count: u32 = 0;
        for record in &records {
            for term in record.raw.split_whitespace() {
                let term = term.to_ascii_lowercase();
                count += match classify(&term) {
                    Term::Recurse(target) => {
                        1 + walk(client, target.to_string(), visited, cancel).await?
                    }
                    Term::Lookup => 1,
                    Term::Free => 0,
                };
                if count > MAX_LOOKUPS {
                    log::debug!("SPF lookup limit exceeded while walking {domain}");
                    return Ok(MAX_LOOKUPS + 1);
                }
            }
        }
        Ok(count)
    }
    .boxed()
}
