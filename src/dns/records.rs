//! Best-effort record queries (A, TXT, CNAME).
//!
//! Every failure collapses to "no data": the analyzer never distinguishes
//! NXDOMAIN from a timeout. Unexpected resolver failures are still logged so
//! operators can tell a broken resolver from a domain without records.

use super::client::DnsClient;

/// Returns the first A record address of `domain`, or `None`.
///
/// Invalid domain names are rejected without querying.
pub async fn resolve_a(client: &dyn DnsClient, domain: &str) -> Option<String> {
    if !crate::domain::validate_domain(domain) {
        return None;
    }
    match client.lookup_a(domain).await {
        Ok(addresses) => addresses.first().map(|ip| ip.to_string()),
        Err(e) => {
            log::warn!("A record error for {domain}: {e}");
            None
        }
    }
}

/// Returns all TXT strings published at `name`, or an empty vector.
pub async fn resolve_txt(client: &dyn DnsClient, name: &str) -> Vec<String> {
    match client.lookup_txt(name).await {
        Ok(records) => records,
        Err(e) => {
            log::warn!("TXT record error for {name}: {e}");
            Vec::new()
        }
    }
}

/// Returns the canonical target of `name`, or `None` if it is not an alias.
pub async fn resolve_cname(client: &dyn DnsClient, name: &str) -> Option<String> {
    match client.lookup_cname(name).await {
        Ok(target) => target.filter(|t| !t.is_empty()),
        Err(e) => {
            log::warn!("CNAME record error for {name}: {e}");
            None
        }
    }
}
