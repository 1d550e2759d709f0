//! DKIM selector scanning, validation and parsing.
//!
//! Selectors cannot be discovered from DNS, so the scanner probes a list of
//! well-known ones. A probe that finds something key-like yields a
//! [`DkimRecord`]; whether its syntax is valid is reported, not enforced.

use futures::future::join_all;
use serde_json::{Map, Value};

use crate::config::{DKIM_LABEL, DKIM_SELECTORS};
use crate::dns::{resolve_cname, resolve_txt, DnsClient};

/// A DKIM key record found under one selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimRecord {
    /// Selector the record was found under
    pub selector: String,
    /// Record text as published
    pub raw: String,
    /// Tags in published order; empty when `syntax_error` is set
    pub tags: Vec<(String, String)>,
    /// Whether the record failed [`validate_dkim`]
    pub syntax_error: bool,
}

impl DkimRecord {
    /// Looks up a tag value by name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the record publishes an empty key, i.e. the key was revoked.
    pub fn is_revoked(&self) -> bool {
        !self.syntax_error && self.tag("p") == Some("")
    }

    /// Flattens the record into report fields: tags, then `selector` and `raw`.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        for (name, value) in &self.tags {
            fields.insert(name.clone(), Value::String(value.clone()));
        }
        fields.insert("selector".to_string(), Value::String(self.selector.clone()));
        fields.insert("raw".to_string(), Value::String(self.raw.clone()));
        fields
    }
}

/// Splits a DKIM key record into its tags, or `None` if the syntax is invalid.
///
/// Valid means: every non-empty `;`-separated segment is `name=value` with an
/// alphanumeric name, no name appears twice, `v` is exactly `DKIM1`, and `p`
/// is present. An empty `p` (revoked key) is valid.
fn split_dkim(record: &str) -> Option<Vec<(String, String)>> {
    let mut tags: Vec<(String, String)> = Vec::new();
    for part in record.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = part.split_once('=')?;
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        if tags.iter().any(|(k, _)| k == name) {
            return None;
        }
        tags.push((name.to_string(), value.to_string()));
    }

    let version = tags.iter().find(|(k, _)| k == "v").map(|(_, v)| v.as_str());
    if version != Some("DKIM1") || !tags.iter().any(|(k, _)| k == "p") {
        return None;
    }
    Some(
        tags.into_iter()
            .map(|(name, value)| (name, value.trim().to_string()))
            .collect(),
    )
}

/// Checks DKIM key record syntax.
///
/// # Examples
///
/// ```
/// use dnscheck::records::validate_dkim;
///
/// assert!(validate_dkim("v=DKIM1; k=rsa; p="));
/// assert!(!validate_dkim("v=DKIM2; p=abc"));
/// assert!(!validate_dkim("v=DKIM1; v=DKIM1; p=x"));
/// ```
pub fn validate_dkim(record: &str) -> bool {
    split_dkim(record).is_some()
}

/// Parses the DKIM record found under `selector`, flagging invalid syntax
/// instead of failing.
pub fn parse_dkim(selector: &str, record: &str) -> DkimRecord {
    let (tags, syntax_error) = match split_dkim(record) {
        Some(tags) => (tags, false),
        None => (Vec::new(), true),
    };
    DkimRecord {
        selector: selector.to_string(),
        raw: record.to_string(),
        tags,
        syntax_error,
    }
}

/// Whether a TXT string looks like a DKIM key record at all.
fn is_dkim_candidate(txt: &str) -> bool {
    txt.contains("v=") || txt.contains("p=")
}

/// Probes one key name: TXT first, then the TXT of its CNAME target.
///
/// Returns the first key-like TXT string, or `None`.
pub async fn probe_dkim(client: &dyn DnsClient, name: &str) -> Option<String> {
    let txt = resolve_txt(client, name).await;
    if let Some(found) = txt.into_iter().find(|t| is_dkim_candidate(t)) {
        return Some(found);
    }

    // Providers often delegate keys with a CNAME to their own zone
    let target = resolve_cname(client, name).await?;
    log::debug!("Following DKIM CNAME {name} -> {target}");
    resolve_txt(client, &target)
        .await
        .into_iter()
        .find(|t| is_dkim_candidate(t))
}

/// Probes `selectors` under `domain` and returns the records found, in
/// selector order.
///
/// Selectors are probed concurrently. Invalid domains yield an empty vector
/// without querying.
pub async fn fetch_dkim_with_selectors(
    client: &dyn DnsClient,
    domain: &str,
    selectors: &[String],
) -> Vec<DkimRecord> {
    if !crate::domain::validate_domain(domain) {
        return Vec::new();
    }

    let probes = selectors.iter().map(|selector| async move {
        let name = format!("{selector}.{DKIM_LABEL}.{domain}");
        probe_dkim(client, &name)
            .await
            .map(|txt| parse_dkim(selector, &txt))
    });
    let records: Vec<DkimRecord> = join_all(probes).await.into_iter().flatten().collect();

    log::debug!(
        "Found {} DKIM record(s) for {domain} across {} selector(s)",
        records.len(),
        selectors.len()
    );
    records
}

/// Probes the built-in selector list under `domain`.
pub async fn fetch_dkim(client: &dyn DnsClient, domain: &str) -> Vec<DkimRecord> {
    let selectors: Vec<String> = DKIM_SELECTORS.iter().map(|s| s.to_string()).collect();
    fetch_dkim_with_selectors(client, domain, &selectors).await
}
