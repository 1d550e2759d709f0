//! DMARC record parsing and retrieval.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::config::{DMARC_LABEL, DMARC_PREFIX};
use crate::dns::{resolve_txt, DnsClient};

/// `tag = value` pairs, the value running up to the next semicolon.
static TAG_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*=\s*([^;]+)").expect("tag pattern is a valid regex"));

/// A parsed DMARC record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmarcRecord {
    /// Record text as published
    pub raw: String,
    /// Tags in first-seen order; a repeated tag keeps its last value
    pub tags: Vec<(String, String)>,
}

impl DmarcRecord {
    /// Looks up a tag value by name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Flattens the record into report fields: tags, then `raw`.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        for (name, value) in &self.tags {
            fields.insert(name.clone(), Value::String(value.clone()));
        }
        fields.insert("raw".to_string(), Value::String(self.raw.clone()));
        fields
    }
}

/// Extracts `tag=value` pairs from semicolon-separated text.
///
/// Values are trimmed; a repeated tag overwrites the earlier value but keeps
/// its original position.
fn parse_tag_list(text: &str) -> Vec<(String, String)> {
    let mut tags: Vec<(String, String)> = Vec::new();
    for caps in TAG_VALUE.captures_iter(text) {
        let name = caps[1].to_string();
        let value = caps[2].trim_end().to_string();
        match tags.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => tags.push((name, value)),
        }
    }
    tags
}

/// Parses a DMARC record. Never fails; text without tags yields no tags.
pub fn parse_dmarc(record: &str) -> DmarcRecord {
    DmarcRecord {
        raw: record.to_string(),
        tags: parse_tag_list(record),
    }
}

/// Keeps the TXT strings that are DMARC records and parses them.
pub fn extract_dmarc_records(txt_records: &[String]) -> Vec<DmarcRecord> {
    txt_records
        .iter()
        .filter(|txt| txt.starts_with(DMARC_PREFIX))
        .map(|txt| parse_dmarc(txt))
        .collect()
}

/// Fetches and parses the DMARC records published at `_dmarc.<domain>`.
///
/// Invalid domains and every DNS failure yield an empty vector.
pub async fn fetch_dmarc(client: &dyn DnsClient, domain: &str) -> Vec<DmarcRecord> {
    if !crate::domain::validate_domain(domain) {
        return Vec::new();
    }
    let txt = resolve_txt(client, &format!("{DMARC_LABEL}.{domain}")).await;
    let records = extract_dmarc_records(&txt);
    log::debug!("Found {} DMARC record(s) for {domain}", records.len());
    records
}
