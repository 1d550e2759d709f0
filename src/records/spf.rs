//! SPF record parsing and retrieval.
//!
//! Parsing is deliberately lenient: terms that do not look like
//! `[qualifier]name[(:|=)value]` are skipped and counted, never fatal.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::SPF_PREFIX;
use crate::dns::{resolve_txt, DnsClient};
use crate::error_handling::DnsError;

/// SPF result qualifier prefixed to a mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    /// `+`, the default
    Pass,
    /// `-`
    Fail,
    /// `~`
    SoftFail,
    /// `?`
    Neutral,
}

impl Qualifier {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Qualifier::Pass),
            '-' => Some(Qualifier::Fail),
            '~' => Some(Qualifier::SoftFail),
            '?' => Some(Qualifier::Neutral),
            _ => None,
        }
    }

    /// The qualifier character as written in a record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Qualifier::Pass => "+",
            Qualifier::Fail => "-",
            Qualifier::SoftFail => "~",
            Qualifier::Neutral => "?",
        }
    }
}

impl Serialize for Qualifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Value(s) of one SPF term name.
///
/// A name seen once keeps a single value; a repeated name becomes a list in
/// first-seen order. Terms without a value (`a`, `mx`) store `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// The name appeared once
    Single(Option<String>),
    /// The name repeated; values in first-seen order
    List(Vec<Option<String>>),
}

impl TagValue {
    fn push(&mut self, value: Option<String>) {
        match self {
            TagValue::Single(existing) => {
                *self = TagValue::List(vec![existing.take(), value]);
            }
            TagValue::List(values) => values.push(value),
        }
    }

    /// All values in order, whether single or repeated.
    pub fn values(&self) -> Vec<Option<&str>> {
        match self {
            TagValue::Single(v) => vec![v.as_deref()],
            TagValue::List(values) => values.iter().map(|v| v.as_deref()).collect(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            TagValue::Single(v) => v.clone().map(Value::String).unwrap_or(Value::Null),
            TagValue::List(values) => Value::Array(
                values
                    .iter()
                    .map(|v| v.clone().map(Value::String).unwrap_or(Value::Null))
                    .collect(),
            ),
        }
    }
}

/// A parsed SPF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfRecord {
    /// Record text as published
    pub raw: String,
    /// Term names and values, in first-seen order (`all` excluded)
    pub tags: Vec<(String, TagValue)>,
    /// Qualifier of the last `all` mechanism, if any
    pub all: Option<Qualifier>,
    /// Number of terms that could not be parsed and were ignored
    pub skipped_terms: usize,
}

impl SpfRecord {
    /// Looks up a term by name.
    pub fn tag(&self, name: &str) -> Option<&TagValue> {
        self.tags.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Flattens the record into report fields: terms, `all`, then `raw`.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        for (name, value) in &self.tags {
            fields.insert(name.clone(), value.to_json());
        }
        if let Some(all) = self.all {
            fields.insert("all".to_string(), Value::String(all.as_str().to_string()));
        }
        fields.insert("raw".to_string(), Value::String(self.raw.clone()));
        fields
    }
}

/// Splits one SPF term into qualifier, name and value.
///
/// The name is the leading run of ASCII alphanumerics; a single `:` or `=`
/// after it is a separator; whatever remains is the value.
fn split_term(term: &str) -> Option<(Option<Qualifier>, &str, Option<&str>)> {
    let mut rest = term;
    let qualifier = rest.chars().next().and_then(Qualifier::from_char);
    if qualifier.is_some() {
        rest = &rest[1..];
    }

    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let (name, mut value) = rest.split_at(name_len);
    if value.starts_with(':') || value.starts_with('=') {
        value = &value[1..];
    }

    Some((qualifier, name, (!value.is_empty()).then_some(value)))
}

/// Parses an SPF record.
///
/// Never fails: unparseable terms are skipped and counted in
/// [`SpfRecord::skipped_terms`].
///
/// # Examples
///
/// ```
/// use dnscheck::records::{parse_spf, Qualifier, TagValue};
///
/// let spf = parse_spf("v=spf1 include:_spf.example.com ~all");
/// assert_eq!(spf.tag("include"), Some(&TagValue::Single(Some("_spf.example.com".into()))));
/// assert_eq!(spf.all, Some(Qualifier::SoftFail));
/// ```
pub fn parse_spf(record: &str) -> SpfRecord {
    let mut spf = SpfRecord {
        raw: record.to_string(),
        tags: Vec::new(),
        all: None,
        skipped_terms: 0,
    };

    for term in record.split_whitespace() {
        let Some((qualifier, name, value)) = split_term(term) else {
            spf.skipped_terms += 1;
            continue;
        };

        if name.eq_ignore_ascii_case("all") {
            spf.all = Some(qualifier.unwrap_or(Qualifier::Pass));
            continue;
        }

        let value = value.map(str::to_string);
        match spf.tags.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => existing.push(value),
            None => spf.tags.push((name.to_string(), TagValue::Single(value))),
        }
    }

    if spf.skipped_terms > 0 {
        log::debug!(
            "Skipped {} unparseable SPF term(s) in \"{}\"",
            spf.skipped_terms,
            spf.raw
        );
    }
    spf
}

/// Keeps the TXT strings that are SPF records and parses them.
pub fn extract_spf_records(txt_records: &[String]) -> Vec<SpfRecord> {
    txt_records
        .iter()
        .filter(|txt| txt.starts_with(SPF_PREFIX))
        .map(|txt| parse_spf(txt))
        .collect()
}

/// Fetches SPF records, propagating unexpected resolver failures.
///
/// Names that cannot be looked up (see [`crate::domain::is_lookup_name`]) yield
/// no records without querying.
pub async fn fetch_spf_strict(
    client: &dyn DnsClient,
    domain: &str,
) -> Result<Vec<SpfRecord>, DnsError> {
    if !crate::domain::is_lookup_name(domain) {
        return Ok(Vec::new());
    }
    let txt = client.lookup_txt(domain).await?;
    Ok(extract_spf_records(&txt))
}

/// Fetches and parses the SPF records of `domain`.
///
/// Invalid domains and every DNS failure yield an empty vector.
pub async fn fetch_spf(client: &dyn DnsClient, domain: &str) -> Vec<SpfRecord> {
    if !crate::domain::validate_domain(domain) {
        return Vec::new();
    }
    let txt = resolve_txt(client, domain).await;
    let records = extract_spf_records(&txt);
    log::debug!("Found {} SPF record(s) for {domain}", records.len());
    records
}
