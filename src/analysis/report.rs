//! Analysis report types and their JSON shape.
//!
//! Sub-reports keep the parsed records; serialization flattens every record's
//! fields into the sub-report object next to its `warnings` list. When several
//! records are present, later records overwrite earlier fields.

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use serde_json::{Map, Value};

use crate::error_handling::WarningCode;
use crate::records::{DkimRecord, DmarcRecord, SpfRecord};

/// Writes `warnings` followed by `fields` (minus any field named `warnings`).
fn serialize_with_warnings<S: Serializer>(
    serializer: S,
    warnings: &[WarningCode],
    fields: &Map<String, Value>,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("warnings", warnings)?;
    for (name, value) in fields {
        if name != "warnings" {
            map.serialize_entry(name, value)?;
        }
    }
    map.end()
}

/// SPF part of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpfReport {
    /// Warnings about the SPF setup
    pub warnings: Vec<WarningCode>,
    /// Every SPF record found, in answer order
    pub records: Vec<SpfRecord>,
}

impl SpfReport {
    /// Fields of all records merged, last write wins.
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        for record in &self.records {
            fields.extend(record.to_fields());
        }
        fields
    }
}

impl Serialize for SpfReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_with_warnings(serializer, &self.warnings, &self.fields())
    }
}

/// DMARC part of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DmarcReport {
    /// Warnings about the DMARC setup
    pub warnings: Vec<WarningCode>,
    /// Every DMARC record found, in answer order
    pub records: Vec<DmarcRecord>,
}

impl DmarcReport {
    /// Fields of all records merged, last write wins.
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        for record in &self.records {
            fields.extend(record.to_fields());
        }
        fields
    }
}

impl Serialize for DmarcReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_with_warnings(serializer, &self.warnings, &self.fields())
    }
}

/// One DKIM record with its own warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimResult {
    /// Warnings about this record
    pub warnings: Vec<WarningCode>,
    /// The record found under one selector
    pub record: DkimRecord,
}

impl Serialize for DkimResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_with_warnings(serializer, &self.warnings, &self.record.to_fields())
    }
}

/// DKIM part of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DkimReport {
    /// Warnings about the DKIM setup as a whole
    pub warnings: Vec<WarningCode>,
    /// One entry per selector that yielded a record, in selector order
    pub results: Vec<DkimResult>,
}

impl Serialize for DkimReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DkimReport", 2)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.serialize_field("results", &self.results)?;
        state.end()
    }
}

/// Email-authentication posture of one domain.
///
/// Serializes to:
///
/// ```text
/// {
///   "warnings": [int...],
///   "spf": {"warnings": [int...], "raw": str, <spf tags...>},
///   "dmarc": {"warnings": [int...], "raw": str, <dmarc tags...>},
///   "dkim": {"warnings": [int...], "results": [{"warnings": [int...], "selector": str, "raw": str, <tags...>}...]},
///   "spf_lookup_count": int | null
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AnalysisReport {
    /// Domain-level warnings
    pub warnings: Vec<WarningCode>,
    /// SPF findings
    pub spf: SpfReport,
    /// DMARC findings
    pub dmarc: DmarcReport,
    /// DKIM findings
    pub dkim: DkimReport,
    /// DNS lookups needed to evaluate SPF, capped at 11; `None` when the
    /// domain was invalid or the count could not be computed
    pub spf_lookup_count: Option<u32>,
}

impl AnalysisReport {
    /// Report for input that is not a valid domain: only `INVALID_DOMAIN`.
    pub fn invalid_domain() -> Self {
        AnalysisReport {
            warnings: vec![WarningCode::InvalidDomain],
            ..Default::default()
        }
    }

    /// Every warning in the report, domain-level first, then SPF, DMARC, DKIM.
    pub fn all_warnings(&self) -> Vec<WarningCode> {
        let mut all = self.warnings.clone();
        all.extend(&self.spf.warnings);
        all.extend(&self.dmarc.warnings);
        all.extend(&self.dkim.warnings);
        for result in &self.dkim.results {
            all.extend(&result.warnings);
        }
        all
    }

    /// Whether the report carries any warning at all.
    pub fn has_warnings(&self) -> bool {
        !self.all_warnings().is_empty()
    }
}
