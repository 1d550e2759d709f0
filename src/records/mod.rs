//! SPF, DMARC and DKIM records.
//!
//! This module provides:
//! - Total parsers for the three TXT grammars (they never fail, they flag)
//! - Fetchers that query the right names and degrade DNS failures to "no records"
//!
//! Fetchers validate the domain first and make no query for invalid input.

mod dkim;
mod dmarc;
mod spf;

// Re-export public API
pub use dkim::{
    fetch_dkim, fetch_dkim_with_selectors, parse_dkim, probe_dkim, validate_dkim, DkimRecord,
};
pub use dmarc::{extract_dmarc_records, fetch_dmarc, parse_dmarc, DmarcRecord};
pub use spf::{
    extract_spf_records, fetch_spf, fetch_spf_strict, parse_spf, Qualifier, SpfRecord, TagValue,
};
