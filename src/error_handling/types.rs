//! Error type definitions.
//!
//! This module defines the error types used throughout the application and the
//! warning codes attached to analysis reports.

use log::SetLoggerError;
use serde::{Serialize, Serializer};
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// An unexpected resolver failure.
///
/// NXDOMAIN, NODATA and timeouts are not errors: resolver clients report them as
/// an empty answer. Everything else (SERVFAIL, refused, malformed responses,
/// unparseable names) ends up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// The resolver returned a failure other than "no data".
    #[error("{record_type} lookup failed for {name}: {message}")]
    Resolve {
        /// Queried name
        name: String,
        /// Queried record type (`A`, `TXT`, `CNAME`)
        record_type: &'static str,
        /// Resolver error message
        message: String,
    },
}

/// Error types for the SPF lookup-budget walk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// A TXT query failed in a way that is not "no data".
    #[error("SPF lookup count failed: {0}")]
    Dns(#[from] DnsError),

    /// The caller cancelled the analysis.
    #[error("SPF lookup count cancelled")]
    Cancelled,
}

/// Error types for a domain analysis.
///
/// Only the cancellable entry point can fail; absence of records and resolver
/// failures are part of the report, never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The caller cancelled the analysis before it completed.
    #[error("analysis of {0} cancelled")]
    Cancelled(String),
}

/// Warning codes attached to analysis reports.
///
/// The numeric values are an external contract: 6 and everything above 8 are
/// reserved and must never be reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro)]
#[repr(u8)]
pub enum WarningCode {
    /// No SPF, DMARC or DKIM record exists for the domain.
    DomainNotFound = 1,
    /// The record type has no record for the domain.
    RecordNotFound = 2,
    /// More than one SPF or DMARC record was published.
    MultipleRecordsFound = 3,
    /// Reserved; no check emits it yet.
    DuplicateRecordTerms = 4,
    /// The record does not follow its grammar.
    RecordSyntaxError = 5,
    /// The input is not a syntactically valid domain.
    InvalidDomain = 7,
    /// The SPF record needs more than ten DNS lookups.
    LookupsLimit = 8,
}

impl WarningCode {
    /// Numeric code, as serialized in reports.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Symbolic name used in logs, e.g. `RECORD_NOT_FOUND`.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::DomainNotFound => "DOMAIN_NOT_FOUND",
            WarningCode::RecordNotFound => "RECORD_NOT_FOUND",
            WarningCode::MultipleRecordsFound => "MULTIPLE_RECORDS_FOUND",
            WarningCode::DuplicateRecordTerms => "DUPLICATE_RECORD_TERMS",
            WarningCode::RecordSyntaxError => "RECORD_SYNTAX_ERROR",
            WarningCode::InvalidDomain => "INVALID_DOMAIN",
            WarningCode::LookupsLimit => "LOOKUPS_LIMIT",
        }
    }

    /// Maps a numeric code back to its warning, `None` for reserved values.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(WarningCode::DomainNotFound),
            2 => Some(WarningCode::RecordNotFound),
            3 => Some(WarningCode::MultipleRecordsFound),
            4 => Some(WarningCode::DuplicateRecordTerms),
            5 => Some(WarningCode::RecordSyntaxError),
            7 => Some(WarningCode::InvalidDomain),
            8 => Some(WarningCode::LookupsLimit),
            _ => None,
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WarningCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}
