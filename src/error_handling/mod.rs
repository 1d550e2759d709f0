//! Error handling and warning statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, resolver, lookup-budget, analysis)
//! - The closed set of warning codes attached to reports
//! - Warning statistics tracking across a batch of analyses
//!
//! Absence of data is never an error here: missing records surface as warning
//! codes, and only operational faults use the error types.

mod stats;
mod types;

// Re-export public API
pub use stats::WarningStats;
pub use types::{AnalysisError, DnsError, InitializationError, LookupError, WarningCode};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_warning_codes_keep_reserved_gaps() {
        let codes: Vec<u8> = WarningCode::iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 7, 8]);
        assert_eq!(WarningCode::from_code(6), None);
        assert_eq!(WarningCode::from_code(9), None);
        assert_eq!(WarningCode::from_code(0), None);
    }

    #[test]
    fn test_warning_code_roundtrip_through_numeric_value() {
        for code in WarningCode::iter() {
            assert_eq!(WarningCode::from_code(code.code()), Some(code));
        }
    }

    #[test]
    fn test_warning_code_serializes_as_integer() {
        let json = serde_json::to_string(&vec![
            WarningCode::InvalidDomain,
            WarningCode::LookupsLimit,
        ])
        .unwrap();
        assert_eq!(json, "[7,8]");
    }

    #[test]
    fn test_warning_code_display() {
        assert_eq!(WarningCode::DomainNotFound.to_string(), "DOMAIN_NOT_FOUND");
        assert_eq!(WarningCode::RecordSyntaxError.to_string(), "RECORD_SYNTAX_ERROR");
        assert_eq!(WarningCode::LookupsLimit.as_str(), "LOOKUPS_LIMIT");
    }

    #[test]
    fn test_warning_stats_initialization() {
        let stats = WarningStats::new();
        for code in WarningCode::iter() {
            assert_eq!(stats.get_warning_count(code), 0);
        }
        assert_eq!(stats.total_warnings(), 0);
        assert_eq!(stats.lookup_failures(), 0);
        assert_eq!(stats.timeouts(), 0);
    }

    #[test]
    fn test_warning_stats_increment() {
        let stats = WarningStats::new();
        stats.increment_warning(WarningCode::RecordNotFound);
        stats.increment_warning(WarningCode::RecordNotFound);
        stats.increment_warning(WarningCode::LookupsLimit);
        stats.increment_lookup_failure();
        stats.increment_timeout();

        assert_eq!(stats.get_warning_count(WarningCode::RecordNotFound), 2);
        assert_eq!(stats.get_warning_count(WarningCode::LookupsLimit), 1);
        assert_eq!(stats.total_warnings(), 3);
        assert_eq!(stats.lookup_failures(), 1);
        assert_eq!(stats.timeouts(), 1);
    }

    #[test]
    fn test_dns_error_display() {
        let err = DnsError::Resolve {
            name: "example.com".into(),
            record_type: "TXT",
            message: "SERVFAIL".into(),
        };
        assert_eq!(err.to_string(), "TXT lookup failed for example.com: SERVFAIL");
        let lookup: LookupError = err.into();
        assert!(lookup.to_string().starts_with("SPF lookup count failed"));
    }
}
