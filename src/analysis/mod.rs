//! Domain analysis: warning codes, reports and the orchestrator.
//!
//! This module provides:
//! - [`AnalysisReport`] and its per-record-type sub-reports, serialized to the
//!   report JSON shape
//! - [`analyze_domain`] and the cancellable and batch-friendly variants
//!
//! Warning codes themselves live in [`crate::WarningCode`].

mod analyzer;
mod report;

// Re-export public API
pub use analyzer::{
    analyze_domain, analyze_domain_with_cancel, analyze_with_selectors, Analyzer,
};
pub use report::{AnalysisReport, DkimReport, DkimResult, DmarcReport, SpfReport};
