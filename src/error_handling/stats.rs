//! Warning statistics tracking.
//!
//! This module provides thread-safe counters for the warning codes emitted
//! while analyzing a batch of domains.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::WarningCode;

/// Thread-safe warning statistics tracker.
///
/// Counts every warning code occurrence across all reports of a run, plus the
/// number of reports whose SPF lookup count could not be computed. All codes
/// are initialized to zero on creation.
///
/// # Thread Safety
///
/// This struct is thread-safe and can be shared across multiple tasks using `Arc`.
pub struct WarningStats {
    warnings: HashMap<WarningCode, AtomicUsize>,
    lookup_failures: AtomicUsize,
    timeouts: AtomicUsize,
}

impl WarningStats {
    /// Creates stats with a zeroed counter for every warning code.
    pub fn new() -> Self {
        let mut warnings = HashMap::new();
        for code in WarningCode::iter() {
            warnings.insert(code, AtomicUsize::new(0));
        }

        WarningStats {
            warnings,
            lookup_failures: AtomicUsize::new(0),
            timeouts: AtomicUsize::new(0),
        }
    }

    /// Increment a warning counter.
    pub fn increment_warning(&self, code: WarningCode) {
        if let Some(counter) = self.warnings.get(&code) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment warning counter for {:?} which is not in the map. \
                 This indicates a bug in WarningStats initialization.",
                code
            );
        }
    }

    /// Records a report whose SPF lookup count is null.
    pub fn increment_lookup_failure(&self) {
        self.lookup_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an analysis abandoned because it exceeded its time budget.
    pub fn increment_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the count for a warning code.
    pub fn get_warning_count(&self, code: WarningCode) -> usize {
        self.warnings
            .get(&code)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Number of reports whose SPF lookup count was null.
    pub fn lookup_failures(&self) -> usize {
        self.lookup_failures.load(Ordering::SeqCst)
    }

    /// Number of analyses that ran out of time.
    pub fn timeouts(&self) -> usize {
        self.timeouts.load(Ordering::SeqCst)
    }

    /// Total number of warnings across all codes.
    pub fn total_warnings(&self) -> usize {
        self.warnings
            .values()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }

    /// Logs a summary of non-zero counters at info level.
    pub fn log_summary(&self) {
        let total = self.total_warnings();
        if total == 0 && self.lookup_failures() == 0 && self.timeouts() == 0 {
            log::info!("No warnings reported");
            return;
        }
        log::info!("Warnings reported: {total}");
        for code in WarningCode::iter() {
            let count = self.get_warning_count(code);
            if count > 0 {
                log::info!("   {} ({}): {}", code, code.code(), count);
            }
        }
        if self.lookup_failures() > 0 {
            log::info!("SPF lookup count unavailable: {}", self.lookup_failures());
        }
        if self.timeouts() > 0 {
            log::info!("Analyses timed out: {}", self.timeouts());
        }
    }
}

impl Default for WarningStats {
    fn default() -> Self {
        Self::new()
    }
}
