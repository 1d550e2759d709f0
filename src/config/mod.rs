//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (resolver defaults, lookup limits, DKIM selectors)
//! - Resolver settings and library configuration
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Opt, ResolverSettings};
