//! DNS resolution and record querying.
//!
//! This module provides async DNS operations using `hickory-resolver`:
//! - The [`DnsClient`] trait and its hickory-backed implementation
//! - Best-effort A, TXT and CNAME queries that turn every failure into "no data"
//!
//! All operations are async and use the explicitly configured nameservers.

mod client;
mod records;

// Re-export public API
pub use client::{DnsClient, HickoryDnsClient};
pub use records::{resolve_a, resolve_cname, resolve_txt};

#[cfg(test)]
pub(crate) mod mock;
