// Shared test helpers: an in-memory resolver client.
//
// This module provides a deterministic `DnsClient` used across the integration
// test files so none of them touch the network.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dnscheck::{DnsClient, DnsError};

/// Resolver answering from fixed tables, counting every query it receives.
///
/// Names are matched case-insensitively. Names marked failing return a
/// SERVFAIL-style `DnsError`; names marked slow sleep before answering.
#[derive(Default)]
#[allow(dead_code)] // Not every test file uses every builder
pub struct TableDnsClient {
    a: HashMap<String, Vec<Ipv4Addr>>,
    txt: HashMap<String, Vec<String>>,
    cname: HashMap<String, String>,
    failing: HashSet<String>,
    slow: HashMap<String, Duration>,
    queries: AtomicUsize,
}

#[allow(dead_code)]
impl TableDnsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_a(mut self, name: &str, address: Ipv4Addr) -> Self {
        self.a.entry(name.to_lowercase()).or_default().push(address);
        self
    }

    pub fn with_txt(mut self, name: &str, value: &str) -> Self {
        self.txt
            .entry(name.to_lowercase())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn with_cname(mut self, name: &str, target: &str) -> Self {
        self.cname.insert(name.to_lowercase(), target.to_string());
        self
    }

    pub fn with_failure(mut self, name: &str) -> Self {
        self.failing.insert(name.to_lowercase());
        self
    }

    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.slow.insert(name.to_lowercase(), delay);
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    async fn check(&self, name: &str, record_type: &'static str) -> Result<String, DnsError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let key = name.to_lowercase();
        if let Some(delay) = self.slow.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&key) {
            return Err(DnsError::Resolve {
                name: name.to_string(),
                record_type,
                message: "SERVFAIL".to_string(),
            });
        }
        Ok(key)
    }
}

#[async_trait]
impl DnsClient for TableDnsClient {
    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        let key = self.check(name, "A").await?;
        Ok(self.a.get(&key).cloned().unwrap_or_default())
    }

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        let key = self.check(name, "TXT").await?;
        Ok(self.txt.get(&key).cloned().unwrap_or_default())
    }

    async fn lookup_cname(&self, name: &str) -> Result<Option<String>, DnsError> {
        let key = self.check(name, "CNAME").await?;
        Ok(self.cname.get(&key).cloned())
    }
}

/// An SPF record with `count` `a` mechanisms.
#[allow(dead_code)]
pub fn spf_with_lookups(count: usize) -> String {
    let terms: Vec<&str> = std::iter::repeat_n("a", count).collect();
    format!("v=spf1 {} -all", terms.join(" "))
}
