//! In-memory [`DnsClient`] for unit tests.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::client::DnsClient;
use crate::error_handling::DnsError;

/// Deterministic resolver answering from fixed tables.
///
/// Names are matched case-insensitively. Names registered with
/// [`MockDnsClient::with_failure`] fail every query with a `DnsError`.
#[derive(Default)]
pub struct MockDnsClient {
    a: HashMap<String, Vec<Ipv4Addr>>,
    txt: HashMap<String, Vec<String>>,
    cname: HashMap<String, String>,
    failing: HashSet<String>,
    queries: AtomicUsize,
}

impl MockDnsClient {
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

    /// Number of queries answered so far, of any type.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn check(&self, name: &str, record_type: &'static str) -> Result<String, DnsError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let key = name.to_lowercase();
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
impl DnsClient for MockDnsClient {
    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        let key = self.check(name, "A")?;
        Ok(self.a.get(&key).cloned().unwrap_or_default())
    }

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        let key = self.check(name, "TXT")?;
        Ok(self.txt.get(&key).cloned().unwrap_or_default())
    }

    async fn lookup_cname(&self, name: &str) -> Result<Option<String>, DnsError> {
        let key = self.check(name, "CNAME")?;
        Ok(self.cname.get(&key).cloned())
    }
}
