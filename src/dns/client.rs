//! Resolver client abstraction.
//!
//! [`DnsClient`] is the seam between the analyzer and the network: the
//! production implementation wraps hickory's `TokioAsyncResolver`, tests plug in
//! an in-memory table.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::lookup::Lookup;
use hickory_resolver::proto::error::ProtoErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::rdata::TXT;
use hickory_resolver::proto::rr::{Name, RData, RecordType};
use hickory_resolver::TokioAsyncResolver;

use crate::config::ResolverSettings;
use crate::error_handling::{DnsError, InitializationError};
use crate::initialization::init_resolver;

/// DNS queries needed by the analyzer.
///
/// Implementations must report "nothing here" (NXDOMAIN, NODATA, timeout) as an
/// empty answer and reserve `Err` for unexpected failures.
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// A records for `name`, in answer order.
    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, DnsError>;

    /// TXT records for `name`, one string per record with its segments concatenated.
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError>;

    /// CNAME target of `name` without the trailing root dot.
    async fn lookup_cname(&self, name: &str) -> Result<Option<String>, DnsError>;
}

/// [`DnsClient`] backed by hickory-resolver.
#[derive(Clone)]
pub struct HickoryDnsClient {
    resolver: Arc<TokioAsyncResolver>,
    lifetime: Duration,
}

impl HickoryDnsClient {
    /// Wraps an existing resolver; every lookup is abandoned after `lifetime`.
    pub fn new(resolver: Arc<TokioAsyncResolver>, lifetime: Duration) -> Self {
        Self { resolver, lifetime }
    }

    /// Builds the resolver from `settings` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::DnsResolverError` if the settings are unusable.
    pub fn from_settings(settings: &ResolverSettings) -> Result<Self, InitializationError> {
        let resolver = init_resolver(settings)?;
        Ok(Self::new(resolver, settings.lifetime))
    }

    /// Runs one lookup under the lifetime budget.
    ///
    /// Returns `Ok(None)` when the name has no data of this type, does not exist,
    /// or the resolver ran out of time.
    async fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
        label: &'static str,
    ) -> Result<Option<Lookup>, DnsError> {
        let result =
            match tokio::time::timeout(self.lifetime, self.resolver.lookup(name, record_type))
                .await
            {
                Ok(result) => result,
                Err(_) => {
                    log::debug!(
                        "{label} lookup for {name} exceeded lifetime of {:?}",
                        self.lifetime
                    );
                    return Ok(None);
                }
            };

        match result {
            Ok(lookup) => Ok(Some(lookup)),
            Err(e) if is_absence(&e) => {
                log::debug!("No {label} records for {name}: {e}");
                Ok(None)
            }
            Err(e) => Err(DnsError::Resolve {
                name: name.to_string(),
                record_type: label,
                message: e.to_string(),
            }),
        }
    }
}

/// Whether a resolver error only means "there is nothing here".
pub(super) fn is_absence(error: &ResolveError) -> bool {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            matches!(response_code, ResponseCode::NXDomain | ResponseCode::NoError)
        }
        ResolveErrorKind::Timeout => true,
        ResolveErrorKind::Proto(proto) => matches!(proto.kind(), ProtoErrorKind::Timeout),
        _ => false,
    }
}

/// Joins the segments of one TXT record, replacing invalid UTF-8.
///
/// Long values (DKIM keys) are published as several 255-byte segments.
pub(super) fn txt_to_string(txt: &TXT) -> String {
    txt.iter()
        .map(|bytes| String::from_utf8_lossy(bytes))
        .collect()
}

/// CNAME target in presentation format, without the trailing root dot.
pub(super) fn cname_target(name: &Name) -> String {
    name.to_utf8().trim_end_matches('.').to_string()
}

#[async_trait]
impl DnsClient for HickoryDnsClient {
    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        let Some(lookup) = self.lookup(name, RecordType::A, "A").await? else {
            return Ok(Vec::new());
        };
        Ok(lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::A(a) => Some(a.0),
                _ => None,
            })
            .collect())
    }

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        let Some(lookup) = self.lookup(name, RecordType::TXT, "TXT").await? else {
            return Ok(Vec::new());
        };
        Ok(lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::TXT(txt) => Some(txt_to_string(txt)),
                _ => None,
            })
            .collect())
    }

    async fn lookup_cname(&self, name: &str) -> Result<Option<String>, DnsError> {
        let Some(lookup) = self.lookup(name, RecordType::CNAME, "CNAME").await? else {
            return Ok(None);
        };
        Ok(lookup.iter().find_map(|rdata| match rdata {
            RData::CNAME(cname) => Some(cname_target(&cname.0)),
            _ => None,
        }))
    }
}
