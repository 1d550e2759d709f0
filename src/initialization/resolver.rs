//! DNS resolver initialization.
//!
//! This module builds the hickory resolver from explicit [`ResolverSettings`].

use std::sync::Arc;

use hickory_resolver::config::{
    NameServerConfigGroup, ResolverConfig, ResolverOpts, ServerOrderingStrategy,
};
use hickory_resolver::TokioAsyncResolver;

use crate::config::ResolverSettings;
use crate::error_handling::InitializationError;

/// Initializes the DNS resolver used for record lookups.
///
/// The resolver queries exactly the configured nameservers (UDP with TCP
/// fallback, port 53), in the given order, with the configured per-query timeout.
/// The system configuration (`/etc/resolv.conf`) is ignored so reports are
/// reproducible across hosts. The total lifetime budget is enforced by
/// [`crate::dns::HickoryDnsClient`], not here.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if no nameserver is configured,
/// or if the query timeout or the lookup lifetime is zero.
pub fn init_resolver(
    settings: &ResolverSettings,
) -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    if settings.nameservers.is_empty() {
        return Err(InitializationError::DnsResolverError(
            "no nameservers configured".to_string(),
        ));
    }
    if settings.query_timeout.is_zero() {
        return Err(InitializationError::DnsResolverError(
            "query timeout must be greater than zero".to_string(),
        ));
    }
    if settings.lifetime.is_zero() {
        return Err(InitializationError::DnsResolverError(
            "lookup lifetime must be greater than zero".to_string(),
        ));
    }

    let name_servers = NameServerConfigGroup::from_ips_clear(&settings.nameservers, 53, true);
    let config = ResolverConfig::from_parts(None, vec![], name_servers);

    let mut opts = ResolverOpts::default();
    opts.timeout = settings.query_timeout;
    opts.attempts = settings.attempts.max(1);
    // Names are always fully qualified; never append search domains
    opts.ndots = 0;
    opts.server_ordering_strategy = ServerOrderingStrategy::UserProvidedOrder;

    log::debug!(
        "DNS resolver configured: nameservers={:?}, timeout={:?}, attempts={}",
        settings.nameservers,
        opts.timeout,
        opts.attempts
    );

    Ok(Arc::new(TokioAsyncResolver::tokio(config, opts)))
}
