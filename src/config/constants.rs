//! Configuration constants.
//!
//! This module defines the constants used throughout the analyzer, including
//! resolver defaults, record prefixes, and the DKIM selector candidates.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Maximum number of DNS-consuming SPF mechanisms allowed per evaluation (RFC 7208 §4.6.4).
///
/// The lookup-budget walk reports at most `MAX_LOOKUPS + 1` to signal "over limit".
pub const MAX_LOOKUPS: u32 = 10;

/// Public recursive resolvers queried in order (Cloudflare, Google, Quad9).
pub const DEFAULT_NAMESERVERS: [IpAddr; 3] = [
    IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
    IpAddr::V4(Ipv4Addr::new(9, 9, 9, 9)),
];

/// Per-query timeout handed to the resolver.
pub const DNS_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound on the total time spent on one query, across retries to alternate resolvers.
pub const DNS_LIFETIME: Duration = Duration::from_secs(5);

/// Attempts per query before the resolver gives up.
pub const DNS_ATTEMPTS: usize = 2;

/// Upper bound on a whole domain analysis when run through the batch runner.
///
/// SPF, DMARC and DKIM fetches run concurrently, but the lookup-budget walk is
/// sequential and can touch up to eleven names, each bounded by `DNS_LIFETIME`.
pub const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum number of domains analyzed concurrently by the batch runner.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Maximum length of a domain name in presentation format.
pub const MAX_DOMAIN_LENGTH: usize = 253;

/// Prefix identifying an SPF record among a name's TXT strings.
pub const SPF_PREFIX: &str = "v=spf1";

/// Prefix identifying a DMARC record among `_dmarc.<domain>` TXT strings.
pub const DMARC_PREFIX: &str = "v=DMARC1";

/// Label prepended to the domain when querying DMARC.
pub const DMARC_LABEL: &str = "_dmarc";

/// Label separating the selector from the domain in DKIM key names.
pub const DKIM_LABEL: &str = "_domainkey";

/// Well-known DKIM selectors, probed in this order.
///
/// Selectors cannot be enumerated from DNS, so the analyzer guesses. These cover
/// Google Workspace, Amazon SES and the defaults of common MTAs. Additional
/// selectors can be appended through [`crate::Config::extra_selectors`].
pub const DKIM_SELECTORS: [&str; 11] = [
    "20161025",
    "20210112",
    "20220623",
    "20230601",
    "a",
    "a1",
    "acdkim1",
    "amazonses",
    "default",
    "dkim",
    "google",
];
