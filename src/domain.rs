//! Domain name validation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::MAX_DOMAIN_LENGTH;

/// Dot-separated labels of 1-63 alphanumerics, hyphens allowed inside a label only.
static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)*[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$",
    )
    .expect("domain pattern is a valid regex")
});

/// Checks that `domain` is a syntactically valid host name.
///
/// Rejects empty strings, names longer than 253 characters, labels longer than
/// 63 characters, labels starting or ending with a hyphen, and anything outside
/// `[A-Za-z0-9-.]`. A trailing root dot is not accepted.
pub fn validate_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LENGTH {
        return false;
    }
    DOMAIN_PATTERN.is_match(domain)
}

/// Checks that `name` can be queried as the target of an SPF `include` or `redirect`.
///
/// Looser than [`validate_domain`]: service labels such as `_spf` are allowed,
/// since DNS only restricts host names, not TXT owner names. Unexpanded macros
/// (`%{i}`) and empty labels are rejected.
pub fn is_lookup_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_DOMAIN_LENGTH
        && name.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

/// A domain name that passed [`validate_domain`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain(String);

impl Domain {
    /// Validates `input` and wraps it, keeping its original case.
    pub fn parse(input: &str) -> Option<Self> {
        validate_domain(input).then(|| Domain(input.to_string()))
    }

    /// The validated name as given, without normalization.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
