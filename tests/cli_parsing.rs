//! Tests for command-line parsing into the library configuration.

use std::time::Duration;

use clap::Parser;
use dnscheck::config::{ANALYSIS_TIMEOUT, DEFAULT_MAX_CONCURRENCY, DKIM_SELECTORS};
use dnscheck::{Config, Opt};

#[test]
fn test_minimal_invocation() {
    let opt = Opt::try_parse_from(["dnscheck", "example.com", "example.org"]).unwrap();
    assert_eq!(opt.domains, vec!["example.com", "example.org"]);
    assert!(opt.file.is_none());
    assert!(!opt.pretty);

    let config = Config::from(&opt);
    assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    assert_eq!(config.analysis_timeout, ANALYSIS_TIMEOUT);
    assert_eq!(config.dkim_selectors().len(), DKIM_SELECTORS.len());
}

#[test]
fn test_all_flags() {
    let opt = Opt::try_parse_from([
        "dnscheck",
        "--file",
        "-",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--nameserver",
        "192.0.2.53",
        "--nameserver",
        "2001:db8::53",
        "--timeout-secs",
        "1",
        "--lifetime-secs",
        "3",
        "--max-concurrency",
        "0",
        "--selector",
        "selector1",
        "--selector",
        "k1",
        "--pretty",
    ])
    .unwrap();
    assert_eq!(opt.file.as_deref(), Some(std::path::Path::new("-")));
    assert!(opt.pretty);

    let config = Config::from(&opt);
    assert_eq!(config.resolver.nameservers.len(), 2);
    assert_eq!(config.resolver.query_timeout, Duration::from_secs(1));
    assert_eq!(config.resolver.lifetime, Duration::from_secs(3));
    // Zero would stall the batch; clamp to one
    assert_eq!(config.max_concurrency, 1);
    let selectors = config.dkim_selectors();
    assert_eq!(&selectors[selectors.len() - 2..], ["selector1", "k1"]);
}

#[test]
fn test_comma_separated_nameservers() {
    let opt = Opt::try_parse_from(["dnscheck", "--nameserver", "192.0.2.1,192.0.2.2", "x.example"])
        .unwrap();
    assert_eq!(opt.nameservers.len(), 2);
}

#[test]
fn test_rejects_bad_values() {
    assert!(Opt::try_parse_from(["dnscheck", "--nameserver", "not-an-ip", "a.example"]).is_err());
    assert!(Opt::try_parse_from(["dnscheck", "--log-level", "loud", "a.example"]).is_err());
    assert!(Opt::try_parse_from(["dnscheck", "--timeout-secs", "-1", "a.example"]).is_err());
}
