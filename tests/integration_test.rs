//! End-to-end analysis tests against an in-memory resolver.
//!
//! These cover the report contract as a consumer sees it: warning codes,
//! JSON shape, the SPF lookup budget and determinism.

mod helpers;

use dnscheck::{analyze_domain, count_lookups, WarningCode};
use helpers::{spf_with_lookups, TableDnsClient};
use serde_json::json;

#[tokio::test]
async fn test_invalid_domain_reports_only_invalid_domain() {
    let client = TableDnsClient::new();
    for input in ["", "not a domain", "-leading.example", "trailing-.example", "a..b"] {
        let report = analyze_domain(&client, input).await;
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "warnings": [7],
                "spf": {"warnings": []},
                "dmarc": {"warnings": []},
                "dkim": {"warnings": [], "results": []},
                "spf_lookup_count": null
            }),
            "input {input:?}"
        );
    }
    assert_eq!(client.query_count(), 0, "invalid input must not be queried");
}

#[tokio::test]
async fn test_overlong_domain_is_invalid() {
    let client = TableDnsClient::new();
    let label = "a".repeat(63);
    let domain = [label.as_str(); 4].join(".");
    assert_eq!(domain.len(), 255);
    let report = analyze_domain(&client, &domain).await;
    assert_eq!(report.warnings, vec![WarningCode::InvalidDomain]);
    assert_eq!(client.query_count(), 0);
}

#[tokio::test]
async fn test_domain_without_records() {
    let client = TableDnsClient::new();
    let report = analyze_domain(&client, "empty.example").await;
    assert_eq!(report.warnings, vec![WarningCode::DomainNotFound]);
    assert_eq!(report.spf.warnings, vec![WarningCode::RecordNotFound]);
    assert_eq!(report.dmarc.warnings, vec![WarningCode::RecordNotFound]);
    assert_eq!(report.dkim.warnings, vec![WarningCode::RecordNotFound]);
    assert_eq!(report.spf_lookup_count, Some(0));
}

#[tokio::test]
async fn test_only_dmarc_published() {
    let client = TableDnsClient::new().with_txt("_dmarc.example.com", "v=DMARC1; p=none");
    let report = analyze_domain(&client, "example.com").await;
    assert!(report.warnings.is_empty());
    assert_eq!(report.spf.warnings, vec![WarningCode::RecordNotFound]);
    assert!(report.dmarc.warnings.is_empty());
}

#[tokio::test]
async fn test_report_json_shape() {
    let client = TableDnsClient::new()
        .with_txt("example.com", "v=spf1 ip4:192.0.2.1 ip4:192.0.2.2 mx ~all")
        .with_txt("example.com", "google-site-verification=abc")
        .with_txt("_dmarc.example.com", "v=DMARC1; p=quarantine; pct=50")
        .with_txt("google._domainkey.example.com", "v=DKIM1; k=rsa; p=KEY")
        .with_txt("default._domainkey.example.com", "v=DKIM1; k=rsa");

    let report = analyze_domain(&client, "example.com").await;
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(
        value["spf"],
        json!({
            "warnings": [],
            "v": "spf1",
            "ip4": ["192.0.2.1", "192.0.2.2"],
            "mx": null,
            "all": "~",
            "raw": "v=spf1 ip4:192.0.2.1 ip4:192.0.2.2 mx ~all"
        })
    );
    assert_eq!(
        value["dmarc"],
        json!({
            "warnings": [],
            "v": "DMARC1",
            "p": "quarantine",
            "pct": "50",
            "raw": "v=DMARC1; p=quarantine; pct=50"
        })
    );
    assert_eq!(value["dkim"]["warnings"], json!([]));
    assert_eq!(
        value["dkim"]["results"],
        json!([
            {"warnings": [5], "selector": "default", "raw": "v=DKIM1; k=rsa"},
            {"warnings": [], "selector": "google", "v": "DKIM1", "k": "rsa", "p": "KEY",
             "raw": "v=DKIM1; k=rsa; p=KEY"}
        ])
    );
    assert_eq!(value["spf_lookup_count"], 1);
    assert_eq!(value["warnings"], json!([]));
}

#[tokio::test]
async fn test_dkim_found_through_cname() {
    let client = TableDnsClient::new()
        .with_cname("s1._domainkey.example.com", "s1.domainkey.provider.net")
        .with_txt("s1.domainkey.provider.net", "v=DKIM1; p=DELEGATED");
    let selectors = vec!["s1".to_string()];
    let report = dnscheck::analysis::analyze_with_selectors(&client, "example.com", &selectors).await;
    assert_eq!(report.dkim.results.len(), 1);
    assert_eq!(report.dkim.results[0].record.tag("p"), Some("DELEGATED"));
}

#[tokio::test]
async fn test_eleven_lookups_through_include_chain() {
    // example.com includes hop1, hop1 includes hop2, ... each include costs one lookup
    let mut client = TableDnsClient::new();
    for hop in 0..11 {
        let name = if hop == 0 {
            "example.com".to_string()
        } else {
            format!("hop{hop}.example.net")
        };
        let next = format!("hop{}.example.net", hop + 1);
        client = client.with_txt(&name, &format!("v=spf1 include:{next} -all"));
    }
    client = client.with_txt("hop11.example.net", "v=spf1 -all");

    let report = analyze_domain(&client, "example.com").await;
    assert_eq!(report.spf_lookup_count, Some(11));
    assert_eq!(report.spf.warnings, vec![WarningCode::LookupsLimit]);
}

#[tokio::test]
async fn test_ten_lookups_through_include_chain() {
    // One hop short of the chain above: exactly at the limit is still fine
    let mut client = TableDnsClient::new();
    for hop in 0..10 {
        let name = if hop == 0 {
            "example.com".to_string()
        } else {
            format!("hop{hop}.example.net")
        };
        let next = format!("hop{}.example.net", hop + 1);
        client = client.with_txt(&name, &format!("v=spf1 include:{next} -all"));
    }
    client = client.with_txt("hop10.example.net", "v=spf1 -all");

    let report = analyze_domain(&client, "example.com").await;
    assert_eq!(report.spf_lookup_count, Some(10));
    assert!(report.spf.warnings.is_empty());
}

#[tokio::test]
async fn test_lookup_limit_boundary() {
    let client = TableDnsClient::new()
        .with_txt("ten.example", &spf_with_lookups(10))
        .with_txt("eleven.example", &spf_with_lookups(11))
        .with_txt("many.example", &spf_with_lookups(40));

    let ten = analyze_domain(&client, "ten.example").await;
    assert_eq!(ten.spf_lookup_count, Some(10));
    assert!(ten.spf.warnings.is_empty());

    let eleven = analyze_domain(&client, "eleven.example").await;
    assert_eq!(eleven.spf_lookup_count, Some(11));
    assert_eq!(eleven.spf.warnings, vec![WarningCode::LookupsLimit]);

    let many = analyze_domain(&client, "many.example").await;
    assert_eq!(many.spf_lookup_count, Some(11));
}

#[tokio::test]
async fn test_include_cycle_terminates() {
    let client = TableDnsClient::new()
        .with_txt("a.example", "v=spf1 include:b.example mx -all")
        .with_txt("b.example", "v=spf1 include:c.example -all")
        .with_txt("c.example", "v=spf1 include:a.example -all");
    assert_eq!(count_lookups(&client, "a.example").await, Ok(4));
}

#[tokio::test]
async fn test_redirect_counts_like_include() {
    let client = TableDnsClient::new()
        .with_txt("example.com", "v=spf1 redirect=_spf.example.net")
        .with_txt("_spf.example.net", "v=spf1 a mx -all");
    let report = analyze_domain(&client, "example.com").await;
    assert_eq!(report.spf_lookup_count, Some(3));
}

#[tokio::test]
async fn test_lookup_fault_yields_null_count() {
    let client = TableDnsClient::new()
        .with_txt("example.com", "v=spf1 include:broken.example -all")
        .with_failure("broken.example");
    let report = analyze_domain(&client, "example.com").await;
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["spf_lookup_count"], serde_json::Value::Null);
    assert_eq!(value["spf"]["warnings"], json!([]));
}

#[tokio::test]
async fn test_analysis_is_idempotent() {
    let client = TableDnsClient::new()
        .with_txt("example.com", "v=spf1 include:one.example a:mail.example.com -all")
        .with_txt("one.example", "v=spf1 ip6:2001:db8::/32 ~all")
        .with_txt("_dmarc.example.com", "v=DMARC1; p=reject; sp=none; rua=mailto:r@example.com")
        .with_txt("20230601._domainkey.example.com", "v=DKIM1; p=ABC");

    let first = serde_json::to_string(&analyze_domain(&client, "example.com").await).unwrap();
    let second = serde_json::to_string(&analyze_domain(&client, "example.com").await).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_mixed_case_input() {
    let client = TableDnsClient::new().with_txt("example.com", "v=spf1 mx -all");
    let report = analyze_domain(&client, "Example.COM").await;
    assert!(report.spf.warnings.is_empty());
    assert_eq!(report.spf_lookup_count, Some(1));
}
