//! Full pipeline test: paged zone listing → reduction → record collection →
//! CSV emission, driven by a scripted in-memory page fetcher.

use async_trait::async_trait;
use serde_json::{Value, json};

use grid_export_wapi::{
    Page, PageFetcher, PageQuery, RecordKind, Result, WapiError, collect_all, fetch_zones,
    reduce_zones, write_report,
};

/// Scripted grid: pages the zone listing in two, serves canned record rows,
/// and fails a.com's A-record fetch.
struct ScriptedGrid;

fn filter<'q>(query: &'q PageQuery, key: &str) -> &'q str {
    query
        .filters
        .iter()
        .find(|(k, _)| k == key)
        .map_or("", |(_, v)| v.as_str())
}

fn zone_row(dns_fqdn: &str, parent: &str) -> Value {
    json!({
        "dns_fqdn": dns_fqdn,
        "parent": parent,
        "view": "default",
        "network_view": "default",
    })
}

#[async_trait]
impl PageFetcher for ScriptedGrid {
    async fn first_page(&self, object: &str, query: &PageQuery) -> Result<Page> {
        match object {
            "zone_auth" => Ok(Page {
                // First page: a sub-zone ahead of its parent, plus b.com.
                result: vec![zone_row("sub.a.com", "a.com"), zone_row("b.com", "")],
                next_page_id: Some("zones-2".to_string()),
            }),
            "allrecords" => {
                let zone = filter(query, "zone");
                let rtype = filter(query, "type");
                match (zone, rtype) {
                    ("a.com", "record:a") => Err(WapiError::Api {
                        object: object.to_string(),
                        text: "quota exceeded".to_string(),
                    }),
                    ("a.com", "record:cname") => Ok(Page {
                        result: vec![json!({
                            "type": "record:cname",
                            "name": "mail.a.com",
                            "record": {"canonical": "www.a.com"},
                        })],
                        next_page_id: None,
                    }),
                    ("b.com", "record:a") => Ok(Page {
                        result: vec![json!({
                            "type": "record:a",
                            "name": "www.b.com",
                            "address": "192.0.2.10",
                        })],
                        // b.com's A records span two pages.
                        next_page_id: Some("b-a-2".to_string()),
                    }),
                    _ => Ok(Page::default()),
                }
            }
            other => panic!("unexpected object {other}"),
        }
    }

    async fn next_page(&self, object: &str, page_id: &str) -> Result<Page> {
        match (object, page_id) {
            ("zone_auth", "zones-2") => Ok(Page {
                result: vec![zone_row("a.com", "")],
                next_page_id: None,
            }),
            ("allrecords", "b-a-2") => Ok(Page {
                result: vec![json!({
                    "type": "record:a",
                    "name": "ftp.b.com",
                    "address": "192.0.2.11",
                })],
                next_page_id: None,
            }),
            other => panic!("unexpected cursor {other:?}"),
        }
    }
}

#[tokio::test]
async fn partial_failures_still_produce_a_complete_report() {
    let grid = ScriptedGrid;

    let raw = fetch_zones(&grid).await.expect("zone listing must succeed");
    assert_eq!(raw.len(), 3, "both zone pages must be concatenated");

    let mut zones = reduce_zones(raw);
    assert_eq!(zones.len(), 2, "sub.a.com folds into a.com");

    let failures = collect_all(&grid, &mut zones).await;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].zone, "a.com");
    assert_eq!(failures[0].kind, RecordKind::A);
    assert!(
        matches!(&failures[0].error, WapiError::Api { text, .. } if text == "quota exceeded"),
        "unexpected error: {:?}",
        failures[0].error
    );

    let mut buf = Vec::new();
    write_report(&mut buf, &zones).expect("writing to a Vec cannot fail");
    let report = String::from_utf8(buf).expect("report must be valid UTF-8");

    // a.com sorts first, keeps its CNAME despite the failed A fetch; b.com's
    // two A pages arrive in page order.
    assert_eq!(
        report,
        "Zone,Type,Name,Value\n\
         a.com,CNAME,mail.a.com,www.a.com\n\
         b.com,A,www.b.com,192.0.2.10\n\
         b.com,A,ftp.b.com,192.0.2.11\n"
    );
}
