// Integration tests for the report store client against a mock server.
// Run with: cargo test -p dash-store-client --test client

use std::time::Duration;

use dash_store_client::{ReportStoreClient, StoreError};
use httpmock::prelude::*;
use serde_json::json;

fn client(server: &MockServer) -> ReportStoreClient {
    ReportStoreClient::new(&server.url("/api/"), Duration::from_secs(5)).unwrap()
}

fn stored_report(id: &str, driver: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "file_name": format!("{id}.pdf"),
        "header": { "driver_name": driver, "dln": "D123", "report_date": "2024-01-05" },
        "policies": [
            { "header": { "policy_number": "P1", "effective_date": "2023-01-01", "expiry_date": "2024-01-01" } }
        ]
    })
}

#[test]
fn trailing_slash_is_trimmed() {
    let server = MockServer::start();
    let c = client(&server);
    assert!(c.api_base().ends_with("/api"));
}

#[test]
fn get_report_decodes_envelope() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/reports/r1");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "ok": true, "report": stored_report("r1", "John Smith") }));
    });

    let report = client(&server).get_report("r1").unwrap();
    mock.assert();
    assert_eq!(report.id.as_deref(), Some("r1"));
    assert_eq!(report.header.driver_name.as_deref(), Some("John Smith"));
    assert_eq!(report.policies.len(), 1);
}

#[test]
fn get_report_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/reports/missing");
        then.status(404).json_body(json!({ "detail": "Not found" }));
    });

    let err = client(&server).get_report("missing").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id == "missing"), "got {err:?}");
}

#[test]
fn server_error_carries_detail() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/reports/r1");
        then.status(500).json_body(json!({ "detail": "PDF generation failed" }));
    });

    match client(&server).get_report("r1") {
        Err(StoreError::Http(500, msg)) => assert_eq!(msg, "PDF generation failed"),
        other => panic!("expected HTTP 500, got {other:?}"),
    }
}

#[test]
fn ok_false_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/reports/r1");
        then.status(200).json_body(json!({ "ok": false, "error": "store offline" }));
    });

    match client(&server).get_report("r1") {
        Err(StoreError::Rejected(msg)) => assert_eq!(msg, "store offline"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn list_reports_summarizes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/reports");
        then.status(200).json_body(json!({
            "ok": true,
            "reports": [
                stored_report("r1", "John Smith"),
                { "file_name": "no-id.pdf" },
                stored_report("r2", "Jane Doe")
            ]
        }));
    });

    let list = client(&server).list_reports().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, "r1");
    assert_eq!(list[0].driver_name.as_deref(), Some("John Smith"));
    assert_eq!(list[0].report_date.as_deref(), Some("2024-01-05"));
    assert_eq!(list[0].policy_count, 1);
    assert_eq!(list[1].file_name.as_deref(), Some("r2.pdf"));

    let json = serde_json::to_value(&list[0]).unwrap();
    assert_eq!(json["_id"], "r1");
}

#[test]
fn delete_report_returns_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/reports/r1");
        then.status(200).json_body(json!({ "ok": true, "message": "Report deleted" }));
    });

    assert_eq!(client(&server).delete_report("r1").unwrap(), "Report deleted");
    mock.assert();
}

#[test]
fn export_returns_bytes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/export/r1");
        then.status(200)
            .header("content-type", "application/pdf")
            .body("%PDF-1.4 fake");
    });

    let bytes = client(&server).export_report("r1").unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn parse_uploads_file() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/parse");
        then.status(200).json_body(json!({ "ok": true, "report": stored_report("r9", "Sam Lee") }));
    });

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("sample.pdf");
    std::fs::write(&pdf, b"%PDF-1.4").unwrap();

    let report = client(&server).parse_pdf(&pdf).unwrap();
    mock.assert();
    assert_eq!(report.id.as_deref(), Some("r9"));
}

#[test]
fn parse_missing_file_is_io_error() {
    let server = MockServer::start();
    let err = client(&server)
        .parse_pdf(std::path::Path::new("/nonexistent/dir/x.pdf"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}

#[test]
fn diff_decodes_entries() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/diff");
        then.status(200).json_body(json!({
            "ok": true,
            "diff": [ { "path": "header.status", "A": "Active", "B": "Cancelled" } ]
        }));
    });

    let entries = client(&server)
        .diff(&json!({ "header": { "status": "Active" } }), &json!({ "header": { "status": "Cancelled" } }))
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "header.status");
    assert_eq!(entries[0].a, json!("Active"));
}

#[test]
fn unreachable_store_is_network_error() {
    // Port 9 (discard) is not listening in the test environment.
    let c = ReportStoreClient::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
    assert!(matches!(c.list_reports(), Err(StoreError::Network(_))));
}
