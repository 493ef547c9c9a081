// Integration tests for the `dash` binary.
// Run with: cargo test -p dash-cli --test cli

use std::path::PathBuf;
use std::process::{Command, Output};

use httpmock::prelude::*;
use serde_json::json;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../recon/tests/fixtures")
        .join(name)
}

fn dash(settings_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dash"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    // Never read the developer's real settings or store.
    cmd.env("DASH_SETTINGS", settings_dir.path().join("config.toml"));
    cmd.env_remove("DASH_API_BASE");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run dash")
}

fn assert_code(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "expected exit {code}, got {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr),
    );
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!("stdout is not JSON ({e}): {}", String::from_utf8_lossy(&output.stdout))
    })
}

// -------------------------------------------------------------------------
// recon
// -------------------------------------------------------------------------

#[test]
fn recon_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dash(&dir).args(["recon"]).arg(fixture("gap_report.json")).args([
        "--json",
        "--today",
        "2024-02-01",
    ]));
    assert_code(&output, 0);

    let json = stdout_json(&output);
    assert_eq!(json["policies"][0]["gap_label"], "Gap — 1 month");
    assert_eq!(json["policies"][0]["gap_text"], "Gap — 31 days");
    assert_eq!(json["continuity"]["days_to_expiry"], 0);
    assert_eq!(json["continuity"]["expiry_class"], "warning");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Expires today"), "stderr: {stderr}");
}

#[test]
fn recon_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("view.json");
    let output = run(dash(&dir)
        .args(["recon"])
        .arg(fixture("overlap_report.json"))
        .args(["--today", "2024-01-01", "--output"])
        .arg(&out));
    assert_code(&output, 0);
    assert!(output.stdout.is_empty());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["policies"][0]["gap_label"], "Overlap — 1 month");
}

#[test]
fn recon_fail_on_expired_exits_10() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dash(&dir)
        .args(["recon"])
        .arg(fixture("gap_report.json"))
        .args(["--today", "2024-03-01", "--fail-on-expired"]));
    assert_code(&output, 10);
    assert!(String::from_utf8_lossy(&output.stderr).contains("current policy expired"));
}

#[test]
fn recon_missing_file_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dash(&dir).args(["recon", "no-such-report.json"]));
    assert_code(&output, 3);
}

#[test]
fn recon_non_object_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    let output = run(dash(&dir).arg("recon").arg(&path));
    assert_code(&output, 3);
}

#[test]
fn recon_bad_today_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dash(&dir)
        .args(["recon"])
        .arg(fixture("gap_report.json"))
        .args(["--today", "02/01/2024"]));
    assert_code(&output, 2);
}

#[test]
fn recon_bad_config_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("recon.toml");
    std::fs::write(&config, "[expiry]\nwarning_days = 1000\n").unwrap();
    let output = run(dash(&dir)
        .args(["recon"])
        .arg(fixture("gap_report.json"))
        .arg("--config")
        .arg(&config));
    assert_code(&output, 4);
}

#[test]
fn recon_uses_settings_recon_table() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[recon.display]\nplaceholder = \"n/a\"\n",
    )
    .unwrap();
    let output = run(dash(&dir)
        .args(["recon"])
        .arg(fixture("gap_report.json"))
        .args(["--json", "--today", "2024-02-01"]));
    assert_code(&output, 0);
    assert_eq!(stdout_json(&output)["policies"][1]["gap_label"], "n/a");
}

// -------------------------------------------------------------------------
// diff + config
// -------------------------------------------------------------------------

#[test]
fn diff_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    std::fs::write(&a, r#"{"header": {"status": "Active"}, "operators": []}"#).unwrap();
    std::fs::write(&b, r#"{"header": {"status": "Cancelled"}, "operators": []}"#).unwrap();

    let same = run(dash(&dir).arg("diff").arg(&a).arg(&a));
    assert_code(&same, 0);

    let differ = run(dash(&dir).arg("diff").arg(&a).arg(&b));
    assert_code(&differ, 1);
    assert_eq!(
        String::from_utf8_lossy(&differ.stdout),
        "header.status: \"Active\" -> \"Cancelled\"\n"
    );

    let json = run(dash(&dir).arg("diff").arg(&a).arg(&b).arg("--json"));
    assert_code(&json, 1);
    assert_eq!(stdout_json(&json)[0]["path"], "header.status");
}

#[test]
fn config_validate() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.toml");
    let bad = dir.path().join("bad.toml");
    std::fs::write(&good, "[expiry]\nwarning_days = 14\n").unwrap();
    std::fs::write(&bad, "[expiry]\nwarn = 14\n").unwrap();

    assert_code(&run(dash(&dir).args(["config", "validate"]).arg(&good)), 0);
    assert_code(&run(dash(&dir).args(["config", "validate"]).arg(&bad)), 4);
}

#[test]
fn config_set_writes_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let set = run(dash(&dir).args(["config", "set", "api-base", "https://reports.example.com/api/"]));
    assert_code(&set, 0);
    assert_code(&run(dash(&dir).args(["config", "set", "timeout-secs", "15"])), 0);

    let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("api_base = \"https://reports.example.com/api\""), "{written}");
    assert!(written.contains("timeout_secs = 15"), "{written}");

    let show = run(dash(&dir).args(["config", "show"]));
    assert_code(&show, 0);
    assert!(String::from_utf8_lossy(&show.stdout).contains("timeout_secs = 15"));
}

#[test]
fn config_set_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    assert_code(&run(dash(&dir).args(["config", "set", "timeout-secs", "soon"])), 2);
    assert_code(&run(dash(&dir).args(["config", "set", "timeout-secs", "0"])), 2);
    assert_code(&run(dash(&dir).args(["config", "set", "api-base", "ftp://x"])), 2);
    assert!(!dir.path().join("config.toml").exists());
}

// -------------------------------------------------------------------------
// report (against a mock store)
// -------------------------------------------------------------------------

fn gap_report_envelope() -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(fixture("gap_report.json")).unwrap()).unwrap()
}

#[test]
fn report_show_reconciles_stored_report() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/reports/rpt_0001");
        then.status(200).json_body(gap_report_envelope());
    });

    let dir = tempfile::tempdir().unwrap();
    let output = run(dash(&dir)
        .args(["report", "show", "rpt_0001", "--json", "--today", "2024-01-01"])
        .args(["--api-base", &server.url("/api")]));
    assert_code(&output, 0);

    let json = stdout_json(&output);
    assert_eq!(json["meta"]["report_id"], "rpt_0001");
    assert_eq!(json["continuity"]["days_to_expiry"], 31);
    assert_eq!(json["continuity"]["expiry_class"], "ok");
}

#[test]
fn report_show_not_found_exits_41() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/reports/nope");
        then.status(404).json_body(json!({ "detail": "Not found" }));
    });

    let dir = tempfile::tempdir().unwrap();
    let output = run(dash(&dir)
        .args(["report", "show", "nope"])
        .args(["--api-base", &server.url("/api")]));
    assert_code(&output, 41);
}

#[test]
fn report_list_unreachable_exits_40() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dash(&dir).args(["report", "list", "--api-base", "http://127.0.0.1:9/api"]));
    assert_code(&output, 40);
    assert!(String::from_utf8_lossy(&output.stderr).contains("hint:"));
}

#[test]
fn report_export_writes_pdf() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/export/rpt_0001");
        then.status(200).header("content-type", "application/pdf").body("%PDF-1.4 test");
    });

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.pdf");
    let output = run(dash(&dir)
        .args(["report", "export", "rpt_0001", "--output"])
        .arg(&out)
        .args(["--api-base", &server.url("/api")]));
    assert_code(&output, 0);
    assert_eq!(std::fs::read(&out).unwrap(), b"%PDF-1.4 test");
}

#[test]
fn report_upload_rejects_non_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dash(&dir).args(["report", "upload"]).arg(fixture("gap_report.json")));
    assert_code(&output, 3);
}
