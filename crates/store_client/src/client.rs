//! Report store HTTP client.
//!
//! Every JSON endpoint answers with an `{"ok": bool, ...}` envelope; a false
//! `ok` is surfaced as `StoreError::Rejected`.

use std::path::Path;
use std::time::Duration;

use dash_recon::diff::DiffEntry;
use dash_recon::report::present;
use dash_recon::Report;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::settings::StoreSettings;

/// Report store API client (blocking).
#[derive(Clone)]
pub struct ReportStoreClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

/// One entry of the stored-report listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub file_name: Option<String>,
    pub driver_name: Option<String>,
    pub report_date: Option<String>,
    pub policy_count: usize,
}

impl ReportSummary {
    fn from_report(report: &Report) -> Option<Self> {
        Some(Self {
            id: present(&report.id)?.to_string(),
            file_name: present(&report.file_name).map(str::to_string),
            driver_name: present(&report.header.driver_name).map(str::to_string),
            report_date: present(&report.header.report_date).map(str::to_string),
            policy_count: report.policies.len(),
        })
    }
}

impl ReportStoreClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, StoreError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("dash/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &StoreSettings) -> Result<Self, StoreError> {
        Self::new(&settings.api_base, Duration::from_secs(settings.timeout_secs))
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetch one stored report.
    pub fn get_report(&self, id: &str) -> Result<Report, StoreError> {
        let url = format!("{}/reports/{}", self.api_base, id);
        let body = self.envelope(self.send(self.http.get(&url), id)?)?;
        decode_report(body)
    }

    /// List stored reports. Entries without an id are skipped.
    pub fn list_reports(&self) -> Result<Vec<ReportSummary>, StoreError> {
        let url = format!("{}/reports", self.api_base);
        let mut body = self.envelope(self.send(self.http.get(&url), "reports")?)?;

        let items = match body.get_mut("reports").map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => return Err(StoreError::Parse("missing reports in response".into())),
        };

        Ok(items
            .into_iter()
            .filter_map(|item| Report::from_value(item).ok())
            .filter_map(|report| ReportSummary::from_report(&report))
            .collect())
    }

    /// Delete a stored report. Returns the store's confirmation message.
    pub fn delete_report(&self, id: &str) -> Result<String, StoreError> {
        let url = format!("{}/reports/{}", self.api_base, id);
        let body = self.envelope(self.send(self.http.delete(&url), id)?)?;
        Ok(body["message"].as_str().unwrap_or("Report deleted").to_string())
    }

    /// Download the rendered PDF for a stored report.
    pub fn export_report(&self, id: &str) -> Result<Vec<u8>, StoreError> {
        let url = format!("{}/export/{}", self.api_base, id);
        let response = self.send(self.http.get(&url), id)?;
        let bytes = response.bytes().map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Upload a PDF for extraction. The store returns the saved report.
    pub fn parse_pdf(&self, path: &Path) -> Result<Report, StoreError> {
        let data = std::fs::read(path)
            .map_err(|e| StoreError::Io(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report.pdf".into());

        let part = reqwest::blocking::multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let form = reqwest::blocking::multipart::Form::new().part("file", part);

        let url = format!("{}/parse", self.api_base);
        let body = self.envelope(self.send(self.http.post(&url).multipart(form), "parse")?)?;
        decode_report(body)
    }

    /// Server-side structural diff of two policies.
    pub fn diff(&self, a: &Value, b: &Value) -> Result<Vec<DiffEntry>, StoreError> {
        let url = format!("{}/diff", self.api_base);
        let request = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "policyA": a, "policyB": b }));
        let mut body = self.envelope(self.send(request, "diff")?)?;
        serde_json::from_value(body.get_mut("diff").map(Value::take).unwrap_or(Value::Null))
            .map_err(|e| StoreError::Parse(format!("diff: {e}")))
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        target: &str,
    ) -> Result<reqwest::blocking::Response, StoreError> {
        let response = request.send().map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        tracing::info!(status, resource = target, url = %response.url(), "store request");
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            if status == 404 {
                return Err(StoreError::NotFound(target.to_string()));
            }
            return Err(StoreError::Http(status, error_detail(&body)));
        }

        Ok(response)
    }

    fn envelope(&self, response: reqwest::blocking::Response) -> Result<Value, StoreError> {
        let body: Value = response.json().map_err(|e| StoreError::Parse(e.to_string()))?;
        if body["ok"].as_bool() == Some(true) {
            return Ok(body);
        }
        let message = ["error", "message", "detail"]
            .iter()
            .find_map(|k| body[*k].as_str())
            .unwrap_or("request was not accepted")
            .to_string();
        tracing::warn!(%message, "store rejected request");
        Err(StoreError::Rejected(message))
    }
}

fn decode_report(mut body: Value) -> Result<Report, StoreError> {
    match body.get_mut("report").map(Value::take) {
        Some(report @ Value::Object(_)) => {
            Report::from_value(report).map_err(|e| StoreError::Parse(e.to_string()))
        }
        _ => Err(StoreError::Parse("missing report in response".into())),
    }
}

/// FastAPI-style `{"detail": ...}` bodies collapse to their message.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["detail"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
