//! The report currently loaded by a command, with its reconciled view.
//!
//! Owned by the command handler for one invocation; the recon engine itself
//! keeps no state between passes.

use std::path::Path;

use chrono::NaiveDate;
use dash_recon::{ReconConfig, ReconResult, Report};
use dash_store_client::ReportStoreClient;

use crate::exit_codes::EXIT_RECON_INPUT;
use crate::CliError;

/// Where the loaded report came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOrigin {
    File(String),
    Store(String),
    Upload(String),
}

impl std::fmt::Display for ReportOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportOrigin::File(path) => write!(f, "file {path}"),
            ReportOrigin::Store(id) => write!(f, "store report {id}"),
            ReportOrigin::Upload(path) => write!(f, "upload {path}"),
        }
    }
}

pub struct ReportSession {
    pub origin: ReportOrigin,
    pub report: Report,
    pub result: ReconResult,
}

impl ReportSession {
    fn reconcile(origin: ReportOrigin, report: Report, config: &ReconConfig, today: NaiveDate) -> Self {
        tracing::debug!(%origin, policies = report.policies.len(), "reconciling report");
        let result = dash_recon::run(&report, config, today);
        Self { origin, report, result }
    }

    /// Load a report JSON file (bare or store envelope).
    pub fn from_file(path: &Path, config: &ReconConfig, today: NaiveDate) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::new(EXIT_RECON_INPUT, format!("cannot read {}: {e}", path.display()))
        })?;
        let report = Report::from_json(&text).map_err(|e| {
            CliError::new(EXIT_RECON_INPUT, format!("{}: {e}", path.display()))
                .with_hint("expected a report object or {\"ok\": true, \"report\": {...}}")
        })?;
        Ok(Self::reconcile(ReportOrigin::File(path.display().to_string()), report, config, today))
    }

    /// Fetch a stored report by id.
    pub fn from_store(
        client: &ReportStoreClient,
        id: &str,
        config: &ReconConfig,
        today: NaiveDate,
    ) -> Result<Self, CliError> {
        let report = client.get_report(id).map_err(CliError::store)?;
        Ok(Self::reconcile(ReportOrigin::Store(id.to_string()), report, config, today))
    }

    /// Upload a PDF for extraction and reconcile the returned report.
    pub fn from_upload(
        client: &ReportStoreClient,
        pdf: &Path,
        config: &ReconConfig,
        today: NaiveDate,
    ) -> Result<Self, CliError> {
        let report = client.parse_pdf(pdf).map_err(CliError::store)?;
        Ok(Self::reconcile(ReportOrigin::Upload(pdf.display().to_string()), report, config, today))
    }

    pub fn report_id(&self) -> Option<&str> {
        self.result.meta.report_id.as_deref()
    }
}
