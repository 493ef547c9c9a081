//! Report store client — the only crate in the workspace that talks to the
//! network.
//!
//! Blocking reqwest (no Tokio runtime required). Failures surface once to
//! the caller; nothing is retried.

mod client;
mod error;
mod settings;

pub use client::{ReportStoreClient, ReportSummary};
pub use error::StoreError;
pub use settings::{load_settings, save_settings, settings_file_path, StoreSettings, DEFAULT_API_BASE};
