//! `dash-recon` — Policy timeline reconciliation for DASH driver reports.
//!
//! Pure engine crate: receives a decoded report, returns the derived view.
//! No CLI or network dependencies.

pub mod aggregate;
pub mod claims;
pub mod config;
pub mod dates;
pub mod diff;
pub mod engine;
pub mod error;
pub mod gap;
pub mod matcher;
pub mod model;
pub mod report;
pub mod terms;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{ContinuityMetrics, ExpiryClass, PolicyView, ReconResult};
pub use report::Report;
