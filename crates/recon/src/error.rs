use thiserror::Error;

/// Errors raised outside the reconciliation pass itself.
///
/// Reconciliation never fails on report content; these cover loading
/// configuration and decoding report documents.
#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (out-of-range window, empty placeholder, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    /// Report document is not valid JSON or not an object.
    #[error("report decode error: {0}")]
    ReportDecode(String),

    /// IO error (file read, etc.).
    #[error("IO error: {0}")]
    Io(String),
}
