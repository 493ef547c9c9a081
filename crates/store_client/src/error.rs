use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {0}: {1}")]
    Http(u16, String),

    #[error("report not found: {0}")]
    NotFound(String),

    /// Store answered with `"ok": false`.
    #[error("store rejected request: {0}")]
    Rejected(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("settings error: {0}")]
    Settings(String),
}
