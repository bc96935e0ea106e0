use thiserror::Error;

/// Convenience result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Error type returned by loading, reconciliation and upload.
///
/// Everything in this enum is fatal for a run. Remote API errors (non-2xx responses) are not
/// errors: they are reported as [`crate::api::CallOutcome::SoftFailure`] and the run continues.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV/TSV reading error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decoding/encoding error (configuration or payloads).
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration is missing a required key or holds an unusable value.
    #[error("invalid config: {message}")]
    Config { message: String },

    /// Input files do not form a usable dataset (no headers, inconsistent rows, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// Transport-level failure (DNS, connection refused, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A successful response whose body could not be interpreted.
    #[error("malformed response from '{endpoint}': {message}")]
    MalformedResponse { endpoint: String, message: String },
}

impl ExportError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
