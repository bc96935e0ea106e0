//! Run configuration.
//!
//! The configuration is a JSON object. `access_token` and `input_path` are required; the other
//! keys are optional and anything unrecognised is ignored.
//!
//! ```json
//! {
//!   "access_token": "wg_...",
//!   "input_path": "/data/etl-output",
//!   "api_url": "https://api.whatagraph.com",
//!   "timeout_secs": 30,
//!   "batch_size": 1000
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::api::DEFAULT_API_URL;
use crate::error::{ExportError, ExportResult};
use crate::upload::UploadOptions;

/// Request timeout used when `timeout_secs` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize)]
struct RawConfig {
    access_token: Option<String>,
    input_path: Option<PathBuf>,
    api_url: Option<String>,
    timeout_secs: Option<u64>,
    batch_size: Option<usize>,
}

/// Validated run configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Bearer token for the Whatagraph API.
    pub access_token: String,
    /// Folder (or single file) holding the delimited input files.
    pub input_path: PathBuf,
    /// API root, without the `/v1` prefix.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum records per upload request; `None` uploads each dataset in one request.
    pub batch_size: Option<usize>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &"<redacted>")
            .field("input_path", &self.input_path)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ExportError::config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(input: &str) -> ExportResult<Self> {
        let raw: RawConfig = serde_json::from_str(input)?;

        let access_token = raw
            .access_token
            .ok_or_else(|| ExportError::config("missing required key 'access_token'"))?;
        if access_token.trim().is_empty() {
            return Err(ExportError::config("access_token is empty"));
        }
        let input_path = raw
            .input_path
            .ok_or_else(|| ExportError::config("missing required key 'input_path'"))?;

        let timeout_secs = raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ExportError::config("timeout_secs must be > 0"));
        }
        if raw.batch_size == Some(0) {
            return Err(ExportError::config("batch_size must be > 0 when set"));
        }

        Ok(Self {
            access_token,
            input_path,
            api_url: raw.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            batch_size: raw.batch_size,
        })
    }

    /// Upload options derived from this config.
    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions {
            batch_size: self.batch_size,
        }
    }
}
