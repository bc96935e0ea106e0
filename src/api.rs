//! Whatagraph integration API client.
//!
//! [`WhatagraphClient`] speaks the handful of endpoints the exporter needs. It is generic over a
//! [`Transport`] so the request sequence can be driven by [`HttpTransport`] in production and by
//! an in-memory fake in tests.
//!
//! Remote error statuses are never turned into [`ExportError`]s: each call reports a
//! [`CallOutcome`], and [`CallOutcome::SoftFailure`] carries the status and body so the caller can
//! record it and carry on.

use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value as JsonValue, json};

use crate::error::{ExportError, ExportResult};
use crate::format::Record;

/// Default API root.
pub const DEFAULT_API_URL: &str = "https://api.whatagraph.com";

const METRICS_PATH: &str = "/v1/integration-metrics";
const DIMENSIONS_PATH: &str = "/v1/integration-dimensions";
const SOURCE_DATA_PATH: &str = "/v1/integration-source-data";

/// HTTP method subset used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// A request relative to the API root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path starting with `/v1/`.
    pub path: String,
    /// JSON body; sent with `Content-Type: application/json` when present.
    pub body: Option<JsonValue>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: JsonValue) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn outcome(&self) -> CallOutcome {
        if self.is_success() {
            CallOutcome::Ok
        } else {
            CallOutcome::SoftFailure {
                status: self.status,
                body: self.body.clone(),
            }
        }
    }
}

/// Sends one request and waits for the response.
///
/// Implementations return `Err` only for transport-level failures; any HTTP status, including
/// 4xx/5xx, is a successful `ApiResponse`.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> ExportResult<ApiResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ApiRequest) -> ExportResult<ApiResponse> {
        (**self).send(request)
    }
}

/// Blocking HTTPS transport with bearer authentication.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport that sends `Authorization: Bearer <access_token>` and
    /// `Accept: application/json` on every request.
    ///
    /// Fails with [`ExportError::Config`] when the token is empty or cannot be encoded as a header
    /// value, so a malformed header is never sent.
    pub fn new(base_url: impl Into<String>, access_token: &str, timeout: Duration) -> ExportResult<Self> {
        if access_token.trim().is_empty() {
            return Err(ExportError::config("access_token is empty"));
        }
        let mut auth = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|_| ExportError::config("access_token contains characters not allowed in an HTTP header"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> ExportResult<ApiResponse> {
        let url = self.url(&request.path);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(ApiResponse { status, body })
    }
}

/// Result of one remote call that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Ok,
    /// Non-2xx response; logged and recorded, never fatal.
    SoftFailure { status: u16, body: String },
}

/// Kind of remote schema object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Metric,
    Dimension,
}

impl SchemaKind {
    /// Collection path for this kind.
    pub fn path(self) -> &'static str {
        match self {
            SchemaKind::Metric => METRICS_PATH,
            SchemaKind::Dimension => DIMENSIONS_PATH,
        }
    }

    /// Creation payload; `name` doubles as the `external_id`.
    pub fn creation_payload(self, name: &str) -> JsonValue {
        match self {
            SchemaKind::Metric => json!({
                "name": name,
                "external_id": name,
                "type": "int",
                "accumulator": "sum",
                "negative_ratio": false,
            }),
            SchemaKind::Dimension => json!({
                "name": name,
                "external_id": name,
                "type": "string",
            }),
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Metric => f.write_str("metric"),
            SchemaKind::Dimension => f.write_str("dimension"),
        }
    }
}

/// Items of a listing endpoint's `data` array.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub outcome: CallOutcome,
    /// Always empty when `outcome` is a soft failure.
    pub data: Vec<JsonValue>,
}

impl Listing {
    /// Returns `true` if an item's `name` equals `name` exactly.
    pub fn contains_name(&self, name: &str) -> bool {
        self.data
            .iter()
            .any(|item| item.get("name").and_then(JsonValue::as_str) == Some(name))
    }
}

/// Typed access to the integration endpoints.
#[derive(Debug)]
pub struct WhatagraphClient<T> {
    transport: T,
}

impl<T: Transport> WhatagraphClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// `GET /v1/integration-{metrics|dimensions}`.
    pub fn list_schema_objects(&self, kind: SchemaKind) -> ExportResult<Listing> {
        self.list(kind.path())
    }

    /// `POST /v1/integration-{metrics|dimensions}` with the fixed creation payload.
    pub fn create_schema_object(&self, kind: SchemaKind, name: &str) -> ExportResult<CallOutcome> {
        let response = self
            .transport
            .send(&ApiRequest::post(kind.path(), kind.creation_payload(name)))?;
        Ok(response.outcome())
    }

    /// `POST /v1/integration-source-data` with body `{"data": records}`.
    pub fn post_source_data(&self, records: &[Record]) -> ExportResult<CallOutcome> {
        let body = json!({ "data": records });
        let response = self.transport.send(&ApiRequest::post(SOURCE_DATA_PATH, body))?;
        Ok(response.outcome())
    }

    /// `GET /v1/integration-source-data`.
    pub fn list_source_data(&self) -> ExportResult<Listing> {
        self.list(SOURCE_DATA_PATH)
    }

    /// `DELETE /v1/integration-source-data/{id}`.
    pub fn delete_source_data(&self, id: &str) -> ExportResult<CallOutcome> {
        let response = self
            .transport
            .send(&ApiRequest::delete(format!("{SOURCE_DATA_PATH}/{id}")))?;
        Ok(response.outcome())
    }

    fn list(&self, path: &str) -> ExportResult<Listing> {
        let response = self.transport.send(&ApiRequest::get(path))?;
        if !response.is_success() {
            return Ok(Listing {
                outcome: response.outcome(),
                data: Vec::new(),
            });
        }

        let malformed = |message: String| ExportError::MalformedResponse {
            endpoint: path.to_owned(),
            message,
        };
        let parsed: JsonValue = serde_json::from_str(&response.body).map_err(|e| malformed(e.to_string()))?;
        let data = match parsed.get("data") {
            Some(JsonValue::Array(items)) => items.clone(),
            Some(_) => return Err(malformed("'data' is not an array".to_string())),
            None => return Err(malformed("missing 'data' key".to_string())),
        };

        Ok(Listing {
            outcome: CallOutcome::Ok,
            data,
        })
    }
}
