#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Value as JsonValue, json};

use target_whatagraph::ExportResult;
use target_whatagraph::api::{ApiRequest, ApiResponse, Method, Transport};
use target_whatagraph::observability::ExportObserver;
use target_whatagraph::report::SoftFailure;

/// In-memory stand-in for the integration API.
///
/// Created metrics/dimensions become visible to later listings, so repeated columns across
/// datasets behave as they would remotely.
#[derive(Default)]
pub struct FakeWhatagraph {
    pub metrics: RefCell<Vec<String>>,
    pub dimensions: RefCell<Vec<String>>,
    pub source_data: RefCell<Vec<JsonValue>>,
    pub requests: RefCell<Vec<ApiRequest>>,
    failures: RefCell<Vec<(Method, String, u16)>>,
}

impl FakeWhatagraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(self, names: &[&str]) -> Self {
        self.metrics.borrow_mut().extend(names.iter().map(|s| s.to_string()));
        self
    }

    pub fn with_dimensions(self, names: &[&str]) -> Self {
        self.dimensions.borrow_mut().extend(names.iter().map(|s| s.to_string()));
        self
    }

    /// Answer every `method` request to `path` with `status` and an error body.
    pub fn failing(self, method: Method, path: &str, status: u16) -> Self {
        self.failures.borrow_mut().push((method, path.to_string(), status));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    /// `"METHOD path"` for every request, in order.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| {
                let method = match r.method {
                    Method::Get => "GET",
                    Method::Post => "POST",
                    Method::Delete => "DELETE",
                };
                format!("{method} {}", r.path)
            })
            .collect()
    }

    fn listing(names: &[String]) -> ApiResponse {
        let data: Vec<JsonValue> = names
            .iter()
            .enumerate()
            .map(|(i, n)| json!({"id": i + 1, "name": n}))
            .collect();
        ApiResponse::new(200, json!({ "data": data }).to_string())
    }
}

impl Transport for FakeWhatagraph {
    fn send(&self, request: &ApiRequest) -> ExportResult<ApiResponse> {
        self.requests.borrow_mut().push(request.clone());

        let failure = self
            .failures
            .borrow()
            .iter()
            .find(|(m, p, _)| *m == request.method && *p == request.path)
            .map(|(_, _, status)| *status);
        if let Some(status) = failure {
            return Ok(ApiResponse::new(status, r#"{"message":"Server Error"}"#));
        }

        let name = || {
            request
                .body
                .as_ref()
                .and_then(|b| b.get("name"))
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let response = match (request.method, request.path.as_str()) {
            (Method::Get, "/v1/integration-metrics") => Self::listing(&self.metrics.borrow()),
            (Method::Get, "/v1/integration-dimensions") => Self::listing(&self.dimensions.borrow()),
            (Method::Post, "/v1/integration-metrics") => {
                self.metrics.borrow_mut().push(name());
                ApiResponse::new(201, "{}")
            }
            (Method::Post, "/v1/integration-dimensions") => {
                self.dimensions.borrow_mut().push(name());
                ApiResponse::new(201, "{}")
            }
            (Method::Post, "/v1/integration-source-data") => {
                let rows = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("data"))
                    .and_then(JsonValue::as_array)
                    .cloned()
                    .unwrap_or_default();
                self.source_data.borrow_mut().extend(rows);
                ApiResponse::new(200, "{}")
            }
            (Method::Get, "/v1/integration-source-data") => {
                let data: Vec<JsonValue> = (1..=self.source_data.borrow().len())
                    .map(|id| json!({ "id": id }))
                    .collect();
                ApiResponse::new(200, json!({ "data": data }).to_string())
            }
            (Method::Delete, path) if path.starts_with("/v1/integration-source-data/") => {
                ApiResponse::new(204, "")
            }
            _ => ApiResponse::new(404, r#"{"message":"Not Found"}"#),
        };
        Ok(response)
    }
}

/// Transport that always returns a fixed response.
pub struct FixedResponse(pub ApiResponse);

impl Transport for FixedResponse {
    fn send(&self, _request: &ApiRequest) -> ExportResult<ApiResponse> {
        Ok(self.0.clone())
    }
}

/// Transport that fails like an unreachable host.
pub struct Unreachable;

impl Transport for Unreachable {
    fn send(&self, _request: &ApiRequest) -> ExportResult<ApiResponse> {
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused").into())
    }
}

/// Answers listings like [`FakeWhatagraph`] but loses the connection on every POST.
#[derive(Default)]
pub struct PostsUnreachable(pub FakeWhatagraph);

impl Transport for PostsUnreachable {
    fn send(&self, request: &ApiRequest) -> ExportResult<ApiResponse> {
        if request.method == Method::Post {
            return Unreachable.send(request);
        }
        self.0.send(request)
    }
}

/// Write `contents` to a fresh temp directory as `file_name` and return the file path.
pub fn input_file(file_name: &str, contents: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("target-whatagraph-input-{nanos}"));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(file_name);
    fs::write(&path, contents).unwrap();
    path
}

#[derive(Default)]
pub struct RecordingObserver {
    pub soft_failures: Mutex<Vec<SoftFailure>>,
    pub created: Mutex<Vec<String>>,
    pub runs_finished: Mutex<usize>,
}

impl ExportObserver for RecordingObserver {
    fn on_schema_created(&self, _dataset: &str, _kind: target_whatagraph::api::SchemaKind, name: &str) {
        self.created.lock().unwrap().push(name.to_string());
    }

    fn on_soft_failure(&self, failure: &SoftFailure) {
        self.soft_failures.lock().unwrap().push(failure.clone());
    }

    fn on_run_finished(&self, _report: &target_whatagraph::report::RunReport) {
        *self.runs_finished.lock().unwrap() += 1;
    }
}
