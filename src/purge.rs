//! Maintenance: delete every source-data record.
//!
//! Used to reset an integration between test runs. The exporter never calls this.

use serde_json::Value as JsonValue;

use crate::api::{Transport, WhatagraphClient};
use crate::error::{ExportError, ExportResult};
use crate::observability::ExportObserver;
use crate::report::{Operation, PurgeReport, SoftFailure};

/// List all source-data records and delete each one by `id`.
///
/// A failed listing or delete is recorded as a soft failure. A listed record without a usable
/// `id` is a [`ExportError::MalformedResponse`].
pub fn purge<T: Transport>(client: &WhatagraphClient<T>, observer: &dyn ExportObserver) -> ExportResult<PurgeReport> {
    let listing = client.list_source_data()?;
    let mut report = PurgeReport {
        listed: listing.data.len(),
        ..Default::default()
    };
    if let Some(failure) = SoftFailure::from_outcome(None, Operation::ListSourceData, listing.outcome) {
        observer.on_soft_failure(&failure);
        report.soft_failures.push(failure);
    }

    for item in &listing.data {
        let id = record_id(item)?;
        let outcome = client.delete_source_data(&id)?;
        match SoftFailure::from_outcome(None, Operation::DeleteSourceData { id }, outcome) {
            None => report.deleted += 1,
            Some(failure) => {
                observer.on_soft_failure(&failure);
                report.soft_failures.push(failure);
            }
        }
    }

    observer.on_purge_finished(&report);
    Ok(report)
}

fn record_id(item: &JsonValue) -> ExportResult<String> {
    match item.get("id") {
        Some(JsonValue::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(JsonValue::Number(n)) => Ok(n.to_string()),
        _ => Err(ExportError::MalformedResponse {
            endpoint: "/v1/integration-source-data".to_string(),
            message: format!("record without an id: {item}"),
        }),
    }
}
