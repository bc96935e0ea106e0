//! Source-data upload.

use crate::api::{Transport, WhatagraphClient};
use crate::error::ExportResult;
use crate::format::format_records;
use crate::observability::ExportObserver;
use crate::report::{Operation, SoftFailure, UploadReport};
use crate::types::DataSet;

/// Options controlling upload batching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Maximum records per request. `None` sends the whole dataset in one request.
    pub batch_size: Option<usize>,
}

/// Post every row of `dataset` to the source-data endpoint.
///
/// Records keep row order, both inside a request and across requests. An empty dataset is still
/// posted once, as `{"data": []}`. The remote does not deduplicate, so re-running an export
/// duplicates its rows.
///
/// Non-2xx responses are recorded as soft failures; remaining batches are still sent.
pub fn upload<T: Transport>(
    client: &WhatagraphClient<T>,
    dataset: &DataSet,
    options: &UploadOptions,
    observer: &dyn ExportObserver,
) -> ExportResult<UploadReport> {
    let records = format_records(dataset);
    let mut report = UploadReport {
        rows: records.len(),
        ..Default::default()
    };

    let batches: Vec<&[_]> = match options.batch_size {
        Some(size) if size > 0 && !records.is_empty() => records.chunks(size).collect(),
        _ => vec![records.as_slice()],
    };

    for (batch, chunk) in batches.into_iter().enumerate() {
        let outcome = client.post_source_data(chunk)?;
        report.batches += 1;
        observer.on_batch_sent(&dataset.name, batch, chunk.len());
        if let Some(failure) = SoftFailure::from_outcome(Some(&dataset.name), Operation::Upload { batch }, outcome) {
            observer.on_soft_failure(&failure);
            report.soft_failures.push(failure);
        }
    }

    Ok(report)
}
