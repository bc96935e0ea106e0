//! Observer hooks for export progress.
//!
//! Loading, reconciliation and upload report what they do to an [`ExportObserver`] passed in by
//! the caller. [`TracingObserver`] forwards events to `tracing`; [`NoopObserver`] drops them.

use crate::api::SchemaKind;
use crate::report::{PurgeReport, RunReport, SoftFailure};
use crate::types::DataSet;

/// Observer interface for export events.
///
/// All methods default to doing nothing.
pub trait ExportObserver: Send + Sync {
    /// A dataset was loaded from `files` input files.
    fn on_dataset_loaded(&self, _dataset: &DataSet, _files: usize) {}

    /// An existence check for `name` completed.
    fn on_schema_checked(&self, _dataset: &str, _kind: SchemaKind, _name: &str, _exists: bool) {}

    /// A creation request for `name` got a response. A non-2xx status is also reported through
    /// [`on_soft_failure`](Self::on_soft_failure).
    fn on_schema_created(&self, _dataset: &str, _kind: SchemaKind, _name: &str) {}

    /// A batch of `rows` records was posted.
    fn on_batch_sent(&self, _dataset: &str, _batch: usize, _rows: usize) {}

    /// A remote call returned a non-2xx status.
    fn on_soft_failure(&self, _failure: &SoftFailure) {}

    /// All datasets were processed.
    fn on_run_finished(&self, _report: &RunReport) {}

    /// A purge completed.
    fn on_purge_finished(&self, _report: &PurgeReport) {}
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ExportObserver for NoopObserver {}

/// Emits events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ExportObserver for TracingObserver {
    fn on_dataset_loaded(&self, dataset: &DataSet, files: usize) {
        tracing::info!(
            dataset = %dataset.name,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            files,
            "loaded dataset"
        );
    }

    fn on_schema_checked(&self, dataset: &str, kind: SchemaKind, name: &str, exists: bool) {
        tracing::debug!(dataset, %kind, name, exists, "checked remote schema object");
    }

    fn on_schema_created(&self, dataset: &str, kind: SchemaKind, name: &str) {
        tracing::debug!(dataset, %kind, name, "sent creation request");
    }

    fn on_batch_sent(&self, dataset: &str, batch: usize, rows: usize) {
        tracing::debug!(dataset, batch, rows, "posted source data");
    }

    fn on_soft_failure(&self, failure: &SoftFailure) {
        tracing::warn!(
            dataset = failure.dataset.as_deref().unwrap_or("-"),
            operation = %failure.operation,
            status = failure.status,
            body = %failure.body,
            "remote call failed; continuing"
        );
    }

    fn on_run_finished(&self, report: &RunReport) {
        let failures = report.soft_failure_count();
        if failures == 0 {
            tracing::info!(
                datasets = report.datasets.len(),
                rows = report.rows_uploaded(),
                "export finished"
            );
        } else {
            tracing::warn!(
                datasets = report.datasets.len(),
                rows = report.rows_uploaded(),
                soft_failures = failures,
                "export finished with remote errors"
            );
            for failure in report.soft_failures() {
                tracing::warn!("  {failure}");
            }
        }
    }

    fn on_purge_finished(&self, report: &PurgeReport) {
        tracing::info!(
            listed = report.listed,
            deleted = report.deleted,
            soft_failures = report.soft_failures.len(),
            "purge finished"
        );
    }
}
