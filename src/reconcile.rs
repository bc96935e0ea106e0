//! Schema reconciliation: make sure every exported column has a remote metric or dimension.

use std::collections::HashSet;

use crate::api::{SchemaKind, Transport, WhatagraphClient};
use crate::error::ExportResult;
use crate::observability::ExportObserver;
use crate::report::{Operation, ReconcileReport, SoftFailure};
use crate::types::{DataSet, DataType};

/// Column name passed through as the record timestamp; never reconciled.
pub const DATE_COLUMN: &str = "date";

/// What reconciliation does with a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Metric,
    Dimension,
    Skip,
}

impl ColumnRole {
    /// Remote object kind, or `None` for [`ColumnRole::Skip`].
    pub fn kind(self) -> Option<SchemaKind> {
        match self {
            ColumnRole::Metric => Some(SchemaKind::Metric),
            ColumnRole::Dimension => Some(SchemaKind::Dimension),
            ColumnRole::Skip => None,
        }
    }
}

/// Classify a column: `date` is skipped, integers are metrics, everything else is a dimension.
pub fn classify(name: &str, data_type: DataType) -> ColumnRole {
    if name == DATE_COLUMN {
        ColumnRole::Skip
    } else if data_type == DataType::Integer {
        ColumnRole::Metric
    } else {
        ColumnRole::Dimension
    }
}

/// Ensure remote schema objects exist for every non-`date` column of `dataset`.
///
/// For each column the matching collection is listed and searched by exact name; a creation
/// request is sent when nothing matches. Listings are not cached, so each column costs one GET.
///
/// Non-2xx responses are recorded as soft failures and do not stop reconciliation. A failed
/// listing counts as "not found", so creation is still attempted. Transport errors and
/// malformed listing bodies are returned as `Err`.
pub fn reconcile<T: Transport>(
    client: &WhatagraphClient<T>,
    dataset: &DataSet,
    observer: &dyn ExportObserver,
) -> ExportResult<ReconcileReport> {
    let mut report = ReconcileReport::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for field in &dataset.schema.fields {
        let Some(kind) = classify(&field.name, field.data_type).kind() else {
            continue;
        };
        if !seen.insert(field.name.as_str()) {
            continue;
        }

        let listing = client.list_schema_objects(kind)?;
        let exists = listing.contains_name(&field.name);
        report.checked.push((kind, field.name.clone()));
        observer.on_schema_checked(&dataset.name, kind, &field.name, exists);
        record(
            &mut report,
            observer,
            SoftFailure::from_outcome(Some(&dataset.name), Operation::ListSchema { kind }, listing.outcome),
        );

        if exists {
            continue;
        }

        let outcome = client.create_schema_object(kind, &field.name)?;
        observer.on_schema_created(&dataset.name, kind, &field.name);
        report.created.push((kind, field.name.clone()));
        record(
            &mut report,
            observer,
            SoftFailure::from_outcome(
                Some(&dataset.name),
                Operation::CreateSchema {
                    kind,
                    name: field.name.clone(),
                },
                outcome,
            ),
        );
    }

    Ok(report)
}

fn record(report: &mut ReconcileReport, observer: &dyn ExportObserver, failure: Option<SoftFailure>) {
    if let Some(failure) = failure {
        observer.on_soft_failure(&failure);
        report.soft_failures.push(failure);
    }
}
