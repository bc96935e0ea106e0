//! Run outcome types.
//!
//! Soft failures are collected here instead of only being logged, so callers (and tests) can
//! inspect what the remote API rejected during a run that otherwise completed.

use std::fmt;

use crate::api::{CallOutcome, SchemaKind};

/// The remote operation a soft failure belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Listing existing metrics or dimensions.
    ListSchema { kind: SchemaKind },
    /// Creating a metric or dimension.
    CreateSchema { kind: SchemaKind, name: String },
    /// Posting a batch of source data (0-based batch index).
    Upload { batch: usize },
    /// Listing source data (purge).
    ListSourceData,
    /// Deleting one source-data record (purge).
    DeleteSourceData { id: String },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ListSchema { kind } => write!(f, "list {kind}s"),
            Operation::CreateSchema { kind, name } => write!(f, "create {kind} '{name}'"),
            Operation::Upload { batch } => write!(f, "upload batch {batch}"),
            Operation::ListSourceData => f.write_str("list source data"),
            Operation::DeleteSourceData { id } => write!(f, "delete source data {id}"),
        }
    }
}

/// A remote call that returned a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftFailure {
    /// Dataset being processed, if any.
    pub dataset: Option<String>,
    pub operation: Operation,
    pub status: u16,
    pub body: String,
}

impl SoftFailure {
    /// Build a soft failure from a call outcome; `None` when the call succeeded.
    pub fn from_outcome(dataset: Option<&str>, operation: Operation, outcome: CallOutcome) -> Option<Self> {
        match outcome {
            CallOutcome::Ok => None,
            CallOutcome::SoftFailure { status, body } => Some(Self {
                dataset: dataset.map(str::to_owned),
                operation,
                status,
                body,
            }),
        }
    }
}

impl fmt::Display for SoftFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dataset) = &self.dataset {
            write!(f, "[{dataset}] ")?;
        }
        write!(f, "{} returned {}: {}", self.operation, self.status, self.body)
    }
}

/// Schema reconciliation result for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Existence checks issued, in column order.
    pub checked: Vec<(SchemaKind, String)>,
    /// Creation requests issued (successful or not), in column order.
    pub created: Vec<(SchemaKind, String)>,
    pub soft_failures: Vec<SoftFailure>,
}

/// Upload result for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub rows: usize,
    /// Number of POST requests sent.
    pub batches: usize,
    pub soft_failures: Vec<SoftFailure>,
}

/// Everything that happened to one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReport {
    pub name: String,
    pub reconcile: ReconcileReport,
    pub upload: UploadReport,
}

impl DatasetReport {
    pub fn soft_failures(&self) -> impl Iterator<Item = &SoftFailure> {
        self.reconcile
            .soft_failures
            .iter()
            .chain(self.upload.soft_failures.iter())
    }
}

/// End-of-run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One entry per dataset, in processing order.
    pub datasets: Vec<DatasetReport>,
}

impl RunReport {
    pub fn soft_failures(&self) -> impl Iterator<Item = &SoftFailure> {
        self.datasets.iter().flat_map(|d| d.soft_failures())
    }

    pub fn soft_failure_count(&self) -> usize {
        self.soft_failures().count()
    }

    pub fn rows_uploaded(&self) -> usize {
        self.datasets.iter().map(|d| d.upload.rows).sum()
    }
}

/// Purge result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    /// Records listed by the remote.
    pub listed: usize,
    /// Delete requests that succeeded.
    pub deleted: usize,
    pub soft_failures: Vec<SoftFailure>,
}
