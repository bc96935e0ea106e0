//! `target-whatagraph` exports a folder of delimited files to Whatagraph's integration API.
//!
//! A run:
//!
//! 1. loads every `.csv` / `.tsv` file under the configured input path into typed
//!    [`types::DataSet`]s ([`ingestion::load_datasets`]),
//! 2. for each dataset, makes sure a remote metric (integer columns) or dimension (every other
//!    column except `date`) exists for each column ([`reconcile::reconcile`]),
//! 3. posts the rows to the source-data endpoint ([`upload::upload`]).
//!
//! Remote error statuses do not stop a run. They are collected as [`report::SoftFailure`]s in
//! the returned [`report::RunReport`] and reported to the [`observability::ExportObserver`].
//! I/O, transport and malformed-response errors abort the run with an [`ExportError`].
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use target_whatagraph::config::Config;
//! use target_whatagraph::observability::TracingObserver;
//!
//! # fn main() -> Result<(), target_whatagraph::ExportError> {
//! let config = Config::from_path("config.json")?;
//! let report = target_whatagraph::run(&config, Arc::new(TracingObserver))?;
//! println!("rows={} soft_failures={}", report.rows_uploaded(), report.soft_failure_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: JSON run configuration
//! - [`ingestion`]: folder discovery, delimited reading and type inference
//! - [`types`]: schema + in-memory dataset types
//! - [`reconcile`]: column classification and remote schema reconciliation
//! - [`format`]: row → JSON record conversion
//! - [`upload`]: source-data upload
//! - [`purge`]: maintenance delete of all source data
//! - [`api`]: endpoint client and HTTP transport
//! - [`run`]: orchestration
//! - [`report`], [`observability`]: outcomes and progress hooks
//! - [`error`]: error type

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod ingestion;
pub mod observability;
pub mod purge;
pub mod reconcile;
pub mod report;
pub mod run;
pub mod types;
pub mod upload;

pub use error::{ExportError, ExportResult};
pub use run::{Exporter, run};
