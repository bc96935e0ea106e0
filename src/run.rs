//! Run orchestration: load, reconcile and upload every dataset.

use std::sync::Arc;

use crate::api::{HttpTransport, Transport, WhatagraphClient};
use crate::config::Config;
use crate::error::ExportResult;
use crate::ingestion::load_datasets;
use crate::observability::ExportObserver;
use crate::reconcile::reconcile;
use crate::report::{DatasetReport, RunReport};
use crate::types::DataSet;
use crate::upload::{UploadOptions, upload};

/// Exports datasets through a [`WhatagraphClient`].
pub struct Exporter<T> {
    client: WhatagraphClient<T>,
    options: UploadOptions,
    observer: Arc<dyn ExportObserver>,
}

impl<T: Transport> Exporter<T> {
    pub fn new(client: WhatagraphClient<T>, options: UploadOptions, observer: Arc<dyn ExportObserver>) -> Self {
        Self {
            client,
            options,
            observer,
        }
    }

    /// Reconcile then upload one dataset.
    pub fn export_dataset(&self, dataset: &DataSet) -> ExportResult<DatasetReport> {
        let reconciled = reconcile(&self.client, dataset, self.observer.as_ref())?;
        let uploaded = upload(&self.client, dataset, &self.options, self.observer.as_ref())?;
        Ok(DatasetReport {
            name: dataset.name.clone(),
            reconcile: reconciled,
            upload: uploaded,
        })
    }

    /// Export `datasets` in order.
    ///
    /// Soft failures never stop the run; they are collected in the returned [`RunReport`].
    /// Nothing is rolled back: when an `Err` aborts the run, datasets already exported stay
    /// uploaded.
    pub fn export_all(&self, datasets: &[DataSet]) -> ExportResult<RunReport> {
        let mut report = RunReport::default();
        for dataset in datasets {
            report.datasets.push(self.export_dataset(dataset)?);
        }
        self.observer.on_run_finished(&report);
        Ok(report)
    }
}

/// Run a full export from a validated config over HTTP.
///
/// The transport is built and all input files are loaded before the first request is sent, so
/// token and input errors abort without touching the remote.
pub fn run(config: &Config, observer: Arc<dyn ExportObserver>) -> ExportResult<RunReport> {
    let transport = HttpTransport::new(&config.api_url, &config.access_token, config.timeout)?;
    let datasets = load_datasets(&config.input_path, observer.as_ref())?;
    tracing::debug!(
        datasets = ?datasets.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
        "exporting"
    );

    let exporter = Exporter::new(WhatagraphClient::new(transport), config.upload_options(), observer);
    exporter.export_all(&datasets)
}
