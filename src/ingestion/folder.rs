//! Folder-level loading: discover delimited files and turn them into named datasets.
//!
//! - Only files whose extension maps to a [`DelimitedFormat`] are read; everything else in the
//!   folder is skipped.
//! - The dataset name is the file stem with its last `-<suffix>` segment removed, so
//!   `campaigns-1.csv` and `campaigns-2.csv` both load into `campaigns`.
//! - Files sharing a dataset name are concatenated in file-name order.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExportError, ExportResult};
use crate::observability::ExportObserver;
use crate::types::DataSet;

use super::csv::{RawTable, infer_dataset, read_delimited_from_path};

/// Supported delimited formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimitedFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
}

impl DelimitedFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            _ => None,
        }
    }

    /// Field delimiter byte.
    pub fn delimiter(self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }

    fn for_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// Derive the dataset name for an input file.
///
/// Returns `None` when the file is not a supported delimited file.
pub fn dataset_name_for_path(path: &Path) -> Option<String> {
    DelimitedFormat::for_path(path)?;
    let stem = path.file_stem()?.to_str()?;
    let name = match stem.rsplit_once('-') {
        Some((base, _)) if !base.is_empty() => base,
        _ => stem,
    };
    Some(name.to_owned())
}

/// Load every dataset found at `input_path`.
///
/// `input_path` may be a folder (all supported files directly inside it are read) or a single
/// file. Datasets are returned sorted by name.
///
/// The observer receives one [`ExportObserver::on_dataset_loaded`] call per dataset.
pub fn load_datasets(input_path: impl AsRef<Path>, observer: &dyn ExportObserver) -> ExportResult<Vec<DataSet>> {
    let input_path = input_path.as_ref();
    let files = discover_files(input_path)?;

    let mut grouped: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        if let Some(name) = dataset_name_for_path(&file) {
            grouped.entry(name).or_default().push(file);
        }
    }

    let mut datasets = Vec::with_capacity(grouped.len());
    for (name, paths) in grouped {
        let mut table = RawTable::default();
        for path in &paths {
            // `for_path` is Some for every grouped file.
            let format = DelimitedFormat::for_path(path).unwrap_or(DelimitedFormat::Csv);
            let part = read_delimited_from_path(path, format.delimiter()).map_err(|e| with_path(e, path))?;
            table.concat(part);
        }

        let dataset = infer_dataset(name, table);
        observer.on_dataset_loaded(&dataset, paths.len());
        datasets.push(dataset);
    }

    Ok(datasets)
}

fn discover_files(input_path: &Path) -> ExportResult<Vec<PathBuf>> {
    let meta = fs::metadata(input_path)?;
    if !meta.is_dir() {
        if dataset_name_for_path(input_path).is_none() {
            return Err(ExportError::SchemaMismatch {
                message: format!(
                    "unsupported input file (expected .csv or .tsv): {}",
                    input_path.display()
                ),
            });
        }
        return Ok(vec![input_path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input_path)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn with_path(err: ExportError, path: &Path) -> ExportError {
    match err {
        ExportError::SchemaMismatch { message } => ExportError::SchemaMismatch {
            message: format!("{message} ({})", path.display()),
        },
        other => other,
    }
}
