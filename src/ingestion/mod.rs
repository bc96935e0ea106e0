//! Input loading.
//!
//! Most callers should use [`load_datasets`] (from [`folder`]) which:
//!
//! - discovers `.csv` / `.tsv` files under the configured input path
//! - concatenates files that map to the same dataset name
//! - infers a [`crate::types::DataType`] per column and produces typed [`crate::types::DataSet`]s
//!
//! Lower-level reading and inference live in [`csv`].

pub mod csv;
pub mod folder;

pub use folder::{DelimitedFormat, dataset_name_for_path, load_datasets};
