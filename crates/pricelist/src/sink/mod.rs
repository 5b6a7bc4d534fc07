//! File sinks for the final table and the reference extracts
//!
//! Sinks only read the table; they never reorder or modify rows.

mod columnar;
mod delimited;

use crate::error::Error;
use pricelist_core::table::PriceTable;
use std::path::Path;

pub use columnar::write_table_parquet;
pub use delimited::{write_extract_csv, write_table_csv};

/// Serialization format of a table sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

/// Write `table` to `path` in the given format
pub fn write_table(table: &PriceTable, path: &Path, format: OutputFormat) -> Result<(), Error> {
    ensure_parent_dir(path)?;
    match format {
        OutputFormat::Csv => write_table_csv(table, path),
        OutputFormat::Parquet => write_table_parquet(table, path),
    }
}

/// Create the directory that will hold `path`
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| Error::export(path, e))
        }
        _ => Ok(()),
    }
}
