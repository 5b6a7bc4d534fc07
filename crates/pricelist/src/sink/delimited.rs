use crate::error::Error;
use pricelist_core::table::{Column, PriceTable};
use serde::Serialize;
use std::path::Path;

/// Write the final table as CSV with a header row
pub fn write_table_csv(table: &PriceTable, path: &Path) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| Error::export(path, e))?;

    writer
        .write_record(Column::headers())
        .map_err(|e| Error::export(path, e))?;
    for row in table {
        writer
            .write_record(row.rendered())
            .map_err(|e| Error::export(path, e))?;
    }

    writer.flush().map_err(|e| Error::export(path, e))
}

/// Write a reference extract as CSV
///
/// The header is written even when `rows` is empty.
pub fn write_extract_csv<T: Serialize>(
    rows: &[T],
    headers: &[&str],
    path: &Path,
) -> Result<(), Error> {
    super::ensure_parent_dir(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| Error::export(path, e))?;

    writer
        .write_record(headers)
        .map_err(|e| Error::export(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| Error::export(path, e))?;
    }

    writer.flush().map_err(|e| Error::export(path, e))
}
