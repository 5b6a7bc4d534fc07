use crate::error::Error;
use arrow_array::{ArrayRef, BooleanArray, Float64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use pricelist_core::table::{Cell, Column, ColumnKind, PriceTable};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Arrow schema of the final table
///
/// Columns that every row fills are declared non-nullable.
pub fn table_schema() -> Schema {
    let fields: Vec<Field> = Column::ALL
        .iter()
        .map(|column| {
            let data_type = match column.kind() {
                ColumnKind::Text => DataType::Utf8,
                ColumnKind::Float => DataType::Float64,
                ColumnKind::Bool => DataType::Boolean,
            };
            let nullable = !matches!(
                column,
                Column::RetailPrice | Column::Type | Column::HourlyPrice
            );
            Field::new(column.name(), data_type, nullable)
        })
        .collect();

    Schema::new(fields)
}

fn column_array(table: &PriceTable, column: Column) -> ArrayRef {
    match column.kind() {
        ColumnKind::Text => Arc::new(
            table
                .iter()
                .map(|row| match row.cell(column) {
                    Cell::Text(value) => value.map(|v| v.into_owned()),
                    _ => None,
                })
                .collect::<StringArray>(),
        ),
        ColumnKind::Float => Arc::new(
            table
                .iter()
                .map(|row| match row.cell(column) {
                    Cell::Float(value) => value,
                    _ => None,
                })
                .collect::<Float64Array>(),
        ),
        ColumnKind::Bool => Arc::new(
            table
                .iter()
                .map(|row| match row.cell(column) {
                    Cell::Bool(value) => value,
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
    }
}

/// Build a single record batch holding the whole table
pub fn table_batch(table: &PriceTable) -> Result<RecordBatch, arrow_schema::ArrowError> {
    let columns: Vec<ArrayRef> = Column::ALL
        .iter()
        .map(|column| column_array(table, *column))
        .collect();

    RecordBatch::try_new(Arc::new(table_schema()), columns)
}

/// Write the final table as a Snappy-compressed Parquet file
pub fn write_table_parquet(table: &PriceTable, path: &Path) -> Result<(), Error> {
    let batch = table_batch(table).map_err(|e| Error::export(path, e))?;
    let file = File::create(path).map_err(|e| Error::export(path, e))?;

    let properties = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(properties))
        .map_err(|e| Error::export(path, e))?;
    writer.write(&batch).map_err(|e| Error::export(path, e))?;
    writer.close().map_err(|e| Error::export(path, e))?;

    Ok(())
}
