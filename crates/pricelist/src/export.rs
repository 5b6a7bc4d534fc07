use crate::config::{FetchSettings, OutputArgs, OutputPaths, SourceArgs};
use crate::observer::{FetchObserver, SpinnerObserver};
use crate::pipeline::{collect_table, report_failed_pages, Collected, PARTIAL_EXIT_CODE};
use crate::prelude::*;
use crate::sink::{write_extract_csv, write_table, OutputFormat};
use pricelist_core::distinct::{distinct_regions, distinct_vm_skus};
use pricelist_core::table::PriceTable;
use std::process::ExitCode;

/// Options for exporting the full price list
#[derive(Debug, clap::Args, Clone)]
pub struct ExportOptions {
    #[clap(flatten)]
    pub source: SourceArgs,

    #[clap(flatten)]
    pub outputs: OutputArgs,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,
}

pub async fn run(options: ExportOptions, _global: crate::Global) -> Result<ExitCode> {
    let settings = FetchSettings::from_args(&options.source, options.max_pages);
    let outputs = OutputPaths::from_args(&options.outputs);

    log::debug!("Fetch settings: {settings:?}");
    log::debug!("Output paths: {outputs:?}");

    let observer = SpinnerObserver::new();
    let collected = export(&settings, &outputs, &observer).await;
    observer.finish();
    let collected = collected?;
    log::info!(
        "Exported {} rows built from {} price records on {} pages ({} records skipped).",
        collected.table.len(),
        collected.fetched_records,
        collected.pages,
        collected.rejected_items
    );

    report_failed_pages(&collected.failed_pages);
    if collected.is_partial() {
        return Ok(ExitCode::from(PARTIAL_EXIT_CODE));
    }

    log::info!("Price list processing completed successfully.");
    Ok(ExitCode::SUCCESS)
}

/// Fetch the catalog, transform it and write every output file
pub async fn export(
    settings: &FetchSettings,
    outputs: &OutputPaths,
    observer: &dyn FetchObserver,
) -> std::result::Result<Collected, Error> {
    let collected = collect_table(settings, observer).await?;
    write_outputs(&collected.table, outputs)?;
    Ok(collected)
}

/// Write the table files and both reference extracts
pub fn write_outputs(table: &PriceTable, outputs: &OutputPaths) -> std::result::Result<(), Error> {
    write_table(table, &outputs.raw_csv, OutputFormat::Csv)?;
    log::info!("Saved raw price list to {}", outputs.raw_csv.display());

    write_table(table, &outputs.expanded_csv, OutputFormat::Csv)?;
    log::info!("Saved price list to {}", outputs.expanded_csv.display());

    write_table(table, &outputs.parquet, OutputFormat::Parquet)?;
    log::info!("Saved price list to {}", outputs.parquet.display());

    if let Err(err) = write_extracts(table, outputs) {
        log::error!("Error while saving distinct values: {err}");
        return Err(err);
    }

    Ok(())
}

fn write_extracts(table: &PriceTable, outputs: &OutputPaths) -> std::result::Result<(), Error> {
    let skus = distinct_vm_skus(table);
    write_extract_csv(&skus, &["skuName", "armSkuName"], &outputs.skus_csv)?;
    log::info!(
        "Saved {} distinct virtual machine SKUs to {}",
        skus.len(),
        outputs.skus_csv.display()
    );

    let regions = distinct_regions(table);
    write_extract_csv(
        &regions,
        &["armRegionName", "location"],
        &outputs.regions_csv,
    )?;
    log::info!(
        "Saved {} distinct regions to {}",
        regions.len(),
        outputs.regions_csv.display()
    );

    Ok(())
}
