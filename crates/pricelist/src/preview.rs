use crate::config::{FetchSettings, SourceArgs};
use crate::observer::SpinnerObserver;
use crate::pipeline::{collect_table, report_failed_pages, PARTIAL_EXIT_CODE};
use crate::prelude::{println, *};
use colored::Colorize;
use pricelist_core::catalog::PriceType;
use pricelist_core::table::{Column, PriceTable, PricedRecord};
use std::process::ExitCode;

/// Columns shown by the preview table
const PREVIEW_COLUMNS: [Column; 6] = [
    Column::SkuName,
    Column::ArmRegionName,
    Column::Type,
    Column::Term,
    Column::RetailPrice,
    Column::HourlyPrice,
];

/// Options for previewing the first pages of the catalog
#[derive(Debug, clap::Args, Clone)]
pub struct PreviewOptions {
    #[clap(flatten)]
    pub source: SourceArgs,

    /// Number of pages to fetch
    #[arg(long, default_value = "1")]
    pub pages: usize,

    /// Maximum number of rows to display
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: PreviewOptions, _global: crate::Global) -> Result<ExitCode> {
    let settings = FetchSettings::from_args(&options.source, Some(options.pages.max(1)));

    log::debug!("Fetch settings: {settings:?}");

    let observer = SpinnerObserver::new();
    let collected = collect_table(&settings, &observer).await;
    observer.finish();
    let collected = collected?;

    let shown = &collected.table.rows()[..collected.table.len().min(options.limit)];

    if options.json {
        let json_output = serde_json::to_string_pretty(shown)
            .map_err(|e| eyre!("Failed to serialize output: {}", e))?;
        println!("{}", json_output);
    } else {
        print_preview(&collected.table, shown, collected.truncated);
    }

    report_failed_pages(&collected.failed_pages);
    if collected.is_partial() {
        return Ok(ExitCode::from(PARTIAL_EXIT_CODE));
    }

    Ok(ExitCode::SUCCESS)
}

fn print_preview(table: &PriceTable, shown: &[PricedRecord], truncated: bool) {
    println!(
        "\nShowing {} of {} price row(s):\n",
        shown.len().to_string().bold(),
        table.len()
    );

    if shown.is_empty() {
        println!("No price records found.");
        return;
    }

    preview_table(shown).printstd();

    if truncated {
        println!();
        println!(
            "{}",
            "More pages available. Use `pricelist export` to fetch the whole catalog.".cyan()
        );
    }
}

/// Build the preview table with a colored header row
pub fn preview_table(rows: &[PricedRecord]) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::Row::new(
        PREVIEW_COLUMNS
            .iter()
            .map(|column| prettytable::Cell::new(&column.name().bold().cyan().to_string()))
            .collect(),
    ));

    for row in rows {
        table.add_row(prettytable::row![
            row.cell(Column::SkuName).render().bright_white(),
            row.cell(Column::ArmRegionName).render().bright_blue(),
            format_type(&row.record.price_type),
            row.cell(Column::Term).render(),
            format_price(row.record.retail_price),
            format_price(row.hourly_price).bright_yellow()
        ]);
    }

    table
}

/// Format a price type with a color per kind
fn format_type(price_type: &PriceType) -> String {
    let label = price_type.as_str();
    match price_type {
        PriceType::Consumption | PriceType::DevTestConsumption => label.bright_green().to_string(),
        PriceType::Reservation => label.bright_magenta().to_string(),
        PriceType::SavingsPlan => label.bright_cyan().to_string(),
        PriceType::Spot | PriceType::LowPriority => label.bright_red().to_string(),
        PriceType::Other(_) => label.to_string(),
    }
}

fn format_price(price: f64) -> String {
    format!("{price:.6}")
}
