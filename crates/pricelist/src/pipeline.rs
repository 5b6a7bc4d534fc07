//! Fetch the catalog and turn it into the final table

use crate::config::FetchSettings;
use crate::error::Error;
use crate::fetch::{create_client, PageFetcher};
use crate::observer::FetchObserver;
use crate::paginate::{fetch_all_pages, FailedPage, FetchReport};
use pricelist_core::catalog::PriceType;
use pricelist_core::pipeline::transform;
use pricelist_core::table::PriceTable;

/// Exit status of a run that finished with some pages missing
pub const PARTIAL_EXIT_CODE: u8 = 2;

/// The final table plus what went wrong while fetching it
#[derive(Debug)]
pub struct Collected {
    pub table: PriceTable,
    pub fetched_records: usize,
    pub pages: usize,
    pub failed_pages: Vec<FailedPage>,
    pub rejected_items: usize,
    pub truncated: bool,
}

impl Collected {
    pub fn is_partial(&self) -> bool {
        !self.failed_pages.is_empty()
    }
}

/// Walk every page and run the transformation stages
///
/// Dropped pages do not fail the run; a transformation error does.
pub async fn collect_table(
    settings: &FetchSettings,
    observer: &dyn FetchObserver,
) -> Result<Collected, Error> {
    log::info!("Fetching retail prices from {}", settings.start_url);

    let client = create_client(settings.timeout)?;
    let fetcher = PageFetcher::new(client, settings.retry);
    let FetchReport {
        items,
        pages,
        failed_pages,
        rejected_items,
        truncated,
    } = fetch_all_pages(
        &fetcher,
        &settings.start_url,
        settings.concurrency,
        settings.max_pages,
        observer,
    )
    .await;

    let fetched_records = items.len();
    log::info!("Fetched {fetched_records} price records from {pages} pages.");
    if rejected_items > 0 {
        log::warn!("Skipped {rejected_items} malformed price records.");
    }
    if truncated {
        log::info!("Stopped after {pages} pages; more pages are available.");
    }

    log::info!("Expanding savings plans and deriving hourly prices...");
    let table = transform(items, settings.term_matching)?;
    let savings_plan_rows = table
        .iter()
        .filter(|row| row.record.price_type == PriceType::SavingsPlan)
        .count();
    log::info!(
        "Final table has {} rows ({savings_plan_rows} from savings plans).",
        table.len()
    );

    Ok(Collected {
        table,
        fetched_records,
        pages,
        failed_pages,
        rejected_items,
        truncated,
    })
}

/// Warn about every dropped page
pub fn report_failed_pages(failed_pages: &[FailedPage]) {
    if failed_pages.is_empty() {
        return;
    }

    log::warn!(
        "{} page(s) could not be fetched; their price records are missing from the output.",
        failed_pages.len()
    );
    for page in failed_pages {
        log::warn!("  {}: {}", page.url, page.error);
    }
}
