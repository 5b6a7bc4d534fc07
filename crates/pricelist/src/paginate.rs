//! Concurrent walk over the whole catalog

use crate::fetch::PageFetcher;
use crate::observer::FetchObserver;
use futures::stream::{self, StreamExt};
use pricelist_core::catalog::PriceRecord;
use pricelist_core::pagination::{Frontier, LinkOutcome};

/// A page that was given up on
#[derive(Debug, Clone, PartialEq)]
pub struct FailedPage {
    pub url: String,
    pub error: String,
}

/// Everything collected by a walk
#[derive(Debug, Default)]
pub struct FetchReport {
    pub items: Vec<PriceRecord>,
    pub pages: usize,
    pub failed_pages: Vec<FailedPage>,
    /// Items left out because they could not be read as price records
    pub rejected_items: usize,
    /// The page budget stopped the walk before the links ran out
    pub truncated: bool,
}

/// Fetch every page reachable from `start_url`
///
/// Pages are fetched a generation at a time: all known URLs go out together,
/// at most `concurrency` at once, and the next-page links they return make up
/// the following generation. A page that exhausts its retries is reported in
/// [`FetchReport::failed_pages`] and its items are left out; the walk goes on.
/// A single malformed item only costs that item.
/// Items arrive in completion order.
pub async fn fetch_all_pages(
    fetcher: &PageFetcher,
    start_url: &str,
    concurrency: usize,
    max_pages: Option<usize>,
    observer: &dyn FetchObserver,
) -> FetchReport {
    let mut frontier = Frontier::new(start_url).with_max_pages(max_pages);
    let mut report = FetchReport::default();

    while !frontier.is_exhausted() {
        let generation = frontier.next_generation();

        let mut pages = stream::iter(generation)
            .map(|url| async move {
                let result = fetcher.fetch(&url, observer).await;
                (url, result)
            })
            .buffer_unordered(concurrency.max(1));

        while let Some((url, result)) = pages.next().await {
            match result {
                Ok(page) => {
                    if let Some(link) = page.next_link() {
                        if frontier.push_link(link) == LinkOutcome::AlreadyVisited {
                            observer.link_revisited(link);
                        }
                    }

                    let (records, rejected) = page.into_records();
                    for item in &rejected {
                        observer.item_rejected(&url, item);
                    }
                    observer.page_fetched(&url, records.len());

                    report.pages += 1;
                    report.rejected_items += rejected.len();
                    report.items.extend(records);
                }
                Err(err) => {
                    observer.page_dropped(&url, &err);
                    report.failed_pages.push(FailedPage {
                        url,
                        error: err.to_string(),
                    });
                }
            }
        }
    }

    report.truncated = frontier.budget_spent() && frontier.has_pending();
    report
}
