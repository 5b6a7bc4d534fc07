//! Progress reporting for the page walker
//!
//! Fetching code never logs on its own; it reports to a [`FetchObserver`]
//! handed in by the caller. The CLI uses [`SpinnerObserver`], tests use a
//! recording observer.

use crate::error::Error;
use crate::fetch::AttemptError;
use pricelist_core::catalog::RejectedItem;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub trait FetchObserver: Send + Sync {
    fn fetching(&self, _url: &str, _attempt: u32) {}

    fn retrying(&self, _url: &str, _attempt: u32, _error: &AttemptError, _wait: Duration) {}

    fn page_fetched(&self, _url: &str, _items: usize) {}

    fn page_dropped(&self, _url: &str, _error: &Error) {}

    fn item_rejected(&self, _url: &str, _item: &RejectedItem) {}

    fn link_revisited(&self, _url: &str) {}
}

/// Observer that forwards events to the `log` facade
pub struct LogObserver;

impl FetchObserver for LogObserver {
    fn fetching(&self, url: &str, attempt: u32) {
        if attempt == 1 {
            log::info!("Fetching data from: {url}");
        } else {
            log::debug!("Fetching data from: {url} (attempt {attempt})");
        }
    }

    fn retrying(&self, url: &str, attempt: u32, error: &AttemptError, wait: Duration) {
        if error.is_throttled() {
            log::warn!("API throttling detected for {url}");
        }
        log::error!(
            "Error fetching page (attempt {attempt}): {error}. Retrying in {} seconds...",
            wait.as_secs_f64()
        );
    }

    fn page_fetched(&self, url: &str, items: usize) {
        log::debug!("Fetched {items} items from {url}");
    }

    fn page_dropped(&self, url: &str, error: &Error) {
        log::error!("Dropping page {url}: {error}");
    }

    fn item_rejected(&self, url: &str, item: &RejectedItem) {
        log::warn!(
            "Skipping item {} ({}) on {url}: {}",
            item.index,
            item.sku_id.as_deref().unwrap_or("<unknown sku>"),
            item.reason
        );
    }

    fn link_revisited(&self, url: &str) {
        log::warn!("Ignoring next page link that was already fetched: {url}");
    }
}

/// Log events and keep a terminal spinner with running totals
pub struct SpinnerObserver {
    spinner: ProgressBar,
    pages: AtomicUsize,
    items: AtomicUsize,
}

impl SpinnerObserver {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self {
            spinner,
            pages: AtomicUsize::new(0),
            items: AtomicUsize::new(0),
        }
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for SpinnerObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchObserver for SpinnerObserver {
    fn fetching(&self, url: &str, attempt: u32) {
        self.spinner.suspend(|| LogObserver.fetching(url, attempt));
    }

    fn retrying(&self, url: &str, attempt: u32, error: &AttemptError, wait: Duration) {
        self.spinner
            .suspend(|| LogObserver.retrying(url, attempt, error, wait));
    }

    fn page_fetched(&self, url: &str, items: usize) {
        let pages = self.pages.fetch_add(1, Ordering::Relaxed) + 1;
        let total = self.items.fetch_add(items, Ordering::Relaxed) + items;
        self.spinner.suspend(|| LogObserver.page_fetched(url, items));
        self.spinner
            .set_message(format!("{pages} pages, {total} price records"));
    }

    fn page_dropped(&self, url: &str, error: &Error) {
        self.spinner.suspend(|| LogObserver.page_dropped(url, error));
    }

    fn item_rejected(&self, url: &str, item: &RejectedItem) {
        self.spinner.suspend(|| LogObserver.item_rejected(url, item));
    }

    fn link_revisited(&self, url: &str) {
        self.spinner.suspend(|| LogObserver.link_revisited(url));
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Observer that ignores every event
    pub struct Silent;

    impl FetchObserver for Silent {}

    /// Observer that records every event as a short string
    #[derive(Default)]
    pub struct Recording {
        pub events: Mutex<Vec<String>>,
    }

    impl Recording {
        pub fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl FetchObserver for Recording {
        fn fetching(&self, url: &str, attempt: u32) {
            self.push(format!("fetching {url} #{attempt}"));
        }

        fn retrying(&self, url: &str, attempt: u32, error: &AttemptError, _wait: Duration) {
            let kind = if error.is_throttled() { "throttled" } else { "failed" };
            self.push(format!("retrying {url} #{attempt} {kind}"));
        }

        fn page_fetched(&self, url: &str, items: usize) {
            self.push(format!("fetched {url} {items}"));
        }

        fn page_dropped(&self, url: &str, _error: &Error) {
            self.push(format!("dropped {url}"));
        }

        fn item_rejected(&self, url: &str, item: &RejectedItem) {
            self.push(format!("rejected {url} #{}", item.index));
        }

        fn link_revisited(&self, url: &str) {
            self.push(format!("revisited {url}"));
        }
    }
}
