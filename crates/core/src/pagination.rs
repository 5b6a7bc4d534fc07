//! Pagination frontier bookkeeping
//!
//! Pure state for walking a chain of next-page links in generations: every
//! URL of the current generation is fetched, and the links those pages return
//! form the next generation. The frontier remembers every URL it has handed
//! out, so a link that points back into the chain is dropped instead of
//! looping forever.

use std::collections::HashSet;

/// What happened to a link offered to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Queued,
    AlreadyVisited,
}

/// URLs waiting to be fetched plus every URL seen so far
#[derive(Debug, Clone)]
pub struct Frontier {
    pending: Vec<String>,
    visited: HashSet<String>,
    scheduled: usize,
    max_pages: Option<usize>,
}

impl Frontier {
    pub fn new(start_url: impl Into<String>) -> Self {
        let start_url = start_url.into();
        let mut visited = HashSet::new();
        visited.insert(start_url.clone());

        Self {
            pending: vec![start_url],
            visited,
            scheduled: 0,
            max_pages: None,
        }
    }

    /// Stop handing out URLs once `max_pages` have been scheduled
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Offer a next-page link for the following generation
    pub fn push_link(&mut self, link: &str) -> LinkOutcome {
        if self.visited.insert(link.to_string()) {
            self.pending.push(link.to_string());
            LinkOutcome::Queued
        } else {
            LinkOutcome::AlreadyVisited
        }
    }

    /// Take every pending URL as the next generation to fetch
    ///
    /// Respects the page budget; URLs beyond it are discarded.
    pub fn next_generation(&mut self) -> Vec<String> {
        let mut generation = std::mem::take(&mut self.pending);

        if let Some(max_pages) = self.max_pages {
            generation.truncate(max_pages.saturating_sub(self.scheduled));
        }

        self.scheduled += generation.len();
        generation
    }

    /// True when there is nothing left to fetch
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty() || self.budget_spent()
    }

    /// True when the page budget stopped the walk
    pub fn budget_spent(&self) -> bool {
        self.max_pages.is_some_and(|max| self.scheduled >= max)
    }

    /// True when links are waiting, whether or not the budget allows them
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of URLs handed out so far
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_single_url() {
        let mut frontier = Frontier::new("https://example.com/p1");
        assert!(!frontier.is_exhausted());
        assert_eq!(frontier.next_generation(), vec!["https://example.com/p1"]);
        assert!(frontier.is_exhausted());
        assert_eq!(frontier.scheduled(), 1);
    }

    #[test]
    fn test_finite_chain_terminates() {
        // p1 -> p2 -> ... -> p5
        let mut frontier = Frontier::new("p1");
        let mut generations = 0;

        while !frontier.is_exhausted() {
            let generation = frontier.next_generation();
            generations += 1;
            for url in generation {
                let index: usize = url[1..].parse().unwrap();
                if index < 5 {
                    frontier.push_link(&format!("p{}", index + 1));
                }
            }
            assert!(generations <= 5, "walk did not terminate");
        }

        assert_eq!(generations, 5);
        assert_eq!(frontier.scheduled(), 5);
    }

    #[test]
    fn test_cycle_is_dropped() {
        let mut frontier = Frontier::new("p1");
        frontier.next_generation();

        assert_eq!(frontier.push_link("p2"), LinkOutcome::Queued);
        assert_eq!(frontier.next_generation(), vec!["p2"]);

        assert_eq!(frontier.push_link("p1"), LinkOutcome::AlreadyVisited);
        assert_eq!(frontier.push_link("p2"), LinkOutcome::AlreadyVisited);
        assert!(frontier.is_exhausted());
    }

    #[test]
    fn test_page_budget() {
        let mut frontier = Frontier::new("p1").with_max_pages(Some(2));
        assert_eq!(frontier.next_generation().len(), 1);

        frontier.push_link("p2");
        frontier.push_link("p3");
        assert_eq!(frontier.next_generation(), vec!["p2"]);
        assert!(frontier.budget_spent());
        assert!(frontier.is_exhausted());

        frontier.push_link("p4");
        assert!(frontier.has_pending());
        assert!(frontier.is_exhausted());
    }

    #[test]
    fn test_zero_budget_fetches_nothing() {
        let mut frontier = Frontier::new("p1").with_max_pages(Some(0));
        assert!(frontier.is_exhausted());
        assert!(frontier.next_generation().is_empty());
    }
}
