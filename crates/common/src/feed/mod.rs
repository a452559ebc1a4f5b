//! Listing feed
//!
//! The home view pipeline:
//! - [`aggregator`]: base catalog plus agent samples
//! - [`sort`]: ordering by sort key
//! - [`paginate`]: fixed-size pages and the page selector
//! - [`card`]: list-view projection of a listing
//!
//! [`Feed`] runs the pipeline for one session; [`FeedState`] is the
//! per-viewer sort and page selection it reads and corrects.

pub mod aggregator;
pub mod card;
pub mod paginate;
pub mod sort;

pub use aggregator::Aggregator;
pub use card::{format_rent, PropertyCard, NO_IMAGE_PHOTO};
pub use paginate::{clamp_page, page_slots, paginate, total_pages, Page, PageNav, PageSlot};
pub use sort::{sort_listings, SortDirection, SortField, SortKey};

use crate::auth::Session;
use crate::config::FeedConfig;
use crate::metrics;
use crate::models::{Property, SampleListing};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sort and page selection of one viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedState {
    pub sort_key: SortKey,
    pub current_page: usize,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            sort_key: SortKey::default(),
            current_page: 1,
        }
    }
}

impl FeedState {
    pub fn new(sort_key: SortKey, current_page: usize) -> Self {
        Self {
            sort_key,
            current_page: current_page.max(1),
        }
    }

    /// Change the ordering. Always returns to the first page.
    pub fn set_sort(&mut self, sort_key: SortKey) {
        if self.sort_key != sort_key {
            debug!(from = %self.sort_key, to = %sort_key, "Sort key changed");
        }
        self.sort_key = sort_key;
        self.current_page = 1;
    }

    /// Jump to `target`, clamped into `[1, total_pages]`
    pub fn go_to(&mut self, target: i64, total_pages: usize) -> usize {
        self.current_page = clamp_page(target, total_pages);
        self.current_page
    }

    pub fn previous(&mut self, total_pages: usize) -> usize {
        self.go_to(self.current_page as i64 - 1, total_pages)
    }

    pub fn next(&mut self, total_pages: usize) -> usize {
        self.go_to(self.current_page as i64 + 1, total_pages)
    }
}

/// One rendered page of the feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub items: Vec<Property>,
    pub sort_key: SortKey,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_slots: Vec<PageSlot>,
    pub has_previous: bool,
    pub has_next: bool,
    pub total_items: usize,
}

impl FeedPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cards(&self) -> Vec<PropertyCard> {
        self.items.iter().map(PropertyCard::from).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Feed {
    aggregator: Aggregator,
    page_size: usize,
    max_page_slots: usize,
}

impl Default for Feed {
    fn default() -> Self {
        Self::from_config(&FeedConfig::default())
    }
}

impl Feed {
    pub fn from_config(config: &FeedConfig) -> Self {
        Self {
            aggregator: Aggregator::from_config(config),
            page_size: config.page_size,
            max_page_slots: config.max_page_slots,
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Aggregate for `session` and render the page `state` points at.
    /// Agents see the sample listings too.
    pub fn load<R: Rng + ?Sized>(
        &self,
        session: &Session,
        base: &[Property],
        supplemental: &[SampleListing],
        state: &mut FeedState,
        rng: &mut R,
    ) -> FeedPage {
        let listings = self
            .aggregator
            .aggregate(base, supplemental, session.is_agent(), rng);
        self.page(listings, state)
    }

    /// Sort already aggregated listings and cut out the selected page.
    ///
    /// An out-of-range page in `state` is corrected in place.
    pub fn page(&self, listings: Vec<Property>, state: &mut FeedState) -> FeedPage {
        let total_items = listings.len();
        let sorted = sort_listings(listings, state.sort_key);

        let total = total_pages(total_items, self.page_size);
        let current = state.go_to(state.current_page as i64, total);
        let page = paginate(&sorted, self.page_size, current);
        let nav = PageNav::new(current, total);

        metrics::record_feed(state.sort_key.as_str(), page.items.len());
        debug!(
            sort = %state.sort_key,
            page = current,
            total_pages = total,
            items = page.items.len(),
            "Feed page rendered"
        );

        FeedPage {
            items: page.items.to_vec(),
            sort_key: state.sort_key,
            current_page: current,
            total_pages: total,
            page_slots: page_slots(total, current, self.max_page_slots),
            has_previous: nav.has_previous,
            has_next: nav.has_next,
            total_items,
        }
    }
}
