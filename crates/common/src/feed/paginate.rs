//! Fixed-size pages and the compressed page selector

use serde::{Serialize, Serializer};
use std::fmt;

/// One page of a listing slice
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub current_page: usize,
    pub total_pages: usize,
}

/// Number of pages for `count` items. Never zero: an empty catalog is a
/// single empty page.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Slice out page `current_page` (1-based). A page past the end yields no
/// items rather than an error.
pub fn paginate<T>(listings: &[T], page_size: usize, current_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let start = current_page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(listings.len());
    let end = current_page.saturating_mul(page_size).min(listings.len()).max(start);

    Page {
        items: &listings[start..end],
        current_page,
        total_pages: total_pages(listings.len(), page_size),
    }
}

/// Clamp a requested page into `[1, total_pages]`
pub fn clamp_page(target: i64, total_pages: usize) -> usize {
    let last = total_pages.max(1) as i64;
    target.clamp(1, last) as usize
}

/// A slot in the page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(usize),
    Ellipsis,
}

impl PageSlot {
    pub const ELLIPSIS: &'static str = "...";

    pub fn page(&self) -> Option<usize> {
        match self {
            PageSlot::Page(n) => Some(*n),
            PageSlot::Ellipsis => None,
        }
    }
}

impl fmt::Display for PageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSlot::Page(n) => write!(f, "{}", n),
            PageSlot::Ellipsis => f.write_str(Self::ELLIPSIS),
        }
    }
}

impl Serialize for PageSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageSlot::Page(n) => serializer.serialize_u64(*n as u64),
            PageSlot::Ellipsis => serializer.serialize_str(Self::ELLIPSIS),
        }
    }
}

/// Page numbers to show in a selector of at most `max_slots` numbers.
///
/// Short ranges are shown in full. Otherwise the first and last page stay
/// visible and the rest collapses around the current page:
/// near the start `1 2 3 4 ... N`, near the end `1 ... N-3 N-2 N-1 N`,
/// in between `1 ... c-1 c c+1 ... N`.
pub fn page_slots(total_pages: usize, current_page: usize, max_slots: usize) -> Vec<PageSlot> {
    if total_pages <= max_slots {
        return (1..=total_pages).map(PageSlot::Page).collect();
    }

    let half = max_slots / 2;

    if current_page <= half {
        let mut slots: Vec<_> = (1..max_slots).map(PageSlot::Page).collect();
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(total_pages));
        return slots;
    }

    if current_page > total_pages - half {
        let mut slots = vec![PageSlot::Page(1), PageSlot::Ellipsis];
        slots.extend((total_pages + 2 - max_slots..=total_pages).map(PageSlot::Page));
        return slots;
    }

    vec![
        PageSlot::Page(1),
        PageSlot::Ellipsis,
        PageSlot::Page(current_page - 1),
        PageSlot::Page(current_page),
        PageSlot::Page(current_page + 1),
        PageSlot::Ellipsis,
        PageSlot::Page(total_pages),
    ]
}

/// State of the previous/next controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageNav {
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageNav {
    pub fn new(current_page: usize, total_pages: usize) -> Self {
        Self {
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageSlot::{Ellipsis, Page as P};

    #[test]
    fn test_thirteen_items_three_pages() {
        let items: Vec<usize> = (0..13).collect();

        let first = paginate(&items, 6, 1);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items, &items[0..6]);

        let last = paginate(&items, 6, 3);
        assert_eq!(last.items, &[12]);
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let items: Vec<u8> = Vec::new();
        let page = paginate(&items, 6, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let items: Vec<usize> = (0..4).collect();
        assert!(paginate(&items, 6, 5).items.is_empty());
        assert!(paginate(&items, 6, 0).items.is_empty());
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(-4, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(9, 0), 1);
    }

    #[test]
    fn test_short_range_shows_everything() {
        assert_eq!(page_slots(3, 2, 5), vec![P(1), P(2), P(3)]);
        assert_eq!(page_slots(5, 5, 5), vec![P(1), P(2), P(3), P(4), P(5)]);
    }

    #[test]
    fn test_compression_near_start() {
        assert_eq!(page_slots(10, 1, 5), vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]);
        assert_eq!(page_slots(10, 2, 5), vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]);
    }

    #[test]
    fn test_compression_near_end() {
        assert_eq!(page_slots(10, 10, 5), vec![P(1), Ellipsis, P(7), P(8), P(9), P(10)]);
        assert_eq!(page_slots(10, 9, 5), vec![P(1), Ellipsis, P(7), P(8), P(9), P(10)]);
    }

    #[test]
    fn test_compression_in_middle() {
        assert_eq!(
            page_slots(10, 5, 5),
            vec![P(1), Ellipsis, P(4), P(5), P(6), Ellipsis, P(10)]
        );
    }

    #[test]
    fn test_slot_serialization() {
        let json = serde_json::to_string(&page_slots(10, 1, 5)).unwrap();
        assert_eq!(json, r#"[1,2,3,4,"...",10]"#);
    }

    #[test]
    fn test_nav_controls() {
        assert_eq!(PageNav::new(1, 3), PageNav { has_previous: false, has_next: true });
        assert_eq!(PageNav::new(3, 3), PageNav { has_previous: true, has_next: false });
        assert_eq!(PageNav::new(1, 1), PageNav { has_previous: false, has_next: false });
    }
}
