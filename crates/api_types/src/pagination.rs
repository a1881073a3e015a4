//! Page-number pagination envelope.

use serde::{Deserialize, Serialize};

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on client-requested page sizes.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Metadata accompanying every listing/search result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// 1-based page number of this page.
    pub current_page: u32,
    /// Total number of pages for this filter (at least 1).
    pub total_pages: u32,
    /// Page size used for this response.
    pub page_size: u32,
    /// Total matching items across all pages.
    pub total_items: u64,
    /// Next page number, if any.
    pub next: Option<u32>,
    /// Previous page number, if any.
    pub previous: Option<u32>,
}

impl PaginationMeta {
    /// Computes metadata for a page of `total_items` matches.
    pub fn new(current_page: u32, page_size: u32, total_items: u64) -> Self {
        let total_pages = if total_items == 0 {
            1
        } else {
            total_items.div_ceil(page_size as u64) as u32
        };
        Self {
            current_page,
            total_pages,
            page_size,
            total_items,
            next: (current_page < total_pages).then(|| current_page + 1),
            // A request past the end still gets links that resolve.
            previous: (current_page > 1).then(|| (current_page - 1).min(total_pages)),
        }
    }
}

/// A page of results plus its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub pagination: PaginationMeta,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wraps a page of results.
    pub fn new(results: Vec<T>, current_page: u32, page_size: u32, total_items: u64) -> Self {
        Self {
            pagination: PaginationMeta::new(current_page, page_size, total_items),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page() {
        let meta = PaginationMeta::new(1, 10, 7);
        assert_eq!(meta.total_pages, 1);
        assert_eq!(meta.next, None);
        assert_eq!(meta.previous, None);
    }

    #[test]
    fn test_middle_page() {
        let meta = PaginationMeta::new(2, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.next, Some(3));
        assert_eq!(meta.previous, Some(1));
    }

    #[test]
    fn test_page_past_the_end_links_back_into_range() {
        let meta = PaginationMeta::new(5, 10, 15);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.next, None);
        assert_eq!(meta.previous, Some(2));
    }

    #[test]
    fn test_empty_result_set_still_has_one_page() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 1);
        assert_eq!(meta.total_items, 0);
        assert_eq!(meta.next, None);
    }
}
