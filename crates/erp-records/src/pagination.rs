//! Page slicing for list views

use serde::{Deserialize, Serialize};

/// Rows per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Requested page (1-based) and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1
    pub page: usize,
    /// Rows per page
    pub page_size: usize,
}

impl PageRequest {
    /// Create a request; page 0 is treated as page 1 and a zero size as 1
    pub const fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            page_size: if page_size == 0 { 1 } else { page_size },
        }
    }

    /// First page of the given size
    pub const fn first(page_size: usize) -> Self {
        Self::new(1, page_size)
    }

    /// Index of the first row of the page
    pub const fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Number of pages needed for `total` rows; 0 when there are none
pub const fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Position of a page within the full result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page (1-based)
    pub page: usize,
    /// Rows per page
    pub page_size: usize,
    /// Rows across all pages
    pub total: usize,
    /// Number of pages
    pub total_pages: usize,
    /// Whether a later page has rows
    pub has_next: bool,
    /// Whether an earlier page exists
    pub has_prev: bool,
}

impl PageMeta {
    /// Metadata for `request` over `total` rows
    pub const fn new(request: PageRequest, total: usize) -> Self {
        let pages = total_pages(total, request.page_size);
        Self {
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages: pages,
            has_next: request.page < pages,
            has_prev: request.page > 1,
        }
    }

    /// Caption shown under a table, e.g. `11-20 / 95`
    pub fn range_label(&self) -> String {
        let start = self.page.saturating_sub(1).saturating_mul(self.page_size);
        if start >= self.total {
            return format!("0 / {}", self.total);
        }
        let end = (start + self.page_size).min(self.total);
        format!("{}-{} / {}", start + 1, end, self.total)
    }
}

/// One page of rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// Position within the full result
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Whether the page has no rows
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Slice `items` to the requested page
///
/// A page past the last one yields no rows rather than an error.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let meta = PageMeta::new(request, items.len());
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.page_size)
        .collect();

    Page { items, meta }
}

/// Clamp a page number into `1..=max(total_pages, 1)`
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(total, page_size).max(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_first_page() {
        let page = paginate((1..=25).collect::<Vec<_>>(), PageRequest::default());

        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(page.meta.total, 25);
        assert_eq!(page.meta.total_pages, 3);
        assert!(page.meta.has_next);
        assert!(!page.meta.has_prev);
        assert_eq!(page.meta.range_label(), "1-10 / 25");
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate((1..=25).collect::<Vec<_>>(), PageRequest::new(3, 10));

        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert!(!page.meta.has_next);
        assert!(page.meta.has_prev);
        assert_eq!(page.meta.range_label(), "21-25 / 25");
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate((1..=25).collect::<Vec<_>>(), PageRequest::new(9, 10));

        assert!(page.is_empty());
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.range_label(), "0 / 25");
    }

    #[test]
    fn test_empty_input() {
        let page = paginate(Vec::<u8>::new(), PageRequest::default());

        assert!(page.is_empty());
        assert_eq!(page.meta.total_pages, 0);
        assert!(!page.meta.has_next);
    }

    #[test]
    fn test_zero_values_are_normalised() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 1);
        assert_eq!(request.offset(), 0);
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(95, 10, 10)]
    fn test_total_pages(#[case] total: usize, #[case] size: usize, #[case] expected: usize) {
        assert_eq!(total_pages(total, size), expected);
    }

    #[rstest]
    #[case(0, 25, 1)]
    #[case(3, 25, 3)]
    #[case(7, 25, 3)]
    #[case(4, 0, 1)]
    fn test_clamp_page(#[case] page: usize, #[case] total: usize, #[case] expected: usize) {
        assert_eq!(clamp_page(page, total, 10), expected);
    }

    proptest! {
        #[test]
        fn page_count_is_ceiling(total in 0usize..500, size in 1usize..50) {
            let page = paginate(vec![0u8; total], PageRequest::first(size));
            prop_assert_eq!(page.meta.total_pages, total.div_ceil(size));
        }

        #[test]
        fn pages_cover_every_row_once(total in 0usize..200, size in 1usize..20) {
            let items: Vec<usize> = (0..total).collect();
            let pages = total_pages(total, size);
            let mut seen = Vec::new();
            for number in 1..=pages {
                seen.extend(paginate(items.clone(), PageRequest::new(number, size)).items);
            }
            prop_assert_eq!(seen, items.clone());

            let beyond = paginate(items, PageRequest::new(pages + 1, size));
            prop_assert!(beyond.is_empty());
        }
    }
}
