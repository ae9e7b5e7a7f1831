//! Page/limit pagination for list queries
//!
//! A [`PageSource`] is a filtered, sorted collection that can fetch one
//! window and count its total independently. [`paginate`] runs both
//! concurrently and assembles a [`Page`] envelope whose totals come from the
//! count, never from the window.

use std::future::Future;

use async_graphql::SimpleObject;

/// Page used when the caller gives none (or a non-positive one)
pub const DEFAULT_PAGE: u32 = 1;

/// Limit used when the caller gives none (or a non-positive one)
pub const DEFAULT_LIMIT: u32 = 10;

/// Maximum items per page for top-level list queries
pub const MAX_LIMIT: u32 = 100;

/// Clamped page/limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number
    pub page: u32,
    /// Items per page, in `1..=MAX_LIMIT`
    pub limit: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageWindow {
    /// Build a window from raw GraphQL arguments
    ///
    /// Missing or non-positive values fall back to the defaults.
    pub fn from_input(page: Option<i32>, limit: Option<i32>) -> Self {
        let positive = |value: Option<i32>| {
            value
                .filter(|v| *v > 0)
                .and_then(|v| u32::try_from(v).ok())
        };
        Self {
            page: positive(page).unwrap_or(DEFAULT_PAGE),
            limit: positive(limit).unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }

    /// Number of items before this window
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// A collection that can be windowed and counted
pub trait PageSource {
    type Item;
    type Error;

    /// Fetch at most `window.limit` items starting at `window.skip()`
    fn fetch_window(
        &self,
        window: PageWindow,
    ) -> impl Future<Output = Result<Vec<Self::Item>, Self::Error>> + Send;

    /// Count every item matching the source's filter
    fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}

/// Pagination metadata exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, SimpleObject)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub current_page: u32,
    pub total_pages: u64,
}

/// One page of items plus its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(u64::from(window.limit));
        Self {
            items,
            page_info: PageInfo {
                has_next_page: u64::from(window.page) < total_pages,
                has_previous_page: window.page > 1,
                current_page: window.page,
                total_pages,
            },
            total_count,
        }
    }

    /// Convert the items, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
            total_count: self.total_count,
        }
    }
}

/// Fetch one window of `source` together with its total count
///
/// Both store calls must succeed; the first failure is returned.
pub async fn paginate<S: PageSource>(
    source: &S,
    window: PageWindow,
) -> Result<Page<S::Item>, S::Error> {
    let (items, total_count) = tokio::try_join!(source.fetch_window(window), source.count())?;
    Ok(Page::new(items, window, total_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 10)]
    #[case(Some(-1), Some(0), 1, 10)]
    #[case(Some(0), Some(-5), 1, 10)]
    #[case(Some(3), Some(25), 3, 25)]
    #[case(Some(2), Some(1_000), 2, MAX_LIMIT)]
    fn test_window_defaults_and_clamps(
        #[case] page: Option<i32>,
        #[case] limit: Option<i32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let window = PageWindow::from_input(page, limit);
        assert_eq!(window.page, expected_page);
        assert_eq!(window.limit, expected_limit);
    }

    #[test]
    fn test_skip() {
        assert_eq!(PageWindow::from_input(Some(1), Some(10)).skip(), 0);
        assert_eq!(PageWindow::from_input(Some(5), Some(2)).skip(), 8);
        assert_eq!(
            PageWindow::from_input(Some(i32::MAX), Some(100)).skip(),
            (i32::MAX as u64 - 1) * 100
        );
    }

    #[test]
    fn test_empty_collection_has_no_pages() {
        let page: Page<u8> = Page::new(vec![], PageWindow::default(), 0);
        assert_eq!(page.page_info.total_pages, 0);
        assert!(!page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);
    }

    #[test]
    fn test_partial_last_page_rounds_up() {
        let page: Page<u8> = Page::new(vec![], PageWindow::from_input(Some(1), Some(10)), 21);
        assert_eq!(page.page_info.total_pages, 3);
        assert!(page.page_info.has_next_page);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], PageWindow::from_input(Some(2), Some(2)), 5);
        let mapped = page.clone().map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.page_info, page.page_info);
        assert_eq!(mapped.total_count, 5);
    }
}
