//! Page arithmetic for admin list endpoints

use serde::{Deserialize, Serialize};

/// Requested page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    /// Pages start at 1; anything lower is clamped.
    pub fn new(page: Option<i64>, per_page: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One page of results plus navigation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total: i64) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            (total + pagination.per_page - 1) / pagination.per_page
        };

        Self {
            items,
            page: pagination.page,
            per_page: pagination.per_page,
            total,
            pages,
            has_prev: pagination.page > 1,
            has_next: pagination.page < pages,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            pages: self.pages,
            has_prev: self.has_prev,
            has_next: self.has_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamped_to_one() {
        let p = Pagination::new(Some(-3), 20);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset(), 0);
        assert_eq!(Pagination::new(None, 20).page, 1);
    }

    #[test]
    fn test_offset() {
        let p = Pagination::new(Some(3), 50);
        assert_eq!(p.offset(), 100);
        assert_eq!(p.limit(), 50);
    }

    #[test]
    fn test_page_metadata() {
        let page = Page::new(vec![1, 2, 3], Pagination::new(Some(2), 3), 7);
        assert_eq!(page.pages, 3);
        assert!(page.has_prev);
        assert!(page.has_next);

        let last = Page::new(vec![7], Pagination::new(Some(3), 3), 7);
        assert!(!last.has_next);
    }

    #[test]
    fn test_page_past_end_is_empty_not_error() {
        let page: Page<i32> = Page::new(vec![], Pagination::new(Some(9), 10), 15);
        assert_eq!(page.pages, 2);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_empty_result() {
        let page: Page<i32> = Page::new(vec![], Pagination::new(Some(1), 10), 0);
        assert_eq!(page.pages, 0);
        assert!(!page.has_prev);
        assert!(!page.has_next);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], Pagination::new(Some(1), 2), 4).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 4);
    }
}
