//! Pagination arithmetic for the log table.

use sentinel_client::PageSize;

/// Current page, page size and the total the last applied result reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: PageSize,
    pub total: u64,
}

impl Pagination {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page: 1,
            page_size,
            total: 0,
        }
    }

    /// `ceil(total / page_size)`, 0 when there are no results.
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.page_size.get());
        u32::try_from(self.total.div_ceil(size)).unwrap_or(u32::MAX)
    }

    /// Page `n` clamped to `[1, total_pages]`.
    pub fn clamp_page(&self, n: u32) -> u32 {
        n.clamp(1, self.total_pages().max(1))
    }

    /// Move to page `n`, clamped. Returns the page selected.
    pub fn set_page(&mut self, n: u32) -> u32 {
        self.page = self.clamp_page(n);
        self.page
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.page = 1;
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// 1-based `(first, last)` entry numbers on the current page.
    pub fn visible_range(&self) -> Option<(u64, u64)> {
        if self.total == 0 {
            return None;
        }
        let size = u64::from(self.page_size.get());
        let first = u64::from(self.page.saturating_sub(1)) * size + 1;
        let last = (u64::from(self.page) * size).min(self.total);
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination(total: u64, size: u32, page: u32) -> Pagination {
        Pagination {
            page,
            page_size: PageSize::new(size).unwrap(),
            total,
        }
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(pagination(120, 50, 1).total_pages(), 3);
        assert_eq!(pagination(100, 50, 1).total_pages(), 2);
        assert_eq!(pagination(0, 50, 1).total_pages(), 0);
        assert_eq!(pagination(1, 200, 1).total_pages(), 1);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut p = pagination(120, 50, 1);
        assert_eq!(p.set_page(7), 3);
        assert_eq!(p.set_page(0), 1);

        let mut empty = pagination(0, 50, 1);
        assert_eq!(empty.set_page(5), 1);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut p = pagination(1000, 50, 3);
        p.set_page_size(PageSize::new(100).unwrap());
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages(), 10);
    }

    #[test]
    fn test_visible_range_and_neighbours() {
        let p = pagination(120, 50, 3);
        assert_eq!(p.visible_range(), Some((101, 120)));
        assert!(p.has_prev());
        assert!(!p.has_next());

        let first = pagination(120, 50, 1);
        assert_eq!(first.visible_range(), Some((1, 50)));
        assert!(!first.has_prev());
        assert!(first.has_next());

        assert_eq!(pagination(0, 25, 1).visible_range(), None);
    }
}
