//! Pagination parameters and derived page metadata.
//!
//! The math lives here as pure functions so the list contract
//! (`total_pages = ceil(total / page_size)`, `next` present only while more
//! rows remain) is unit-testable without a store.

/// Pagination parameters, already validated at the HTTP boundary.
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page, 1..=100
    pub page_size: u32,
}

impl Pagination {
    /// Row offset of the first item on this page.
    pub fn offset(self) -> u64 {
        (u64::from(self.page) - 1) * u64::from(self.page_size)
    }

    pub fn limit(self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, page_size: 10 }
    }
}

/// Metadata accompanying one page of results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub next: Option<u32>,
    pub page_size: u32,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn compute(total: u64, p: Pagination) -> Self {
        let total_pages = total.div_ceil(u64::from(p.page_size));
        let next = if u64::from(p.page) * u64::from(p.page_size) < total {
            Some(p.page + 1)
        } else {
            None
        };
        Self {
            total,
            page: p.page,
            next,
            page_size: p.page_size,
            total_pages,
        }
    }
}
