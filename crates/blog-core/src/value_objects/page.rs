//! Page-number pagination over an ordered collection
//!
//! A feed is described by its total row count; [`Paginator`] turns a
//! requested page number into a LIMIT/OFFSET window and [`Page`] carries the
//! resulting slice together with the numbers a template needs.

use std::ops::RangeInclusive;

/// Splits `total` records into pages of `per_page`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total: u64,
    per_page: u32,
}

/// LIMIT/OFFSET window for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number after clamping
    pub number: u32,
    pub offset: i64,
    pub limit: i64,
}

impl Paginator {
    /// `per_page` of zero is treated as one
    pub fn new(total: u64, per_page: u32) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of pages; an empty collection still has one (empty) page
    pub fn num_pages(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// Clamp a requested page number to the nearest valid page.
    /// `None` means the parameter was absent or not a number.
    pub fn clamp(&self, requested: Option<i64>) -> u32 {
        match requested {
            None => 1,
            Some(n) if n < 1 => 1,
            Some(n) => u32::try_from(n).unwrap_or(u32::MAX).min(self.num_pages()),
        }
    }

    pub fn window(&self, requested: Option<i64>) -> PageWindow {
        let number = self.clamp(requested);
        PageWindow {
            number,
            offset: i64::from(number - 1) * i64::from(self.per_page),
            limit: i64::from(self.per_page),
        }
    }

    /// Wrap the rows fetched for `window` into a page
    pub fn page<T>(&self, window: PageWindow, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: window.number,
            num_pages: self.num_pages(),
            total: self.total,
            per_page: self.per_page,
        }
    }
}

/// Page links shown on each side of the current page
pub const PAGE_LINK_RADIUS: u32 = 3;

/// One page of an ordered collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub num_pages: u32,
    pub total: u64,
    pub per_page: u32,
}

impl<T> Page<T> {
    #[inline]
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_page_number(&self) -> Option<u32> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_page_number(&self) -> Option<u32> {
        self.has_next().then(|| self.number + 1)
    }

    /// Page numbers to link, at most [`PAGE_LINK_RADIUS`] either side of
    /// the current one
    pub fn page_range(&self) -> RangeInclusive<u32> {
        let first = self.number.saturating_sub(PAGE_LINK_RADIUS).max(1);
        let last = self.number.saturating_add(PAGE_LINK_RADIUS).min(self.num_pages);
        first..=last
    }

    /// 1-based index of the first item on this page, 0 when empty
    pub fn start_index(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            u64::from(self.number - 1) * u64::from(self.per_page) + 1
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert the items, keeping the page metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
        }
    }
}
