//! Page arithmetic and filter-preserving page links.
//!
//! Pages are 1-indexed. Links are query strings carrying the caller's filter
//! parameters plus `page=N`, so moving between pages keeps the listing filtered.

use crate::{FilterError, FilterResult};
use serde::Serialize;
use std::ops::Range;

pub const PAGE_PARAM: &str = "page";

/// Information about one page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    /// Indices of the items on this page.
    #[serde(skip)]
    pub range: Range<usize>,
    /// 1-based position of the first item on the page, 0 when empty.
    pub from: usize,
    /// 1-based position of the last item on the page, 0 when empty.
    pub to: usize,
    pub per_page: usize,
    pub current_page: usize,
    pub last_page: usize,
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageInfo {
    /// Create an empty page info (no items).
    pub fn empty(total_items: usize) -> Self {
        Self {
            range: 0..0,
            from: 0,
            to: 0,
            per_page: 0,
            current_page: 1,
            last_page: 1,
            total_items,
            has_previous: false,
            has_next: false,
        }
    }
}

/// Query strings for navigating between pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLinks {
    pub first: String,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paginator {
    pub total_items: usize,
    pub per_page: usize,
    pub current_page: usize,
}

impl Paginator {
    pub fn new(total_items: usize, per_page: usize) -> Self {
        Self {
            total_items,
            per_page,
            current_page: 1,
        }
    }

    /// Move to a page, clamping to the valid range.
    pub fn with_page(mut self, page: usize) -> Self {
        self.current_page = page.clamp(1, self.last_page());
        self
    }

    pub fn last_page(&self) -> usize {
        if self.per_page == 0 {
            return 1;
        }
        self.total_items.div_ceil(self.per_page).max(1)
    }

    pub fn offset(&self) -> usize {
        self.current_page.saturating_sub(1).saturating_mul(self.per_page)
    }

    pub fn page_info(&self) -> PageInfo {
        if self.total_items == 0 || self.per_page == 0 {
            return PageInfo {
                per_page: self.per_page,
                ..PageInfo::empty(self.total_items)
            };
        }

        let start = self.offset().min(self.total_items);
        let end = (start + self.per_page).min(self.total_items);
        let last_page = self.last_page();
        let (from, to) = if start < end { (start + 1, end) } else { (0, 0) };

        PageInfo {
            range: start..end,
            from,
            to,
            per_page: self.per_page,
            current_page: self.current_page,
            last_page,
            total_items: self.total_items,
            has_previous: self.current_page > 1,
            has_next: self.current_page < last_page,
        }
    }

    /// The items on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.page_info().range;
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }

    /// Build a query string for `page`, appending it to `params`.
    ///
    /// Any `page` entry already in `params` is replaced.
    pub fn url_for_page(params: &[(String, String)], page: usize) -> FilterResult<String> {
        let mut pairs: Vec<(&str, String)> = params
            .iter()
            .filter(|(key, _)| key != PAGE_PARAM)
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        pairs.push((PAGE_PARAM, page.to_string()));
        serde_urlencoded::to_string(&pairs).map_err(|e| FilterError::Serialization(e.to_string()))
    }

    pub fn links(&self, params: &[(String, String)]) -> FilterResult<PageLinks> {
        let last_page = self.last_page();
        let previous = if self.current_page > 1 {
            Some(Self::url_for_page(params, self.current_page - 1)?)
        } else {
            None
        };
        let next = if self.current_page < last_page {
            Some(Self::url_for_page(params, self.current_page + 1)?)
        } else {
            None
        };

        Ok(PageLinks {
            first: Self::url_for_page(params, 1)?,
            previous,
            next,
            last: Self::url_for_page(params, last_page)?,
        })
    }
}
