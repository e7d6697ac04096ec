//! Pagination types
//!
//! Page state, paginator metadata and navigation intents shared by the
//! controller and its collaborators.

use serde::{Deserialize, Serialize};

/// Metadata describing the position within a paged collection
///
/// Replaced wholesale on every resolved fetch, never merged field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatorInfo {
    /// Number of items on the current page
    #[serde(default)]
    pub count: u64,
    /// Current page number (1-based)
    #[serde(default = "default_page")]
    pub current_page: u32,
    /// Index of the first item on the page
    #[serde(default)]
    pub first_item: Option<u64>,
    /// Index of the last item on the page
    #[serde(default)]
    pub last_item: Option<u64>,
    /// Whether another page follows this one
    #[serde(default)]
    pub has_more_pages: bool,
    /// Number of the last available page
    #[serde(default = "default_page")]
    pub last_page: u32,
    /// Page size
    #[serde(default)]
    pub per_page: u32,
    /// Total number of items across all pages
    #[serde(default)]
    pub total: u64,
}

fn default_page() -> u32 {
    1
}

impl Default for PaginatorInfo {
    fn default() -> Self {
        Self {
            count: 0,
            current_page: 1,
            first_item: None,
            last_item: None,
            has_more_pages: false,
            last_page: 1,
            per_page: 0,
            total: 0,
        }
    }
}

impl PaginatorInfo {
    /// Create paginator info for a page
    pub fn new(current_page: u32, has_more_pages: bool) -> Self {
        Self {
            current_page,
            has_more_pages,
            ..Default::default()
        }
    }

    /// Set page size
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set totals (item count and last page)
    #[must_use]
    pub fn with_total(mut self, total: u64, last_page: u32) -> Self {
        self.total = total;
        self.last_page = last_page;
        self
    }

    /// Next page number, if one exists
    ///
    /// `None` when the listing reports no more pages or the page number
    /// would overflow.
    pub fn next_page(&self) -> Option<u32> {
        self.current_page
            .checked_add(1)
            .filter(|_| self.has_more_pages)
    }
}

/// Page as produced by an extractor
///
/// Either half may be absent; missing data reads as no items and missing
/// info as [`PaginatorInfo::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationItems<T> {
    /// Items of the page
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Paginator metadata
    #[serde(default)]
    pub paginator_info: Option<PaginatorInfo>,
}

impl<T> PaginationItems<T> {
    /// Create page items
    pub fn new(data: Vec<T>, paginator_info: PaginatorInfo) -> Self {
        Self {
            data,
            paginator_info: Some(paginator_info),
        }
    }
}

/// Items accumulated so far plus the latest paginator metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState<T> {
    /// Items in arrival order
    pub items: Vec<T>,
    /// Metadata of the most recently applied page
    pub paginator_info: PaginatorInfo,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            paginator_info: PaginatorInfo::default(),
        }
    }
}

impl<T> PageState<T> {
    /// Create a page state
    pub fn new(items: Vec<T>, paginator_info: PaginatorInfo) -> Self {
        Self {
            items,
            paginator_info,
        }
    }

    /// Build state from an optional extracted page, applying defaults
    pub fn from_items(page: Option<PaginationItems<T>>) -> Self {
        match page {
            Some(page) => Self {
                items: page.data,
                paginator_info: page.paginator_info.unwrap_or_default(),
            },
            None => Self::default(),
        }
    }

    /// Append an extracted page: items extend, paginator info is replaced
    pub fn append(&mut self, page: Option<PaginationItems<T>>) {
        let next = Self::from_items(page);
        self.items.extend(next.items);
        self.paginator_info = next.paginator_info;
    }

    /// Number of items held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if no items are held
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Navigation requested by the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationIntent {
    /// Jump to a page, replacing the current items
    PageChange {
        /// Target page
        page: u32,
        /// Location to publish
        url: String,
    },
    /// Fetch a page and append it to the current items
    LoadMore {
        /// Target page
        page: u32,
        /// Location to publish
        url: String,
    },
}

impl NavigationIntent {
    /// Create a page change intent
    pub fn page_change(page: u32, url: impl Into<String>) -> Self {
        Self::PageChange {
            page,
            url: url.into(),
        }
    }

    /// Create a load more intent
    pub fn load_more(page: u32, url: impl Into<String>) -> Self {
        Self::LoadMore {
            page,
            url: url.into(),
        }
    }

    /// Target page
    pub fn page(&self) -> u32 {
        match self {
            Self::PageChange { page, .. } | Self::LoadMore { page, .. } => *page,
        }
    }

    /// Location to publish
    pub fn url(&self) -> &str {
        match self {
            Self::PageChange { url, .. } | Self::LoadMore { url, .. } => url,
        }
    }

    /// Check if this intent appends
    pub fn is_append(&self) -> bool {
        matches!(self, Self::LoadMore { .. })
    }
}

/// How resolutions of concurrent navigations are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// Every resolution is applied; the one that resolves last wins
    #[default]
    LastResolvedWins,
    /// Resolutions of superseded requests are discarded
    ///
    /// A request is superseded as soon as a newer one is issued or the state
    /// is reset, whether or not the newer request later succeeds. If the newer
    /// request is rejected, the older resolution is still dropped and the
    /// state stays on the page it held before both were issued.
    LatestIssuedWins,
}
