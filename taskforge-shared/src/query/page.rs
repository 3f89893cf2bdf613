/// Offset pagination
///
/// [`PageRequest`] is the sanitized form of the `page` / `per_page` query
/// parameters, and [`Page`] is one page of results with the counters the
/// API layer needs for its `meta` and `links` blocks.
///
/// Page size is clamped between 1 and a configured ceiling, so a client
/// asking for `per_page=100000` gets the ceiling instead of a full table
/// scan, and `per_page=0` still returns something.

/// Page size used when the client does not send `per_page`
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Sanitized pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: i64,

    /// Items per page, already clamped
    pub per_page: i64,
}

impl PageRequest {
    /// Builds a request from raw values, clamping them into range
    ///
    /// `page` is floored at 1 and `per_page` is clamped to
    /// `1..=max_per_page`. A nonsensical ceiling below 1 is treated as 1.
    pub fn new(page: i64, per_page: i64, max_per_page: i64) -> Self {
        let max_per_page = max_per_page.max(1);

        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, max_per_page),
        }
    }

    /// Number of rows to skip
    ///
    /// Saturates instead of overflowing; an absurd page number just lands
    /// past the last row and produces an empty page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Number of rows to fetch
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results with pagination counters
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Total matching items across all pages
    pub total: i64,

    /// Page size this page was fetched with
    pub per_page: i64,

    /// 1-based page number
    pub current_page: i64,
}

impl<T> Page<T> {
    /// Number of the last page; 1 even when there are no items
    pub fn last_page(&self) -> i64 {
        ((self.total + self.per_page - 1) / self.per_page).max(1)
    }

    /// 1-based index of the first item on this page, `None` when empty
    pub fn from(&self) -> Option<i64> {
        if self.items.is_empty() {
            None
        } else {
            Some((self.current_page - 1) * self.per_page + 1)
        }
    }

    /// 1-based index of the last item on this page, `None` when empty
    pub fn to(&self) -> Option<i64> {
        self.from().map(|from| from + self.items.len() as i64 - 1)
    }

    /// Maps the items while keeping the counters
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            per_page: self.per_page,
            current_page: self.current_page,
        }
    }
}
