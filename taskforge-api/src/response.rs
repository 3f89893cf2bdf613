/// Success response envelopes
///
/// Every successful response carries the same wrapper:
///
/// ```json
/// { "success": true, "message": "...", "data": ... }
/// ```
///
/// `data` is always present, null for operations with nothing to return
/// (delete). List responses extend the wrapper with `meta` (pagination
/// counters) and `links` (page navigation URLs built from the request
/// path, page number only).

use serde::Serialize;

use taskforge_shared::query::page::Page;

/// Standard success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always `true` for successes
    pub success: bool,

    /// Human-readable outcome message
    pub message: String,

    /// Response payload
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
        }
    }
}

/// Success envelope with a null data payload
pub fn message_only(message: &str) -> Envelope<Option<()>> {
    Envelope::new(message, None)
}

/// Pagination counters for list responses
#[derive(Debug, Serialize)]
pub struct PageMeta {
    /// Total matching items across all pages
    pub total: i64,

    /// Page size
    pub per_page: i64,

    /// 1-based page number
    pub current_page: i64,

    /// Number of the last page
    pub last_page: i64,

    /// 1-based index of the first item on this page, null when empty
    pub from: Option<i64>,

    /// 1-based index of the last item on this page, null when empty
    pub to: Option<i64>,
}

impl PageMeta {
    pub fn of<T>(page: &Page<T>) -> Self {
        Self {
            total: page.total,
            per_page: page.per_page,
            current_page: page.current_page,
            last_page: page.last_page(),
            from: page.from(),
            to: page.to(),
        }
    }
}

/// Page navigation URLs for list responses
///
/// `prev` and `next` are null at the edges.
#[derive(Debug, Serialize)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl PageLinks {
    pub fn of<T>(path: &str, page: &Page<T>) -> Self {
        let last_page = page.last_page();

        Self {
            first: format!("{}?page=1", path),
            last: format!("{}?page={}", path, last_page),
            prev: (page.current_page > 1)
                .then(|| format!("{}?page={}", path, page.current_page - 1)),
            next: (page.current_page < last_page)
                .then(|| format!("{}?page={}", path, page.current_page + 1)),
        }
    }
}

/// Paginated list envelope
#[derive(Debug, Serialize)]
pub struct ListEnvelope<T> {
    /// Always `true` for successes
    pub success: bool,

    /// Human-readable outcome message
    pub message: String,

    /// Items on this page
    pub data: Vec<T>,

    /// Pagination counters
    pub meta: PageMeta,

    /// Page navigation URLs
    pub links: PageLinks,
}

impl<T> ListEnvelope<T> {
    pub fn new(message: &str, path: &str, page: Page<T>) -> Self {
        let meta = PageMeta::of(&page);
        let links = PageLinks::of(path, &page);

        Self {
            success: true,
            message: message.to_string(),
            data: page.items,
            meta,
            links,
        }
    }
}
