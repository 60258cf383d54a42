//! Cursor-walk pagination over a remote connection
//!
//! The fetch closure is expected to already be retry-wrapped (see
//! [`crate::retry::execute_with_retry`]); the paginator only threads the
//! opaque cursor, enforces caps, and spaces out page fetches.

use std::time::Duration;

use crate::error::ApiError;

/// Continuation marker returned with every page.
///
/// The cursor is opaque: it is never inspected, only handed back to the
/// next fetch. A cursor is only meaningful for the exact query and
/// variables that produced it.
#[derive(Debug, Clone, Default)]
pub struct PageCursor {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// One batch of items plus its continuation marker.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageCursor,
}

/// Lazy walk over a paginated resource.
///
/// Yields `Result<Vec<T>, ApiError>` per page until the upstream reports no
/// further pages, an item or page cap is reached, or a fetch fails (the
/// error is yielded once and the walk ends). Holds no durable state — a
/// consumer that stops early must persist the cursor itself if it wants to
/// resume.
pub struct Paginator<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, ApiError>,
{
    fetch: F,
    throttle: Duration,
    cursor: Option<String>,
    item_cap: Option<usize>,
    page_cap: Option<usize>,
    items_seen: usize,
    pages_seen: usize,
    started: bool,
    done: bool,
    page_capped: bool,
}

impl<T, F> Paginator<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, ApiError>,
{
    /// `throttle` is slept before every fetch except the first.
    pub fn new(fetch: F, throttle: Duration) -> Self {
        Self {
            fetch,
            throttle,
            cursor: None,
            item_cap: None,
            page_cap: None,
            items_seen: 0,
            pages_seen: 0,
            started: false,
            done: false,
            page_capped: false,
        }
    }

    /// Stop once `cap` items have been yielded, truncating the final page.
    pub fn item_cap(mut self, cap: usize) -> Self {
        self.item_cap = Some(cap);
        self
    }

    /// Stop after `cap` pages even if the upstream has more.
    pub fn page_cap(mut self, cap: usize) -> Self {
        self.page_cap = Some(cap);
        self
    }

    /// Whether the walk ended because of the page cap while the upstream
    /// still had pages — callers use this to surface the truncation.
    pub fn hit_page_cap(&self) -> bool {
        self.page_capped
    }
}

impl<T, F> Iterator for Paginator<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, ApiError>,
{
    type Item = Result<Vec<T>, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started && !self.throttle.is_zero() {
            std::thread::sleep(self.throttle);
        }
        self.started = true;

        let page = match (self.fetch)(self.cursor.as_deref()) {
            Ok(p) => p,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        self.pages_seen += 1;
        self.cursor = page.page_info.end_cursor;

        let mut items = page.items;
        if let Some(cap) = self.item_cap {
            let remaining = cap.saturating_sub(self.items_seen);
            if items.len() >= remaining {
                items.truncate(remaining);
                self.done = true;
            }
        }
        self.items_seen += items.len();

        if !page.page_info.has_next_page {
            self.done = true;
        }
        if let Some(cap) = self.page_cap {
            if self.pages_seen >= cap && !self.done {
                self.done = true;
                self.page_capped = true;
            }
        }
        Some(Ok(items))
    }
}
