//! Lock-free work queue for distributing repositories across workers

use std::sync::atomic::{AtomicUsize, Ordering};

/// Lock-free queue distributing items to parallel workers.
///
/// Workers call [`next()`](WorkQueue::next) to atomically claim the next
/// item. Construction-time filtering drops items that should never be
/// scheduled (qualification thresholds) before any worker sees them.
pub struct WorkQueue<S> {
    items: Vec<S>,
    cursor: AtomicUsize,
}

impl<S> WorkQueue<S> {
    /// Queue over all items, in order.
    pub fn new(items: Vec<S>) -> Self {
        Self {
            items,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Queue keeping only items that pass `keep`; the rest cost nothing.
    pub fn filtered(items: Vec<S>, keep: impl Fn(&S) -> bool) -> Self {
        let total = items.len();
        let kept: Vec<S> = items.into_iter().filter(|s| keep(s)).collect();
        log::debug!("work queue: {} of {total} items kept", kept.len());
        Self {
            items: kept,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Atomically claim the next item, or `None` when drained.
    pub fn next(&self) -> Option<&S> {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.items.get(i)
    }

    /// Items in the queue after filtering.
    pub fn total(&self) -> usize {
        self.items.len()
    }
}
