//! In-memory location history
//!
//! Tracks the current location the way a browser router would, without a
//! browser. Cloned handles share the same history.

use super::types::{NavigateOptions, Navigator};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// A published location change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Published location
    pub url: String,
    /// Options it was published with
    pub options: NavigateOptions,
}

#[derive(Debug, Default)]
struct HistoryInner {
    stack: Vec<String>,
    published: Vec<HistoryEntry>,
    scroll_resets: usize,
}

/// Shared in-memory history stack
#[derive(Debug, Clone, Default)]
pub struct LocationHistory {
    inner: Arc<Mutex<HistoryInner>>,
}

impl LocationHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history positioned at a location
    pub fn starting_at(url: impl Into<String>) -> Self {
        let history = Self::new();
        history.lock().stack.push(url.into());
        history
    }

    fn lock(&self) -> MutexGuard<'_, HistoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current location, if any was set
    pub fn current(&self) -> Option<String> {
        self.lock().stack.last().cloned()
    }

    /// Depth of the history stack
    pub fn depth(&self) -> usize {
        self.lock().stack.len()
    }

    /// Every publish call in order
    pub fn published(&self) -> Vec<HistoryEntry> {
        self.lock().published.clone()
    }

    /// Number of scroll resets requested
    pub fn scroll_resets(&self) -> usize {
        self.lock().scroll_resets
    }
}

impl Navigator for LocationHistory {
    fn publish(&self, url: &str, options: NavigateOptions) {
        debug!("Publishing location {} ({:?})", url, options);
        let mut inner = self.lock();
        if options.replace_history_entry && !inner.stack.is_empty() {
            inner.stack.pop();
        }
        inner.stack.push(url.to_string());
        inner.published.push(HistoryEntry {
            url: url.to_string(),
            options,
        });
    }

    fn reset_scroll(&self) {
        self.lock().scroll_resets += 1;
    }
}
