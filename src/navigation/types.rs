//! Navigator trait and options

use serde::{Deserialize, Serialize};

/// Options attached to a published location change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one
    pub replace_history_entry: bool,
    /// Change the location without reloading the page
    pub shallow: bool,
}

impl NavigateOptions {
    /// Shallow navigation that does not stack history entries
    pub fn shallow() -> Self {
        Self {
            replace_history_entry: true,
            shallow: true,
        }
    }
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self::shallow()
    }
}

/// Location indicator the controller reports navigation to
///
/// Both calls are fire-and-forget.
pub trait Navigator: Send + Sync {
    /// Publish a location change
    fn publish(&self, url: &str, options: NavigateOptions);

    /// Scroll the viewport back to its origin
    fn reset_scroll(&self);
}

/// Navigator that ignores every signal
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn publish(&self, _url: &str, _options: NavigateOptions) {}

    fn reset_scroll(&self) {}
}
