//! Pagination module
//!
//! Client-side incremental pagination: jump-to-page and load-more over a
//! paged query, with location publishing.
//!
//! # Overview
//!
//! `PaginationController` owns a `PageState` (items plus `PaginatorInfo`).
//! Each navigation issues one query through the injected `QueryClient`, maps
//! the payload through an `Extractor`, then either replaces the items or
//! appends to them. Changing the dependency set resets the state to the
//! initial page.

mod controller;
mod types;

pub use controller::{PaginationController, PaginationControllerBuilder};
pub use types::{ConcurrencyPolicy, NavigationIntent, PageState, PaginationItems, PaginatorInfo};

#[cfg(test)]
mod tests;
