// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Solidafy Pager
//!
//! Client-side incremental pagination for paged GraphQL listings.
//! Jump to a page or load more onto the current one, and keep a shareable
//! location in sync.
//!
//! ## Features
//!
//! - **Replace or Append**: `go_to_page` swaps the items, `load_more` extends them
//! - **Injected Collaborators**: query client, extractor and navigator are traits
//! - **Dependency Resets**: a changed dependency set restores the initial page
//! - **GraphQL over HTTP**: retrying, rate-limited query client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_pager::extract::JsonPathExtractor;
//! use solidafy_pager::navigation::LocationHistory;
//! use solidafy_pager::pagination::PaginationController;
//! use solidafy_pager::query::HttpQueryClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> solidafy_pager::Result<()> {
//!     let client = HttpQueryClient::new("https://api.example.com/graphql")?;
//!     let history = LocationHistory::new();
//!
//!     let posts = PaginationController::<serde_json::Value>::builder(Arc::new(client), POSTS)
//!         .extractor(JsonPathExtractor::new("posts"))
//!         .navigator(history.clone())
//!         .build()?;
//!
//!     posts.go_to_page(2, "/posts?page=2").await?;
//!     posts.load_more(3, "/posts?page=3").await?;
//!     println!("{} posts", posts.items().len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    PaginationController                      │
//! │  go_to_page() → replace   load_more() → append               │
//! │  reset_state(deps)        set_items(state)                   │
//! └──────────────────────────────────────────────────────────────┘
//!          │                     │                     │
//! ┌────────┴───────┐   ┌─────────┴───────┐   ┌─────────┴────────┐
//! │  QueryClient   │   │    Extractor    │   │    Navigator     │
//! ├────────────────┤   ├─────────────────┤   ├──────────────────┤
//! │ GraphQL/HTTP   │   │ JSON path       │   │ Location history │
//! │ Retry, Backoff │   │ Closures        │   │ Scroll reset     │
//! │ Rate Limit     │   │                 │   │                  │
//! └────────────────┘   └─────────────────┘   └──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pagination state and controller
pub mod pagination;

/// Query collaborator and GraphQL client
pub mod query;

/// Payload to page extraction
pub mod extract;

/// Location publishing
pub mod navigation;

/// Template interpolation
pub mod template;

/// YAML loader for listing definitions
pub mod loader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use pagination::{
    ConcurrencyPolicy, NavigationIntent, PageState, PaginationController, PaginationItems,
    PaginatorInfo,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
