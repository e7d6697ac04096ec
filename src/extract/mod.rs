//! Extraction module
//!
//! Maps a raw query payload to a page of items.
//!
//! # Overview
//!
//! Each paginated resource supplies its own extractor. Any
//! `Fn(TData) -> Option<PaginationItems<TModel>>` closure is an extractor;
//! `JsonPathExtractor` covers the common `{ data, paginatorInfo }` shape
//! nested under a field of the payload.

mod extractors;

pub use extractors::{extract_path, Extractor, JsonPathExtractor};
