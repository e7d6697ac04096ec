//! YAML Loader module
//!
//! Parse listing definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `ListingDefinition` - Declarative description of one paginated listing
//! - YAML parsing with validation
//! - Conversion into the query client configuration

mod parser;
mod types;

pub use parser::{load_listing, load_listing_from_str};
pub use types::{AuthDefinition, HttpDefinition, ListingDefinition};
