//! CLI module
//!
//! Command-line interface for paging through a listing.
//!
//! # Commands
//!
//! - `page` - Jump to a page and print its state
//! - `more` - Jump to a page, then load further pages onto it
//! - `validate` - Validate a listing definition

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{build_controller, run_more, run_page, RunReport, Runner};
