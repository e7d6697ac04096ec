//! Navigation module
//!
//! Publishes location changes and viewport scroll resets after successful
//! page navigation.
//!
//! # Overview
//!
//! The navigation module provides:
//! - `Navigator` - Trait implemented by the location/router side channel
//! - `NoopNavigator` - Discards every signal
//! - `LocationHistory` - In-memory location tracking (CLI, tests, headless use)

mod history;
mod types;

pub use history::{HistoryEntry, LocationHistory};
pub use types::{NavigateOptions, Navigator, NoopNavigator};
