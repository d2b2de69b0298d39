//! Output formatting utilities for the tlq CLI.
//!
//! - [`statuses`] - Matched status output (eval)
//! - [`query`] - Compiled query output (check)
//! - [`catalog`] - Source and field listings
//! - [`helpers`] - Common formatting utilities (truncation, handles, ages)

mod catalog;
pub mod helpers;
mod query;
mod statuses;

pub use catalog::{format_fields_json, format_fields_table, format_sources_json, format_sources_table};
pub use query::{format_check_json, format_check_table};
pub use statuses::{format_statuses_json, format_statuses_table};
