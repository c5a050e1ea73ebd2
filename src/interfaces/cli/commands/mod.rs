//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod capture;
pub mod config_management;
mod export;
mod helpers;
mod list;
mod report;
mod script;

pub use capture::capture_submission;
pub use export::export_records;
pub use list::list_records;
pub use report::{show_breakdown, show_summary, show_trend, show_values};
pub use script::print_script;
