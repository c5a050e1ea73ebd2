//! Shared output helpers

use colored::Colorize;
use serde::Serialize;

use crate::interfaces::cli::CliError;

pub const NOT_AVAILABLE: &str = "N/A";

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render an optional value, `N/A` when absent
pub fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

/// Render an optional whole percentage, `N/A` when absent
pub fn percent_or_na(value: Option<u32>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{}%", v))
}

/// Fixed-width bar for trend and breakdown charts
pub fn bar(value: usize, max: usize, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (value * width).div_ceil(max);
    "█".repeat(len)
}

pub fn print_empty_notice() {
    println!(
        "{} No submissions match the current filters",
        "ℹ".bold().blue()
    );
}
