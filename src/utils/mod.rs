pub mod csv_handler;
pub mod time_parser;

pub use time_parser::TimeParser;

/// Percentage of `part` in `total`, `0.0` for an empty total
pub fn percentage(part: usize, total: usize) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Rounded whole percentage, `None` for an empty total
pub fn rounded_percentage(part: usize, total: usize) -> Option<u32> {
    (total > 0).then(|| percentage(part, total).round() as u32)
}
