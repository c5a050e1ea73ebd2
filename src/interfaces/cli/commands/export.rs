//! CSV export command

use std::io;
use std::path::Path;

use colored::Colorize;
use tracing::info;

use crate::analytics::FilterCriteria;
use crate::interfaces::cli::{CliError, QueryContext};
use crate::utils::csv_handler;

pub fn export_records(
    ctx: &QueryContext<'_>,
    criteria: &FilterCriteria,
    output: Option<String>,
    stdout: bool,
) -> Result<(), CliError> {
    let records = ctx.filter(criteria);
    info!("CLI: exporting {} records", records.len());

    if stdout {
        csv_handler::write_csv(&records, io::stdout().lock())?;
        return Ok(());
    }

    let dir = output.unwrap_or_else(|| ctx.config.export.output_dir.clone());
    let path = csv_handler::export_to_file(&records, Path::new(&dir))?;

    if records.is_empty() {
        println!(
            "{} No submissions match the current filters, wrote header only",
            "⚠".bold().yellow()
        );
    }
    println!(
        "{} Exported {} submissions to {}",
        "✓".bold().green(),
        records.len().to_string().green(),
        path.display().to_string().blue()
    );
    Ok(())
}
