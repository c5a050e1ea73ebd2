//! Tracking snippet command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{SnippetOptions, render_snippet, write_snippet};

pub fn print_script(
    endpoint: Option<String>,
    debug: bool,
    output: Option<String>,
) -> Result<(), CliError> {
    let options = SnippetOptions { debug, endpoint };

    match output {
        Some(path) => {
            write_snippet(&options, &path)?;
            println!(
                "{} Tracking snippet written to {}",
                "✓".bold().green(),
                path.blue()
            );
            println!(
                "  {}",
                "Add data-privacy-track to the forms you want to attribute".dimmed()
            );
        }
        None => print!("{}", render_snippet(&options)?),
    }
    Ok(())
}
