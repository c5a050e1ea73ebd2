//! List submissions command

use colored::Colorize;
use tracing::info;

use super::helpers::{print_empty_notice, print_json};
use crate::analytics::{FilterCriteria, TrackingRecord};
use crate::interfaces::cli::{CliError, QueryContext};
use crate::services::paginate;
use crate::utils::TimeParser;

pub fn list_records(
    ctx: &QueryContext<'_>,
    criteria: &FilterCriteria,
    search: Option<&str>,
    page: usize,
    json: bool,
) -> Result<(), CliError> {
    info!("CLI: list page {} with {:?}", page, criteria);

    let records = ctx.filter(criteria);
    let hits = ctx.service.search(&records, search.unwrap_or_default());
    let page = paginate(&hits, page, ctx.config.display.page_size);

    if json {
        return print_json(&page);
    }
    if page.items.is_empty() {
        print_empty_notice();
        return Ok(());
    }

    println!("{}", "Submissions:".bold().green());
    println!();
    for record in &page.items {
        println!("  {}", format_row(record, ctx));
    }
    println!();
    println!(
        "{} Page {} of {} ({} submissions)",
        "ℹ".bold().blue(),
        page.page.to_string().green(),
        page.total_pages,
        page.total_items.to_string().green()
    );
    Ok(())
}

fn format_row(record: &TrackingRecord, ctx: &QueryContext<'_>) -> String {
    let offset = ctx.service.offset();
    let mut parts = vec![
        TimeParser::format_display(record.timestamp, &offset)
            .dimmed()
            .to_string(),
        record.form_type.to_string().bold().to_string(),
    ];

    match (&record.utm.source, &record.utm.medium, &record.utm.campaign) {
        (Some(source), medium, campaign) => parts.push(format!(
            "{} / {} / {}",
            source.cyan(),
            medium.as_deref().unwrap_or("-"),
            campaign.as_deref().unwrap_or("-")
        )),
        _ => parts.push("Direct".yellow().to_string()),
    }

    if let Some(referrer) = &record.referrer {
        parts.push(format!("via {}", referrer.blue()));
    }

    parts.push(format!(
        "{} {} {}",
        record.device_type, record.browser, record.country
    ));

    parts.join("  ")
}
