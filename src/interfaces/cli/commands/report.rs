//! Aggregate report commands: summary, breakdown, values, trend

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use super::helpers::{bar, or_na, percent_or_na, print_empty_notice, print_json};
use crate::analytics::{FilterCriteria, GroupField};
use crate::interfaces::cli::{CliError, QueryContext};
use crate::services::{CategoryStats, Insights, SummaryStats};

const BAR_WIDTH: usize = 30;

#[derive(Serialize)]
struct SummaryReport {
    summary: SummaryStats,
    insights: Insights,
    sources: Vec<CategoryStats>,
    devices: Vec<CategoryStats>,
    countries: Vec<CategoryStats>,
}

pub fn show_summary(
    ctx: &QueryContext<'_>,
    criteria: &FilterCriteria,
    json: bool,
) -> Result<(), CliError> {
    info!("CLI: summary with {:?}", criteria);
    let records = ctx.filter(criteria);
    let top_n = ctx.config.display.top_n;

    let top = |mut stats: Vec<CategoryStats>| {
        stats.truncate(top_n);
        stats
    };

    let report = SummaryReport {
        summary: ctx.service.summary(&records),
        insights: ctx.service.insights(&records),
        sources: top(ctx.service.source_stats(&records)),
        devices: top(ctx.service.device_stats(&records)),
        countries: top(ctx.service.country_stats(&records)),
    };

    if json {
        return print_json(&report);
    }

    let s = &report.summary;
    println!("{}", "Summary".bold().green());
    println!("  {}:  {}", "Total submissions".cyan(), s.total_submissions);
    println!("  {}:           {}", "With UTM".cyan(), s.with_utm);
    println!("  {}:   {}", "Unique countries".cyan(), s.unique_countries);
    println!("  {}:         {}", "Top source".cyan(), or_na(s.top_source.as_deref()));
    println!("  {}:         {}", "Top medium".cyan(), or_na(s.top_medium.as_deref()));
    println!("  {}:       {}", "Top campaign".cyan(), or_na(s.top_campaign.as_deref()));
    println!();

    let i = &report.insights;
    println!("{}", "Key insights".bold().green());
    println!(
        "  {} of submissions carry UTM attribution",
        percent_or_na(i.attribution_rate).yellow()
    );
    println!(
        "  {} is the best performing campaign",
        or_na(i.top_campaign.as_deref()).yellow()
    );
    println!(
        "  {} of submissions come from mobile",
        percent_or_na(i.mobile_share).yellow()
    );

    print_breakdown_table("Top sources", &report.sources);
    print_breakdown_table("Devices", &report.devices);
    print_breakdown_table("Top countries", &report.countries);
    Ok(())
}

pub fn show_breakdown(
    ctx: &QueryContext<'_>,
    field: &str,
    criteria: &FilterCriteria,
    json: bool,
) -> Result<(), CliError> {
    let field: GroupField = field.parse()?;
    info!("CLI: breakdown by {} with {:?}", field, criteria);

    let records = ctx.filter(criteria);
    let stats = ctx.service.breakdown(&records, field);

    if json {
        return print_json(&stats);
    }
    if stats.is_empty() {
        print_empty_notice();
        return Ok(());
    }

    print_breakdown_table(&format!("Submissions by {}", field), &stats);
    Ok(())
}

pub fn show_values(ctx: &QueryContext<'_>, field: &str, json: bool) -> Result<(), CliError> {
    let values = ctx.service.unique_values(ctx.store.records(), field)?;

    if json {
        return print_json(&values);
    }
    if values.is_empty() {
        println!("{} No values recorded for '{}'", "ℹ".bold().blue(), field);
        return Ok(());
    }

    for value in &values {
        println!("{}", value);
    }
    Ok(())
}

pub fn show_trend(
    ctx: &QueryContext<'_>,
    criteria: &FilterCriteria,
    json: bool,
) -> Result<(), CliError> {
    info!("CLI: trend with {:?}", criteria);
    let records = ctx.filter(criteria);
    let trend = ctx.service.daily_trend(&records);

    if json {
        return print_json(&trend);
    }
    if trend.is_empty() {
        print_empty_notice();
        return Ok(());
    }

    let max = trend.iter().map(|p| p.submissions).max().unwrap_or(0);
    println!(
        "{} {}",
        "Daily submissions".bold().green(),
        format!("(UTC{})", ctx.service.offset()).dimmed()
    );
    for point in &trend {
        println!(
            "  {}  {:>4}  {}",
            point.date.format("%b %d").to_string().cyan(),
            point.submissions,
            bar(point.submissions, max, BAR_WIDTH).green()
        );
    }
    Ok(())
}

fn print_breakdown_table(title: &str, stats: &[CategoryStats]) {
    println!();
    println!("{}", title.bold().green());
    if stats.is_empty() {
        println!("  {}", "no data".dimmed());
        return;
    }

    let width = stats.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let max = stats.first().map_or(0, |s| s.count);
    for s in stats {
        println!(
            "  {:<width$}  {:>4}  {:>5.1}%  {}",
            s.name.cyan(),
            s.count,
            s.percentage,
            bar(s.count, max, BAR_WIDTH).blue(),
            width = width
        );
    }
}
