//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for privacy-tracker using clap's derive macros.

use clap::{Args, Parser, Subcommand};

use crate::analytics::{DateRange, FieldFilter, FilterCriteria, FormType};
use crate::errors::TrackerError;

/// Privacy Tracker - privacy-respecting form attribution analytics
#[derive(Parser)]
#[command(name = "privacy-tracker")]
#[command(version)]
#[command(about = "Privacy-respecting marketing attribution analytics", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Seed for the generated dataset (overrides dataset.seed)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Number of generated records (overrides dataset.size)
    #[arg(long, global = true)]
    pub size: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filter flags shared by the query commands
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Date range: 7d, 30d, 90d or all
    #[arg(long, default_value = "7d")]
    pub range: String,

    /// Country code (e.g. US)
    #[arg(long)]
    pub country: Option<String>,

    /// Device type (Desktop, Mobile, Tablet)
    #[arg(long)]
    pub device: Option<String>,

    /// UTM source
    #[arg(long)]
    pub source: Option<String>,

    /// UTM medium
    #[arg(long)]
    pub medium: Option<String>,

    /// UTM campaign
    #[arg(long)]
    pub campaign: Option<String>,
}

impl FilterArgs {
    /// Convert flags into filter criteria
    ///
    /// `all` (or an empty value) leaves a dimension unconstrained. Unlike the
    /// lenient query surface, an unknown range is rejected here.
    pub fn criteria(&self) -> Result<FilterCriteria, TrackerError> {
        let range = self.range.trim();
        let date_range = if range.is_empty() || range.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(range.parse::<DateRange>()?)
        };

        let field = |value: &Option<String>| {
            value
                .as_deref()
                .map(FieldFilter::from_query)
                .unwrap_or_default()
        };

        Ok(FilterCriteria {
            date_range,
            country: field(&self.country),
            device: field(&self.device),
            utm_source: field(&self.source),
            utm_medium: field(&self.medium),
            utm_campaign: field(&self.campaign),
        })
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show summary cards, insights and top breakdowns
    Summary {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Group submissions by source, device or country
    Breakdown {
        /// Attribute to group by: source, device, country
        field: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List distinct values of an attribute (filter options)
    Values {
        /// Attribute name, e.g. country, device_type, utm_source
        field: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show submissions per day for the most recent days
    Trend {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List submissions, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Case-insensitive search across all displayed columns
        #[arg(long)]
        search: Option<String>,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export filtered submissions to CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output directory (default: export.output_dir)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Write CSV to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Build a submission record from browser-side inputs
    Capture {
        /// Landing page URL (or query string) carrying UTM parameters
        #[arg(long)]
        url: String,

        /// Referer header value
        #[arg(long)]
        referrer: Option<String>,

        /// User-Agent header value
        #[arg(long)]
        user_agent: Option<String>,

        /// Form type: contact, newsletter, demo, download
        #[arg(long, default_value = "contact", value_parser = parse_form_type)]
        form_type: FormType,

        /// Two-letter country code
        #[arg(long)]
        country: String,

        /// Form field as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// Print the client-side tracking snippet
    Script {
        /// Collection endpoint the snippet reports to
        #[arg(long)]
        endpoint: Option<String>,

        /// Enable console logging in the snippet
        #[arg(long)]
        debug: bool,

        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}

fn parse_form_type(value: &str) -> Result<FormType, String> {
    if let Ok(form_type) = value.parse::<FormType>() {
        return Ok(form_type);
    }
    match value.to_lowercase().as_str() {
        "contact" | "contact-form" | "contact_form" => Ok(FormType::ContactForm),
        "newsletter" => Ok(FormType::Newsletter),
        "demo" | "demo-request" | "demo_request" => Ok(FormType::DemoRequest),
        "download" => Ok(FormType::Download),
        _ => Err(format!(
            "unknown form type '{}' (contact, newsletter, demo, download)",
            value
        )),
    }
}

fn parse_key_value(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), val.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", value)),
    }
}
