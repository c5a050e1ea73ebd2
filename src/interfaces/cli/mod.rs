//! CLI interface module
//!
//! This module provides command-line interface functionality for privacy-tracker.

pub mod commands;

use std::fmt;

use crate::analytics::{FilterCriteria, TrackingRecord, TrackingStore};
use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::TrackerError;
use crate::services::AnalyticsService;
use commands::{
    capture_submission, config_management, export_records, list_records, print_script,
    show_breakdown, show_summary, show_trend, show_values,
};

#[derive(Debug)]
pub enum CliError {
    ConfigError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ConfigError(msg) => format!("Config error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    #[cfg(feature = "cli")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::ConfigError(msg) => {
                format!("{} {}", "Config error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<TrackerError> for CliError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::InvalidArgument(msg) => CliError::ParseError(msg),
            TrackerError::Config(msg) => CliError::ConfigError(msg),
            other => CliError::CommandError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::CommandError(format!("Failed to encode JSON: {}", err))
    }
}

/// Everything a query command reads: the dataset and the aggregator
pub struct QueryContext<'a> {
    pub config: &'a StaticConfig,
    pub store: TrackingStore,
    pub service: AnalyticsService,
}

impl<'a> QueryContext<'a> {
    pub fn new(config: &'a StaticConfig) -> Result<Self, CliError> {
        let service = AnalyticsService::from_config(&config.display)?;
        let store = TrackingStore::generate(&config.dataset);
        Ok(Self {
            config,
            store,
            service,
        })
    }

    /// Date ranges are relative to the instant the dataset was generated
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<TrackingRecord> {
        self.store.filter_at(criteria, self.store.generated_at())
    }
}

/// Run a CLI command from clap-parsed input
pub fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    match cmd {
        Commands::Summary { filter, json } => {
            show_summary(&QueryContext::new(config)?, &filter.criteria()?, json)
        }

        Commands::Breakdown {
            field,
            filter,
            json,
        } => show_breakdown(&QueryContext::new(config)?, &field, &filter.criteria()?, json),

        Commands::Values { field, json } => show_values(&QueryContext::new(config)?, &field, json),

        Commands::Trend { filter, json } => {
            show_trend(&QueryContext::new(config)?, &filter.criteria()?, json)
        }

        Commands::List {
            filter,
            search,
            page,
            json,
        } => list_records(
            &QueryContext::new(config)?,
            &filter.criteria()?,
            search.as_deref(),
            page,
            json,
        ),

        Commands::Export {
            filter,
            output,
            stdout,
        } => export_records(&QueryContext::new(config)?, &filter.criteria()?, output, stdout),

        // 以下命令不需要数据集
        Commands::Capture {
            url,
            referrer,
            user_agent,
            form_type,
            country,
            fields,
        } => capture_submission(url, referrer, user_agent, form_type, country, fields),

        Commands::Script {
            endpoint,
            debug,
            output,
        } => print_script(endpoint, debug, output),

        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => {
                config_management::config_generate(output_path, force)
            }
            ConfigCommands::Show => config_management::config_show(config),
        },
    }
}
