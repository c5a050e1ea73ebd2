//! Privacy Tracker - privacy-respecting marketing attribution analytics
//!
//! This library provides the core functionality for Privacy Tracker: a
//! generated dataset of form submissions with UTM attribution, filtering,
//! aggregation and CSV export.
//!
//! # Features
//! - **cli**: Colored terminal output (default)
//!
//! # Architecture
//! - `analytics`: Tracking records, dataset generation, filtering
//! - `services`: Aggregation, submission capture, tracking snippet
//! - `utils`: CSV export and time formatting
//! - `interfaces`: Command-line interface
//! - `config`: Configuration management
//! - `system`: Logging setup

pub mod analytics;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod services;
pub mod system;
pub mod utils;
