//! Capture command: build a record from browser-side inputs

use std::collections::BTreeMap;

use colored::Colorize;

use super::helpers::print_json;
use crate::analytics::FormType;
use crate::interfaces::cli::CliError;
use crate::services::{CaptureRequest, capture};

pub fn capture_submission(
    url: String,
    referrer: Option<String>,
    user_agent: Option<String>,
    form_type: FormType,
    country: String,
    fields: Vec<(String, String)>,
) -> Result<(), CliError> {
    let request = CaptureRequest {
        landing_url: url,
        referrer,
        user_agent,
        form_type,
        country,
        form_data: fields.into_iter().collect::<BTreeMap<_, _>>(),
    };

    let record = capture::capture(request)?;

    if record.utm.is_empty() {
        eprintln!(
            "{} No UTM parameters found, submission will count as Direct",
            "ℹ".bold().blue()
        );
    }
    print_json(&record)
}
