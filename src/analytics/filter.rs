//! Filter criteria and record filtering
//!
//! Each categorical constraint is a [`FieldFilter`]: either unconstrained or
//! an exact match. The string query surface (empty string or `all` meaning
//! "any") is converted once at the edge by [`FilterCriteria::from_query`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};
use tracing::debug;

use super::{DAY_MS, TrackingRecord};
use crate::errors::TrackerError;

/// Trailing time window a query is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum DateRange {
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    #[strum(serialize = "90d")]
    Last90Days,
}

impl DateRange {
    pub fn days(&self) -> i64 {
        match self {
            Self::Last7Days => 7,
            Self::Last30Days => 30,
            Self::Last90Days => 90,
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.days() * DAY_MS
    }

    /// Oldest timestamp still inside the window
    pub fn cutoff(&self, now_ms: i64) -> i64 {
        now_ms - self.window_ms()
    }

    /// Lenient parse: unknown tags mean "no date constraint"
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.parse().ok()
    }
}

impl FromStr for DateRange {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(Self::Last7Days),
            "30d" => Ok(Self::Last30Days),
            "90d" => Ok(Self::Last90Days),
            _ => Err(TrackerError::invalid_argument(format!(
                "Invalid date range: '{}'. Valid: 7d, 30d, 90d",
                s
            ))),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// A single categorical constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldFilter {
    #[default]
    Unconstrained,
    Equals(String),
}

impl FieldFilter {
    /// Map a query-surface value: empty or `all` is unconstrained
    pub fn from_query(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == "all" {
            Self::Unconstrained
        } else {
            Self::Equals(value.to_string())
        }
    }

    pub fn equals<T: Into<String>>(value: T) -> Self {
        Self::Equals(value.into())
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Self::Unconstrained)
    }

    /// A missing attribute never satisfies an `Equals`
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::Unconstrained => true,
            Self::Equals(expected) => value == Some(expected.as_str()),
        }
    }
}

impl From<Option<String>> for FieldFilter {
    fn from(value: Option<String>) -> Self {
        value
            .map(|v| Self::from_query(&v))
            .unwrap_or(Self::Unconstrained)
    }
}

/// Filter criteria, ANDed together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub date_range: Option<DateRange>,
    pub country: FieldFilter,
    pub device: FieldFilter,
    pub utm_source: FieldFilter,
    pub utm_medium: FieldFilter,
    pub utm_campaign: FieldFilter,
}

impl FilterCriteria {
    /// Criteria that match everything
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Build from the six string fields of the dashboard query surface
    pub fn from_query(
        date_range: &str,
        country: &str,
        device: &str,
        utm_source: &str,
        utm_medium: &str,
        utm_campaign: &str,
    ) -> Self {
        Self {
            date_range: DateRange::from_tag(date_range),
            country: FieldFilter::from_query(country),
            device: FieldFilter::from_query(device),
            utm_source: FieldFilter::from_query(utm_source),
            utm_medium: FieldFilter::from_query(utm_medium),
            utm_campaign: FieldFilter::from_query(utm_campaign),
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.date_range.is_none()
            && self.country.is_unconstrained()
            && self.device.is_unconstrained()
            && self.utm_source.is_unconstrained()
            && self.utm_medium.is_unconstrained()
            && self.utm_campaign.is_unconstrained()
    }

    /// Does `record` satisfy every constraint, relative to `now_ms`
    pub fn matches(&self, record: &TrackingRecord, now_ms: i64) -> bool {
        if let Some(range) = self.date_range
            && record.timestamp < range.cutoff(now_ms)
        {
            return false;
        }

        self.country.matches(Some(record.country.as_str()))
            && self.device.matches(Some(record.device_type.as_ref()))
            && self.utm_source.matches(record.utm.source.as_deref())
            && self.utm_medium.matches(record.utm.medium.as_deref())
            && self.utm_campaign.matches(record.utm.campaign.as_deref())
    }
}

/// Records satisfying `criteria`, in their original relative order
pub fn filter_records(
    records: &[TrackingRecord],
    criteria: &FilterCriteria,
    now_ms: i64,
) -> Vec<TrackingRecord> {
    let filtered: Vec<TrackingRecord> = records
        .iter()
        .filter(|r| criteria.matches(r, now_ms))
        .cloned()
        .collect();

    debug!(
        "Filter kept {} of {} records ({:?})",
        filtered.len(),
        records.len(),
        criteria
    );

    filtered
}
