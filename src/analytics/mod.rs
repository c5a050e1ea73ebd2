//! Tracking data model
//!
//! A [`TrackingRecord`] is one attributed form submission: when it happened,
//! which form, the UTM parameters and sanitized referrer that brought the
//! visitor, and the coarse client information (device, browser, country).
//!
//! Records are produced by the [`generator`], held immutably by the
//! [`store`] and narrowed with [`filter`].

pub mod filter;
pub mod generator;
pub mod store;

pub use filter::{DateRange, FieldFilter, FilterCriteria, filter_records};
pub use generator::DatasetGenerator;
pub use store::TrackingStore;

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::errors::TrackerError;

/// One day in milliseconds
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// 表单类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
pub enum FormType {
    #[serde(rename = "Contact Form")]
    #[strum(serialize = "Contact Form")]
    ContactForm,
    Newsletter,
    #[serde(rename = "Demo Request")]
    #[strum(serialize = "Demo Request")]
    DemoRequest,
    Download,
}

/// 设备类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
pub enum DeviceType {
    #[default]
    Desktop,
    Mobile,
    Tablet,
}

/// UTM attribution parameters
///
/// Each field is independently optional. `None` means the visit was not
/// attributed on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UtmParams {
    /// True when no UTM parameter is present at all
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.medium.is_none()
            && self.campaign.is_none()
            && self.term.is_none()
            && self.content.is_none()
    }
}

/// 一次表单提交的追踪记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub form_type: FormType,
    #[serde(default)]
    pub utm: UtmParams,
    /// Sanitized referrer hostname, `None` for direct traffic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    pub device_type: DeviceType,
    pub browser: String,
    /// ISO 3166-1 alpha-2
    pub country: String,
    /// User-supplied form values, carried along but never aggregated
    #[serde(default)]
    pub form_data: BTreeMap<String, String>,
}

impl TrackingRecord {
    /// Submission time as a UTC datetime
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

/// Record attributes addressable by name
///
/// Used by unique-value extraction and the filter option lists. Accepts both
/// the snake_case wire names and the short names used on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RecordField {
    Country,
    DeviceType,
    Browser,
    FormType,
    UtmSource,
    UtmMedium,
    UtmCampaign,
    UtmTerm,
    UtmContent,
    Referrer,
}

impl RecordField {
    /// Borrow this attribute's value from a record
    pub fn value<'a>(&self, record: &'a TrackingRecord) -> Option<&'a str> {
        match self {
            Self::Country => Some(record.country.as_str()),
            Self::DeviceType => Some(record.device_type.as_ref()),
            Self::Browser => Some(record.browser.as_str()),
            Self::FormType => Some(record.form_type.as_ref()),
            Self::UtmSource => record.utm.source.as_deref(),
            Self::UtmMedium => record.utm.medium.as_deref(),
            Self::UtmCampaign => record.utm.campaign.as_deref(),
            Self::UtmTerm => record.utm.term.as_deref(),
            Self::UtmContent => record.utm.content.as_deref(),
            Self::Referrer => record.referrer.as_deref(),
        }
    }
}

impl FromStr for RecordField {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "country" => Ok(Self::Country),
            "device" | "device_type" => Ok(Self::DeviceType),
            "browser" => Ok(Self::Browser),
            "form_type" | "formType" => Ok(Self::FormType),
            "source" | "utm_source" => Ok(Self::UtmSource),
            "medium" | "utm_medium" => Ok(Self::UtmMedium),
            "campaign" | "utm_campaign" => Ok(Self::UtmCampaign),
            "term" | "utm_term" => Ok(Self::UtmTerm),
            "content" | "utm_content" => Ok(Self::UtmContent),
            "referrer" => Ok(Self::Referrer),
            _ => Err(TrackerError::invalid_argument(format!(
                "Unknown record field: '{}'. Valid: country, device_type, browser, form_type, \
                 utm_source, utm_medium, utm_campaign, utm_term, utm_content, referrer",
                s
            ))),
        }
    }
}

/// Attributes a breakdown can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum GroupField {
    Source,
    Device,
    Country,
}

impl GroupField {
    /// Category a record falls into; an unattributed record is `Direct`
    pub fn category<'a>(&self, record: &'a TrackingRecord) -> &'a str {
        match self {
            Self::Source => record.utm.source.as_deref().unwrap_or(DIRECT_SOURCE),
            Self::Device => record.device_type.as_ref(),
            Self::Country => record.country.as_str(),
        }
    }
}

impl FromStr for GroupField {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" | "utm_source" => Ok(Self::Source),
            "device" | "device_type" => Ok(Self::Device),
            "country" => Ok(Self::Country),
            _ => Err(TrackerError::invalid_argument(format!(
                "Unknown breakdown attribute: '{}'. Valid: source, device, country",
                s
            ))),
        }
    }
}

/// Category label for submissions without a UTM source
pub const DIRECT_SOURCE: &str = "Direct";
