//! Submission capture
//!
//! Turns what a browser hands over at form-submission time (landing URL,
//! `Referer`, `User-Agent`) into a [`TrackingRecord`], keeping only the
//! privacy-safe parts: the five UTM parameters, the referrer hostname and a
//! coarse device/browser classification.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;
use woothee::parser::Parser;

use crate::analytics::{DeviceType, FormType, TrackingRecord, UtmParams};
use crate::errors::TrackerError;

/// 支持的 UTM 参数
pub const UTM_KEYS: [&str; 5] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
];

/// 设备与浏览器信息（不做指纹识别）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub device_type: DeviceType,
    pub browser: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            device_type: DeviceType::Desktop,
            browser: "Unknown".to_string(),
        }
    }
}

/// Raw inputs of one form submission
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Page URL (or bare query string) the visitor landed on
    pub landing_url: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub form_type: FormType,
    /// Resolved server-side, ISO 3166-1 alpha-2
    pub country: String,
    pub form_data: BTreeMap<String, String>,
}

/// Read the UTM parameters from a URL or a raw query string
///
/// Values are percent-decoded; empty values are treated as absent.
pub fn extract_utm(input: &str) -> UtmParams {
    let query: Cow<'_, str> = match Url::parse(input) {
        Ok(url) => Cow::Owned(url.query().unwrap_or_default().to_string()),
        Err(_) => Cow::Borrowed(input.split_once('?').map_or(input, |(_, q)| q)),
    };

    let param = |key: &str| extract_query_param(&query, key).filter(|v| !v.is_empty());

    UtmParams {
        source: param(UTM_KEYS[0]),
        medium: param(UTM_KEYS[1]),
        campaign: param(UTM_KEYS[2]),
        term: param(UTM_KEYS[3]),
        content: param(UTM_KEYS[4]),
    }
}

/// 从 query string 提取指定参数值
fn extract_query_param(query: &str, key: &str) -> Option<String> {
    for part in query.split(['&', ';']) {
        if let Some(value) = part.strip_prefix(key).and_then(|s| s.strip_prefix('=')) {
            let value = value.replace('+', " ");
            return urlencoding::decode(&value).ok().map(Cow::into_owned);
        }
    }
    None
}

/// Keep only the hostname of a referrer URL
///
/// Path, query and fragment are dropped so nothing user-specific is stored.
/// Unparseable or host-less referrers yield `None`.
pub fn sanitize_referrer(referrer: &str) -> Option<String> {
    let referrer = referrer.trim();
    if referrer.is_empty() {
        return None;
    }

    match Url::parse(referrer) {
        Ok(url) => url.host_str().map(|h| h.to_ascii_lowercase()),
        Err(e) => {
            debug!("Invalid referrer URL '{}': {}", referrer, e);
            None
        }
    }
}

/// Classify a User-Agent into device type and browser name
///
/// Tablets (iPad, or an explicit `Tablet` token) win over the phone
/// classification woothee gives them.
pub fn detect_client(user_agent: &str) -> ClientInfo {
    let parser = Parser::new();
    let Some(result) = parser.parse(user_agent) else {
        return ClientInfo::default();
    };

    let device_type = if result.os == "iPad" || user_agent.contains("Tablet") {
        DeviceType::Tablet
    } else if matches!(result.category, "smartphone" | "mobilephone") {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    };

    let browser = if result.name.is_empty() || result.name == "UNKNOWN" {
        "Unknown".to_string()
    } else {
        result.name.to_string()
    };

    ClientInfo {
        device_type,
        browser,
    }
}

/// Build a record stamped with the current time
pub fn capture(request: CaptureRequest) -> Result<TrackingRecord, TrackerError> {
    capture_at(request, Utc::now().timestamp_millis())
}

/// Build a record stamped with `now_ms`
pub fn capture_at(request: CaptureRequest, now_ms: i64) -> Result<TrackingRecord, TrackerError> {
    let country = request.country.trim().to_ascii_uppercase();
    if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(TrackerError::validation(format!(
            "Country must be a two-letter code, got '{}'",
            request.country
        )));
    }

    let utm = extract_utm(&request.landing_url);
    let referrer = request.referrer.as_deref().and_then(sanitize_referrer);
    let client = request
        .user_agent
        .as_deref()
        .map(detect_client)
        .unwrap_or_default();

    let record = TrackingRecord {
        id: format!("sub_{}", Uuid::new_v4().simple()),
        timestamp: now_ms,
        form_type: request.form_type,
        utm,
        referrer,
        device_type: client.device_type,
        browser: client.browser,
        country,
        form_data: request.form_data,
    };

    info!(
        "Captured submission {} (source={:?}, referrer={:?}, device={})",
        record.id, record.utm.source, record.referrer, record.device_type
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const IPAD_UA: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
    const CHROME_WIN_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    #[test]
    fn test_extract_utm_from_url() {
        let utm = extract_utm(
            "https://example.com/landing?utm_source=google&utm_medium=cpc&utm_campaign=summer%20sale&ref=x",
        );
        assert_eq!(utm.source.as_deref(), Some("google"));
        assert_eq!(utm.medium.as_deref(), Some("cpc"));
        assert_eq!(utm.campaign.as_deref(), Some("summer sale"));
        assert_eq!(utm.term, None);
        assert_eq!(utm.content, None);
    }

    #[test]
    fn test_extract_utm_from_raw_query() {
        let utm = extract_utm("?utm_term=running+shoes&utm_content=banner_1&utm_source=");
        assert_eq!(utm.term.as_deref(), Some("running shoes"));
        assert_eq!(utm.content.as_deref(), Some("banner_1"));
        assert_eq!(utm.source, None);
    }

    #[test]
    fn test_extract_utm_without_query() {
        assert!(extract_utm("https://example.com/").is_empty());
        assert!(extract_utm("").is_empty());
    }

    #[test]
    fn test_sanitize_referrer() {
        assert_eq!(
            sanitize_referrer("https://www.Google.com/search?q=secret#frag").as_deref(),
            Some("www.google.com")
        );
        assert_eq!(sanitize_referrer("not a url"), None);
        assert_eq!(sanitize_referrer(""), None);
    }

    #[test]
    fn test_detect_client() {
        let phone = detect_client(IPHONE_UA);
        assert_eq!(phone.device_type, DeviceType::Mobile);
        assert_eq!(phone.browser, "Safari");

        assert_eq!(detect_client(IPAD_UA).device_type, DeviceType::Tablet);

        let desktop = detect_client(CHROME_WIN_UA);
        assert_eq!(desktop.device_type, DeviceType::Desktop);
        assert_eq!(desktop.browser, "Chrome");
    }

    #[test]
    fn test_capture_builds_record() {
        let request = CaptureRequest {
            landing_url: "https://example.com/?utm_source=linkedin&utm_medium=social&utm_campaign=newsletter".to_string(),
            referrer: Some("https://linkedin.com/feed/update/123".to_string()),
            user_agent: Some(CHROME_WIN_UA.to_string()),
            form_type: FormType::Newsletter,
            country: "de".to_string(),
            form_data: BTreeMap::new(),
        };
        let record = capture_at(request, 1_717_243_200_000).unwrap();
        assert!(record.id.starts_with("sub_"));
        assert_eq!(record.timestamp, 1_717_243_200_000);
        assert_eq!(record.utm.source.as_deref(), Some("linkedin"));
        assert_eq!(record.referrer.as_deref(), Some("linkedin.com"));
        assert_eq!(record.country, "DE");
        assert_eq!(record.device_type, DeviceType::Desktop);
    }

    #[test]
    fn test_capture_rejects_bad_country() {
        let request = CaptureRequest {
            landing_url: String::new(),
            referrer: None,
            user_agent: None,
            form_type: FormType::Download,
            country: "Germany".to_string(),
            form_data: BTreeMap::new(),
        };
        assert!(matches!(
            capture(request).unwrap_err(),
            TrackerError::Validation(_)
        ));
    }
}
