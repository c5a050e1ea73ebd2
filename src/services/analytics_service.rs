//! Analytics service layer
//!
//! Provides the aggregate queries behind the dashboard: summary cards,
//! group-by breakdowns, filter option lists, the daily trend, insights,
//! free-text search and pagination. Every method is a pure function of the
//! record slice it is given.
//!
//! # Ordering
//!
//! - "Top value" and breakdown ties resolve to the value seen first in a
//!   left-to-right pass over the input.
//! - Unique values are sorted by byte order.
//! - Trend points are ascending by calendar date in the configured offset.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::{DeviceType, GroupField, RecordField, TrackingRecord};
use crate::config::DisplayConfig;
use crate::errors::TrackerError;
use crate::utils::{TimeParser, percentage, rounded_percentage};

// ============ 公共类型定义 ============

/// 汇总统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total_submissions: usize,
    /// Submissions carrying a UTM source
    pub with_utm: usize,
    pub unique_countries: usize,
    pub top_source: Option<String>,
    pub top_medium: Option<String>,
    pub top_campaign: Option<String>,
}

/// 分类统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub name: String,
    pub count: usize,
    /// Share of the input, `0.0` when the input is empty
    pub percentage: f64,
}

/// 每日趋势数据点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub submissions: usize,
}

/// 关键洞察
///
/// Rates are whole percentages; `None` when there is nothing to divide by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insights {
    pub attribution_rate: Option<u32>,
    pub top_campaign: Option<String>,
    pub mobile_share: Option<u32>,
}

/// One page of a longer listing, pages are 1-based
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

// ============ AnalyticsService ============

/// Analytics 服务
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    offset: FixedOffset,
    trend_days: usize,
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new(Utc.fix(), 14)
    }
}

impl AnalyticsService {
    /// `offset` decides which calendar day a timestamp belongs to
    pub fn new(offset: FixedOffset, trend_days: usize) -> Self {
        Self {
            offset,
            trend_days: trend_days.max(1),
        }
    }

    /// 从展示配置创建
    pub fn from_config(config: &DisplayConfig) -> Result<Self, TrackerError> {
        let offset = TimeParser::parse_utc_offset(&config.utc_offset)
            .map_err(|e| TrackerError::config(format!("display.utc_offset: {}", e)))?;
        Ok(Self::new(offset, config.trend_days))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// 获取汇总统计
    pub fn summary(&self, records: &[TrackingRecord]) -> SummaryStats {
        let unique_countries = records
            .iter()
            .map(|r| r.country.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        let stats = SummaryStats {
            total_submissions: records.len(),
            with_utm: records.iter().filter(|r| r.utm.source.is_some()).count(),
            unique_countries,
            top_source: top_value(records, RecordField::UtmSource),
            top_medium: top_value(records, RecordField::UtmMedium),
            top_campaign: top_value(records, RecordField::UtmCampaign),
        };

        debug!("Analytics: summary {:?}", stats);
        stats
    }

    /// 按属性分组统计，按数量降序
    pub fn breakdown(&self, records: &[TrackingRecord], field: GroupField) -> Vec<CategoryStats> {
        let mut counts = count_first_seen(records.iter().map(|r| field.category(r)));
        // sort_by 是稳定排序，同数量保持首次出现顺序
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total = records.len();
        let stats: Vec<CategoryStats> = counts
            .into_iter()
            .map(|(name, count)| CategoryStats {
                name: name.to_string(),
                count,
                percentage: percentage(count, total),
            })
            .collect();

        debug!(
            "Analytics: breakdown by {} returned {} categories",
            field,
            stats.len()
        );
        stats
    }

    pub fn source_stats(&self, records: &[TrackingRecord]) -> Vec<CategoryStats> {
        self.breakdown(records, GroupField::Source)
    }

    pub fn device_stats(&self, records: &[TrackingRecord]) -> Vec<CategoryStats> {
        self.breakdown(records, GroupField::Device)
    }

    pub fn country_stats(&self, records: &[TrackingRecord]) -> Vec<CategoryStats> {
        self.breakdown(records, GroupField::Country)
    }

    /// Distinct non-empty values of the named attribute, sorted
    ///
    /// An unknown attribute name is a caller bug and is reported as
    /// [`TrackerError::InvalidArgument`] instead of an empty list.
    pub fn unique_values(
        &self,
        records: &[TrackingRecord],
        field: &str,
    ) -> Result<Vec<String>, TrackerError> {
        let field: RecordField = field.parse()?;
        Ok(unique_values_of(records, field))
    }

    /// 每日趋势（最近 N 个有数据的日期）
    pub fn daily_trend(&self, records: &[TrackingRecord]) -> Vec<TrendPoint> {
        let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for record in records {
            let date = record.datetime().with_timezone(&self.offset).date_naive();
            *by_date.entry(date).or_insert(0) += 1;
        }

        let skip = by_date.len().saturating_sub(self.trend_days);
        let trend: Vec<TrendPoint> = by_date
            .into_iter()
            .skip(skip)
            .map(|(date, submissions)| TrendPoint { date, submissions })
            .collect();

        debug!(
            "Analytics: daily_trend returned {} data points (offset {})",
            trend.len(),
            self.offset
        );
        trend
    }

    /// 关键洞察：归因率、最佳活动、移动端占比
    pub fn insights(&self, records: &[TrackingRecord]) -> Insights {
        let total = records.len();
        let with_utm = records.iter().filter(|r| r.utm.source.is_some()).count();
        let mobile = records
            .iter()
            .filter(|r| r.device_type == DeviceType::Mobile)
            .count();

        Insights {
            attribution_rate: rounded_percentage(with_utm, total),
            top_campaign: top_value(records, RecordField::UtmCampaign),
            mobile_share: rounded_percentage(mobile, total),
        }
    }

    /// Case-insensitive substring search over every displayed attribute
    pub fn search<'a>(
        &self,
        records: &'a [TrackingRecord],
        query: &str,
    ) -> Vec<&'a TrackingRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return records.iter().collect();
        }

        info!("Analytics: search for '{}'", needle);

        let hits: Vec<&TrackingRecord> = records
            .iter()
            .filter(|r| record_matches(r, &needle))
            .collect();

        debug!("Analytics: search matched {} of {}", hits.len(), records.len());
        hits
    }
}

/// Slice `items` into a 1-based page; out-of-range pages are clamped
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    let items = if start < total_items {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        page_size,
        total_pages,
        total_items,
    }
}

/// Distinct non-empty values of a typed attribute, sorted
pub fn unique_values_of(records: &[TrackingRecord], field: RecordField) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| field.value(r))
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Most frequent non-empty value; ties go to the first one seen
pub fn top_value(records: &[TrackingRecord], field: RecordField) -> Option<String> {
    let counts = count_first_seen(
        records
            .iter()
            .filter_map(|r| field.value(r))
            .filter(|v| !v.is_empty()),
    );

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}

/// Count occurrences, keeping categories in first-seen order
fn count_first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts
}

fn record_matches(record: &TrackingRecord, needle: &str) -> bool {
    let hit = |v: &str| v.to_lowercase().contains(needle);

    hit(record.id.as_str())
        || record.timestamp.to_string().contains(needle)
        || hit(record.form_type.as_ref())
        || [
            &record.utm.source,
            &record.utm.medium,
            &record.utm.campaign,
            &record.utm.term,
            &record.utm.content,
            &record.referrer,
        ]
        .into_iter()
        .flatten()
        .any(|v| hit(v.as_str()))
        || hit(record.device_type.as_ref())
        || hit(record.browser.as_str())
        || hit(record.country.as_str())
        || record.form_data.values().any(|v| hit(v.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{FormType, UtmParams};
    use std::collections::BTreeMap as Map;

    fn rec(id: &str, source: Option<&str>, country: &str, device: DeviceType) -> TrackingRecord {
        TrackingRecord {
            id: id.to_string(),
            timestamp: 1_717_243_200_000,
            form_type: FormType::Newsletter,
            utm: UtmParams {
                source: source.map(String::from),
                medium: None,
                campaign: None,
                term: None,
                content: None,
            },
            referrer: None,
            device_type: device,
            browser: "Chrome".to_string(),
            country: country.to_string(),
            form_data: Map::new(),
        }
    }

    #[test]
    fn test_count_first_seen() {
        let counts = count_first_seen(["b", "a", "b", "c", "a"].into_iter());
        assert_eq!(counts, vec![("b", 2), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_top_value_tie_goes_to_first_seen() {
        let records = vec![
            rec("1", Some("twitter"), "US", DeviceType::Desktop),
            rec("2", Some("google"), "US", DeviceType::Desktop),
            rec("3", Some("google"), "US", DeviceType::Desktop),
            rec("4", Some("twitter"), "US", DeviceType::Desktop),
        ];
        assert_eq!(
            top_value(&records, RecordField::UtmSource),
            Some("twitter".to_string())
        );
    }

    #[test]
    fn test_top_value_empty() {
        assert_eq!(top_value(&[], RecordField::UtmSource), None);
        let records = vec![rec("1", None, "US", DeviceType::Desktop)];
        assert_eq!(top_value(&records, RecordField::UtmSource), None);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=25).collect();
        let page = paginate(&items, 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_pages, 3);

        let clamped = paginate(&items, 99, 10);
        assert_eq!(clamped.page, 3);

        let empty: Page<u32> = paginate(&[], 1, 10);
        assert!(empty.items.is_empty());
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_insights_on_empty_input() {
        let insights = AnalyticsService::default().insights(&[]);
        assert_eq!(insights.attribution_rate, None);
        assert_eq!(insights.mobile_share, None);
        assert_eq!(insights.top_campaign, None);
    }

    #[test]
    fn test_breakdown_percentages() {
        let records = vec![
            rec("1", Some("google"), "US", DeviceType::Mobile),
            rec("2", None, "US", DeviceType::Desktop),
            rec("3", None, "UK", DeviceType::Mobile),
            rec("4", None, "UK", DeviceType::Mobile),
        ];
        let devices = AnalyticsService::default().device_stats(&records);
        assert_eq!(devices[0].name, "Mobile");
        assert_eq!(devices[0].count, 3);
        assert_eq!(devices[0].percentage, 75.0);
    }

    #[test]
    fn test_search_matches_form_data_case_insensitive() {
        let mut r = rec("entry_9", Some("google"), "US", DeviceType::Desktop);
        r.form_data
            .insert("email".to_string(), "Someone@Example.com".to_string());
        let records = vec![r, rec("entry_10", None, "JP", DeviceType::Tablet)];
        let service = AnalyticsService::default();

        let hits = service.search(&records, "someone@");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "entry_9");

        assert_eq!(service.search(&records, "tablet").len(), 1);
        assert_eq!(service.search(&records, "  ").len(), 2);
    }
}
