//! 模拟数据生成器
//!
//! Builds the synthetic dataset the dashboard runs on. Every attribute is
//! drawn uniformly from a fixed pool; the random source is a seedable
//! [`StdRng`] so a dataset can be reproduced from its seed.

use std::collections::BTreeMap;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{DAY_MS, DeviceType, FormType, TrackingRecord, UtmParams};

const SOURCES: [&str; 6] = ["google", "facebook", "twitter", "linkedin", "email", "direct"];
const MEDIUMS: [&str; 5] = ["cpc", "social", "email", "organic", "referral"];
const CAMPAIGNS: [&str; 5] = [
    "summer-sale",
    "product-launch",
    "newsletter",
    "retargeting",
    "brand-awareness",
];
const COUNTRIES: [&str; 7] = ["US", "UK", "CA", "DE", "FR", "AU", "JP"];
const DEVICES: [DeviceType; 3] = [DeviceType::Desktop, DeviceType::Mobile, DeviceType::Tablet];
const BROWSERS: [&str; 4] = ["Chrome", "Firefox", "Safari", "Edge"];
const FORM_TYPES: [FormType; 4] = [
    FormType::ContactForm,
    FormType::Newsletter,
    FormType::DemoRequest,
    FormType::Download,
];
const REFERRERS: [&str; 5] = [
    "google.com",
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "direct",
];

const UTM_PROBABILITY: f64 = 0.7;
const TERM_PROBABILITY: f64 = 0.3;
const CONTENT_PROBABILITY: f64 = 0.2;
const REFERRER_PROBABILITY: f64 = 0.8;

/// Default number of generated records
pub const DEFAULT_DATASET_SIZE: usize = 150;
/// Default trailing window (days) generated timestamps fall in
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Synthetic tracking data generator
pub struct DatasetGenerator {
    rng: StdRng,
    seed: u64,
    size: usize,
    window_days: u32,
}

impl DatasetGenerator {
    /// Generator with a freshly drawn seed
    pub fn new(size: usize, window_days: u32) -> Self {
        Self::with_seed(size, window_days, rand::random())
    }

    /// Generator whose output is fully determined by `seed`
    pub fn with_seed(size: usize, window_days: u32, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            size,
            window_days: window_days.max(1),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate relative to the current wall clock
    pub fn generate(&mut self) -> Vec<TrackingRecord> {
        self.generate_at(Utc::now().timestamp_millis())
    }

    /// Generate relative to `now_ms` (epoch milliseconds)
    ///
    /// Every timestamp lands in `(now_ms - window, now_ms]`. The result is
    /// ordered newest first.
    pub fn generate_at(&mut self, now_ms: i64) -> Vec<TrackingRecord> {
        info!(
            "Generating {} tracking records (seed={}, window={}d)",
            self.size, self.seed, self.window_days
        );

        let mut records: Vec<TrackingRecord> = (1..=self.size)
            .map(|n| self.next_record(n, now_ms))
            .collect();

        // 按时间倒序排列（最新在前）
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        debug!(
            "Generated {} records, {} with UTM data",
            records.len(),
            records.iter().filter(|r| r.utm.source.is_some()).count()
        );

        records
    }

    fn next_record(&mut self, n: usize, now_ms: i64) -> TrackingRecord {
        let days_ago = i64::from(self.rng.random_range(0..self.window_days));
        let within_day = self.rng.random_range(0..DAY_MS);
        let timestamp = now_ms - days_ago * DAY_MS - within_day;

        let form_type = FORM_TYPES[self.rng.random_range(0..FORM_TYPES.len())];
        let utm = self.next_utm();
        let referrer = self
            .rng
            .random_bool(REFERRER_PROBABILITY)
            .then(|| self.pick(&REFERRERS).to_string());
        let device_type = DEVICES[self.rng.random_range(0..DEVICES.len())];
        let browser = self.pick(&BROWSERS).to_string();
        let country = self.pick(&COUNTRIES).to_string();

        let mut form_data = BTreeMap::new();
        form_data.insert("name".to_string(), format!("User {}", n));
        form_data.insert("email".to_string(), format!("user{}@example.com", n));
        form_data.insert("message".to_string(), "Sample form submission".to_string());

        TrackingRecord {
            id: format!("entry_{}", n),
            timestamp,
            form_type,
            utm,
            referrer,
            device_type,
            browser,
            country,
            form_data,
        }
    }

    /// The source/medium/campaign triple shares one draw; term and content
    /// only ever appear alongside it.
    fn next_utm(&mut self) -> UtmParams {
        if !self.rng.random_bool(UTM_PROBABILITY) {
            return UtmParams::default();
        }

        let source = self.pick(&SOURCES).to_string();
        let medium = self.pick(&MEDIUMS).to_string();
        let campaign = self.pick(&CAMPAIGNS).to_string();
        let term = self
            .rng
            .random_bool(TERM_PROBABILITY)
            .then(|| format!("term_{}", self.rng.random_range(0..10)));
        let content = self
            .rng
            .random_bool(CONTENT_PROBABILITY)
            .then(|| format!("content_{}", self.rng.random_range(0..5)));

        UtmParams {
            source: Some(source),
            medium: Some(medium),
            campaign: Some(campaign),
            term,
            content,
        }
    }

    fn pick(&mut self, pool: &[&'static str]) -> &'static str {
        pool[self.rng.random_range(0..pool.len())]
    }
}
