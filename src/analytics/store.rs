//! Immutable tracking data store
//!
//! Built once at startup and handed to whoever needs the data. Cloning is
//! cheap: the records sit behind an `Arc`.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::filter::{FilterCriteria, filter_records};
use super::{DatasetGenerator, TrackingRecord};
use crate::config::DatasetConfig;

#[derive(Debug, Clone)]
pub struct TrackingStore {
    records: Arc<[TrackingRecord]>,
    generated_at: i64,
    seed: Option<u64>,
}

impl TrackingStore {
    /// Wrap an existing set of records
    ///
    /// Records are kept in the given order; callers supplying their own data
    /// are responsible for the newest-first convention.
    pub fn from_records(records: Vec<TrackingRecord>, generated_at: i64) -> Self {
        Self {
            records: records.into(),
            generated_at,
            seed: None,
        }
    }

    /// Generate a store using the dataset settings
    pub fn generate(config: &DatasetConfig) -> Self {
        Self::generate_at(config, Utc::now().timestamp_millis())
    }

    /// Generate a store relative to a fixed instant
    pub fn generate_at(config: &DatasetConfig, now_ms: i64) -> Self {
        let mut generator = match config.seed {
            Some(seed) => DatasetGenerator::with_seed(config.size, config.window_days, seed),
            None => DatasetGenerator::new(config.size, config.window_days),
        };
        let records = generator.generate_at(now_ms);

        info!(
            "Tracking store ready: {} records (seed={})",
            records.len(),
            generator.seed()
        );

        Self {
            records: records.into(),
            generated_at: now_ms,
            seed: Some(generator.seed()),
        }
    }

    pub fn records(&self) -> &[TrackingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Epoch milliseconds the dataset was generated relative to
    pub fn generated_at(&self) -> i64 {
        self.generated_at
    }

    /// Seed that reproduces this dataset, if it was generated
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn filter_at(&self, criteria: &FilterCriteria, now_ms: i64) -> Vec<TrackingRecord> {
        filter_records(&self.records, criteria, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_with_seed_is_reproducible() {
        let config = DatasetConfig {
            size: 40,
            seed: Some(99),
            window_days: 30,
        };
        let a = TrackingStore::generate_at(&config, 1_717_243_200_000);
        let b = TrackingStore::generate_at(&config, 1_717_243_200_000);
        assert_eq!(a.records(), b.records());
        assert_eq!(a.seed(), Some(99));
        assert_eq!(a.len(), 40);
    }

    #[test]
    fn test_clone_shares_records() {
        let config = DatasetConfig {
            size: 10,
            seed: Some(1),
            window_days: 30,
        };
        let store = TrackingStore::generate(&config);
        let copy = store.clone();
        assert!(std::ptr::eq(store.records(), copy.records()));
    }

    #[test]
    fn test_unconstrained_filter_is_identity() {
        let config = DatasetConfig {
            size: 25,
            seed: Some(3),
            window_days: 30,
        };
        let store = TrackingStore::generate_at(&config, 1_717_243_200_000);
        let out = store.filter_at(&FilterCriteria::unconstrained(), 1_717_243_200_000);
        assert_eq!(out.as_slice(), store.records());
    }
}
