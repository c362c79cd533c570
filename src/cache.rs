//! Time-boxed caching of built forests using Moka.
//!
//! Reports for the same period are often requested several times in a row.
//! The cache is an explicit object handed to the service; nothing is cached
//! unless one is injected.

use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::ledger::{Forest, ReportPeriod};

/// Cache of built forests keyed by report period
///
/// Cloning shares the underlying storage. The key carries no source
/// identity, so one cache belongs to one `LedgerSource`; invalidate it when
/// that source receives new postings.
#[derive(Clone)]
pub struct ForestCache {
    cache: Cache<ReportPeriod, Arc<Forest>>,
}

impl ForestCache {
    /// Create a cache holding at most `max_capacity` forests for `ttl` each
    pub fn with_config(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_config(config.max_capacity, config.ttl())
    }

    pub fn get(&self, period: &ReportPeriod) -> Option<Arc<Forest>> {
        self.cache.get(period)
    }

    pub fn insert(&self, period: ReportPeriod, forest: Arc<Forest>) {
        self.cache.insert(period, forest);
    }

    /// Drop every cached forest, e.g. after new vouchers were posted
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of cached forests
    ///
    /// Moka updates this lazily; call `run_pending_tasks` first for an exact
    /// figure.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl std::fmt::Debug for ForestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForestCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
