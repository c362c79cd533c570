//! Report configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ledger::FinancialYearStart;
use crate::types::*;

/// Default number of cached forests
const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Default time-to-live for cached forests (5 minutes)
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Settings for report generation
///
/// Every field has a default, so a partial document deserializes:
///
/// ```rust
/// use trial_balance_core::ReportConfig;
///
/// let config: ReportConfig = serde_json::from_str(r#"{"hide_zero_balances": true}"#).unwrap();
/// assert_eq!(config.financial_year_start.month, 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub financial_year_start: FinancialYearStart,
    pub cache: CacheConfig,
    /// Leave accounts whose whole subtree has a zero balance out of reports
    pub hide_zero_balances: bool,
}

impl ReportConfig {
    pub fn validate(&self) -> LedgerResult<()> {
        self.financial_year_start.validate()?;
        self.cache.validate()
    }
}

/// Forest cache sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_capacity: u64,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_CACHE_CAPACITY,
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.ttl_secs == 0 {
            return Err(LedgerError::Config(
                "Cache TTL must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.financial_year_start, FinancialYearStart { month: 4, day: 1 });
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
        assert!(!config.hide_zero_balances);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document() {
        let config: ReportConfig = serde_json::from_str(
            r#"{"financial_year_start": {"month": 1, "day": 1}, "cache": {"ttl_secs": 30}}"#,
        )
        .unwrap();

        assert_eq!(config.financial_year_start.month, 1);
        assert_eq!(config.cache.ttl_secs, 30);
        assert_eq!(config.cache.max_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = ReportConfig::default();
        config.financial_year_start = FinancialYearStart { month: 4, day: 31 };
        assert!(matches!(config.validate(), Err(LedgerError::Config(_))));

        let mut config = ReportConfig::default();
        config.cache.ttl_secs = 0;
        assert!(matches!(config.validate(), Err(LedgerError::Config(_))));
    }
}
