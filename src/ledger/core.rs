//! Report service that coordinates the source, the aggregator and the cache

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::cache::ForestCache;
use crate::config::ReportConfig;
use crate::ledger::{Forest, LedgerAggregator, ReportPeriod};
use crate::reports::{BalanceSheet, ProfitAndLoss, TrialBalance};
use crate::traits::*;
use crate::types::*;

/// Produces forests and report views for a period
pub struct TrialBalanceService<S: LedgerSource> {
    source: S,
    config: ReportConfig,
    aggregator: LedgerAggregator,
    validator: Box<dyn AccountValidator>,
    cache: Option<ForestCache>,
}

impl<S: LedgerSource> TrialBalanceService<S> {
    /// Create a service without caching
    pub fn new(source: S, config: ReportConfig) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            aggregator: LedgerAggregator::new(),
            validator: Box::new(DefaultAccountValidator),
            cache: None,
        })
    }

    /// Create a service that reuses forests from `cache`
    ///
    /// Entries are keyed by period only, so a cache (and its clones) must
    /// serve a single source. Sharing one between services over different
    /// sources hands each the other's forests.
    pub fn with_cache(source: S, config: ReportConfig, cache: ForestCache) -> LedgerResult<Self> {
        let mut service = Self::new(source, config)?;
        service.cache = Some(cache);
        Ok(service)
    }

    /// Replace the account validator
    pub fn with_validator(mut self, validator: Box<dyn AccountValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve report parameters using the configured financial year
    pub fn resolve_period(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> LedgerResult<ReportPeriod> {
        ReportPeriod::resolve(from, to, today, &self.config.financial_year_start)
    }

    /// Build, or fetch from the cache, the forest for `period`
    ///
    /// Balances cover postings dated within `period` only.
    #[instrument(skip_all, fields(period = %period))]
    pub async fn forest(&self, period: &ReportPeriod) -> LedgerResult<Arc<Forest>> {
        if let Some(forest) = self.cache.as_ref().and_then(|cache| cache.get(period)) {
            debug!("forest served from cache");
            return Ok(forest);
        }

        let accounts = self.source.active_accounts().await?;
        for account in &accounts {
            self.validator.validate_account(account)?;
        }
        let sums = self.source.posting_sums(period).await?;

        let forest = Arc::new(self.aggregator.build(&accounts, &sums)?);
        info!(
            accounts = accounts.len(),
            warnings = forest.warnings.len(),
            "aggregated trial balance"
        );

        if let Some(cache) = &self.cache {
            cache.insert(*period, forest.clone());
        }
        Ok(forest)
    }

    pub async fn trial_balance(&self, period: &ReportPeriod) -> LedgerResult<TrialBalance> {
        let forest = self.forest(period).await?;
        let report = TrialBalance::from_forest(*period, &forest);
        Ok(if self.config.hide_zero_balances {
            report.without_zero_balances()
        } else {
            report
        })
    }

    pub async fn balance_sheet(&self, period: &ReportPeriod) -> LedgerResult<BalanceSheet> {
        let forest = self.forest(period).await?;
        let report = BalanceSheet::from_forest(*period, &forest);
        Ok(if self.config.hide_zero_balances {
            report.without_zero_balances()
        } else {
            report
        })
    }

    pub async fn profit_and_loss(&self, period: &ReportPeriod) -> LedgerResult<ProfitAndLoss> {
        let forest = self.forest(period).await?;
        let report = ProfitAndLoss::from_forest(*period, &forest);
        Ok(if self.config.hide_zero_balances {
            report.without_zero_balances()
        } else {
            report
        })
    }
}
