//! Traits for the upstream data provider and account validation

use async_trait::async_trait;

use crate::ledger::{PostingSums, ReportPeriod};
use crate::types::*;

/// Upstream provider of accounts and posting sums
///
/// This trait lets the aggregation core work with any storage backend
/// (PostgreSQL, MySQL, SQLite, in-memory, etc.). Reads may be stale; a
/// report is a point-in-time snapshot.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// All active accounts, in the order they should be displayed
    async fn active_accounts(&self) -> LedgerResult<Vec<Account>>;

    /// Debit and credit sums per account over postings dated inside
    /// `period`, both ends included. Accounts without activity may be
    /// left out.
    async fn posting_sums(&self, period: &ReportPeriod) -> LedgerResult<PostingSums>;
}

/// Trait for custom account checks run before aggregation
pub trait AccountValidator: Send + Sync {
    /// Validate an account fetched from the source
    fn validate_account(&self, account: &Account) -> LedgerResult<()>;
}

/// Default account validator; only the id is required
pub struct DefaultAccountValidator;

impl AccountValidator for DefaultAccountValidator {
    fn validate_account(&self, account: &Account) -> LedgerResult<()> {
        if account.id.trim().is_empty() {
            return Err(LedgerError::InvalidInput(format!(
                "Account '{}' has no id",
                account.name
            )));
        }
        Ok(())
    }
}
