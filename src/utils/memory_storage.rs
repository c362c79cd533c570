//! In-memory ledger source for tests and demos

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::ledger::{sum_postings, PostingSums, ReportPeriod};
use crate::traits::*;
use crate::types::*;

/// In-memory ledger source
///
/// Accounts keep their insertion order, which becomes the display order of
/// the built forest. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    accounts: Arc<RwLock<Vec<Account>>>,
    postings: Arc<RwLock<Vec<Posting>>>,
}

fn poisoned<T>(_: T) -> LedgerError {
    LedgerError::Storage("memory storage lock poisoned".to_string())
}

impl MemoryStorage {
    /// Create an empty memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an account, or replace the one with the same id in place
    pub fn add_account(&self, account: Account) -> LedgerResult<()> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        match accounts.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => *existing = account,
            None => accounts.push(account),
        }
        Ok(())
    }

    pub fn add_accounts(&self, accounts: impl IntoIterator<Item = Account>) -> LedgerResult<()> {
        for account in accounts {
            self.add_account(account)?;
        }
        Ok(())
    }

    /// Record postings, rejecting the whole batch if any amount is negative
    pub fn add_postings(&self, postings: impl IntoIterator<Item = Posting>) -> LedgerResult<()> {
        let postings: Vec<Posting> = postings.into_iter().collect();
        for posting in &postings {
            posting.validate()?;
        }
        self.postings.write().map_err(poisoned)?.extend(postings);
        Ok(())
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> LedgerResult<()> {
        self.accounts.write().map_err(poisoned)?.clear();
        self.postings.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

#[async_trait]
impl LedgerSource for MemoryStorage {
    async fn active_accounts(&self) -> LedgerResult<Vec<Account>> {
        let accounts = self.accounts.read().map_err(poisoned)?;
        Ok(accounts.iter().filter(|a| a.is_active).cloned().collect())
    }

    async fn posting_sums(&self, period: &ReportPeriod) -> LedgerResult<PostingSums> {
        let postings = self.postings.read().map_err(poisoned)?;
        sum_postings(postings.iter(), period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_inactive_accounts_are_not_served() {
        let storage = MemoryStorage::new();
        storage
            .add_accounts(vec![
                Account::new("cash", "Cash", AccountType::Asset, None),
                Account::new("old", "Old Bank", AccountType::Asset, None).deactivated(),
            ])
            .unwrap();

        let accounts = storage.active_accounts().await.unwrap();

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, "cash");
    }

    #[tokio::test]
    async fn test_replacing_an_account_keeps_its_position() {
        let storage = MemoryStorage::new();
        storage
            .add_accounts(vec![
                Account::new("a", "A", AccountType::Asset, None),
                Account::new("b", "B", AccountType::Asset, None),
            ])
            .unwrap();
        storage
            .add_account(Account::new("a", "A renamed", AccountType::Asset, None))
            .unwrap();

        let accounts = storage.active_accounts().await.unwrap();
        assert_eq!(accounts[0].name, "A renamed");
        assert_eq!(accounts.len(), 2);
    }

    #[tokio::test]
    async fn test_posting_sums_for_period() {
        let storage = MemoryStorage::new();
        let day = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        storage
            .add_postings(vec![
                Posting::debit("cash", BigDecimal::from(70), day).unwrap(),
                Posting::debit("cash", BigDecimal::from(30), day).unwrap(),
            ])
            .unwrap();

        let period = ReportPeriod::new(day, day).unwrap();
        let sums = storage.posting_sums(&period).await.unwrap();
        assert_eq!(sums["cash"].debit, BigDecimal::from(100));

        storage.clear().unwrap();
        let sums = storage.posting_sums(&period).await.unwrap();
        assert!(sums.is_empty());
    }
}
