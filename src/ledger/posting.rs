//! Posting summation and voucher construction

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::ledger::{PostingSums, ReportPeriod};
use crate::types::*;

/// Sum postings per account over `period`, both ends included.
///
/// Debit and credit are accumulated independently and never rounded.
pub fn sum_postings<'a, I>(postings: I, period: &ReportPeriod) -> LedgerResult<PostingSums>
where
    I: IntoIterator<Item = &'a Posting>,
{
    let mut sums = PostingSums::new();
    for posting in postings {
        posting.validate()?;
        if !period.contains(posting.date) {
            continue;
        }
        let sum = sums.entry(posting.account_id.clone()).or_default();
        sum.debit += &posting.debit;
        sum.credit += &posting.credit;
    }
    Ok(sums)
}

/// Builder for the postings of one voucher
///
/// All postings share the voucher date. `build` checks that debits and
/// credits agree.
pub struct VoucherBuilder {
    date: NaiveDate,
    narration: String,
    postings: Vec<Posting>,
    error: Option<LedgerError>,
}

impl VoucherBuilder {
    pub fn new(date: NaiveDate, narration: impl Into<String>) -> Self {
        Self {
            date,
            narration: narration.into(),
            postings: Vec::new(),
            error: None,
        }
    }

    /// Add a debit leg
    pub fn debit(self, account_id: impl Into<String>, amount: BigDecimal) -> Self {
        let posting = Posting::debit(account_id, amount, self.date);
        self.push(posting)
    }

    /// Add a credit leg
    pub fn credit(self, account_id: impl Into<String>, amount: BigDecimal) -> Self {
        let posting = Posting::credit(account_id, amount, self.date);
        self.push(posting)
    }

    fn push(mut self, posting: LedgerResult<Posting>) -> Self {
        match posting {
            Ok(posting) => self.postings.push(posting),
            Err(e) if self.error.is_none() => self.error = Some(e),
            Err(_) => {}
        }
        self
    }

    /// Finish the voucher
    pub fn build(self) -> LedgerResult<Vec<Posting>> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.postings.len() < 2 {
            return Err(LedgerError::Validation(format!(
                "Voucher '{}' needs at least two postings",
                self.narration
            )));
        }

        let debits: BigDecimal = self.postings.iter().map(|p| &p.debit).sum();
        let credits: BigDecimal = self.postings.iter().map(|p| &p.credit).sum();
        if debits != credits {
            return Err(LedgerError::Validation(format!(
                "Voucher '{}' is not balanced: debits = {}, credits = {}",
                self.narration, debits, credits
            )));
        }

        Ok(self.postings)
    }
}
