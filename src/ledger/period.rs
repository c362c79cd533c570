//! Report period resolution and financial year handling

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::*;

/// First day of the financial year, as a month and day
///
/// Defaults to April 1, so a financial year runs April 1 to March 31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinancialYearStart {
    pub month: u32,
    pub day: u32,
}

impl Default for FinancialYearStart {
    fn default() -> Self {
        Self { month: 4, day: 1 }
    }
}

impl FinancialYearStart {
    pub fn new(month: u32, day: u32) -> LedgerResult<Self> {
        let start = Self { month, day };
        start.validate()?;
        Ok(start)
    }

    /// Reject month/day pairs that do not exist in every year
    pub fn validate(&self) -> LedgerResult<()> {
        // 2023 is not a leap year, so February 29 is rejected here
        if NaiveDate::from_ymd_opt(2023, self.month, self.day).is_none() {
            return Err(LedgerError::Config(format!(
                "Financial year cannot start on month {} day {}",
                self.month, self.day
            )));
        }
        Ok(())
    }

    fn start_in(&self, year: i32) -> LedgerResult<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).ok_or_else(|| {
            LedgerError::Config(format!(
                "Financial year cannot start on {}-{:02}-{:02}",
                year, self.month, self.day
            ))
        })
    }

    /// The financial year that `date` falls in
    pub fn year_containing(&self, date: NaiveDate) -> LedgerResult<ReportPeriod> {
        let this_year = self.start_in(date.year())?;
        let from = if date >= this_year {
            this_year
        } else {
            self.start_in(date.year() - 1)?
        };
        let next = self.start_in(from.year() + 1)?;
        let to = next.pred_opt().ok_or_else(|| {
            LedgerError::Validation(format!("No day before {}", next))
        })?;
        ReportPeriod::new(from, to)
    }

    /// Label such as `FY 2024-25` for the year starting in `start_year`
    pub fn label(&self, start_year: i32) -> String {
        if self.month == 1 && self.day == 1 {
            format!("FY {}", start_year)
        } else {
            format!("FY {}-{:02}", start_year, (start_year + 1).rem_euclid(100))
        }
    }
}

/// Inclusive date range that postings are summed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportPeriod {
    /// Create a period, rejecting `from` after `to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> LedgerResult<Self> {
        if from > to {
            return Err(LedgerError::Validation(format!(
                "Report period starts on {} after it ends on {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Resolve report parameters into a period.
    ///
    /// - `from` and `to`: used as given
    /// - only `to` (an "as of" date): from the start of its financial year
    /// - only `from`: up to `today`
    /// - neither: the current financial year to date
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
        financial_year: &FinancialYearStart,
    ) -> LedgerResult<Self> {
        match (from, to) {
            (Some(from), Some(to)) => Self::new(from, to),
            (None, Some(to)) => Self::new(financial_year.year_containing(to)?.from, to),
            (Some(from), None) => Self::new(from, today),
            (None, None) => Self::new(financial_year.year_containing(today)?.from, today),
        }
    }

    /// Whether `date` falls inside the period, both ends included
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Number of days covered
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_financial_year_boundaries() {
        let fy = FinancialYearStart::default();

        let march = fy.year_containing(date(2025, 3, 31)).unwrap();
        assert_eq!(march.from, date(2024, 4, 1));
        assert_eq!(march.to, date(2025, 3, 31));

        let april = fy.year_containing(date(2025, 4, 1)).unwrap();
        assert_eq!(april.from, date(2025, 4, 1));
        assert_eq!(april.to, date(2026, 3, 31));
    }

    #[test]
    fn test_calendar_financial_year() {
        let fy = FinancialYearStart::new(1, 1).unwrap();
        let period = fy.year_containing(date(2024, 2, 29)).unwrap();

        assert_eq!(period.from, date(2024, 1, 1));
        assert_eq!(period.to, date(2024, 12, 31));
        assert_eq!(period.days(), 366);
        assert_eq!(fy.label(2024), "FY 2024");
    }

    #[test]
    fn test_invalid_financial_year_start() {
        assert!(matches!(
            FinancialYearStart::new(2, 29),
            Err(LedgerError::Config(_))
        ));
        assert!(FinancialYearStart::new(13, 1).is_err());
    }

    #[test]
    fn test_label() {
        let fy = FinancialYearStart::default();
        assert_eq!(fy.label(2024), "FY 2024-25");
        assert_eq!(fy.label(1999), "FY 1999-00");
    }

    #[test]
    fn test_resolve_parameters() {
        let fy = FinancialYearStart::default();
        let today = date(2024, 10, 15);

        let explicit =
            ReportPeriod::resolve(Some(date(2024, 5, 1)), Some(date(2024, 5, 31)), today, &fy)
                .unwrap();
        assert_eq!(explicit, ReportPeriod::new(date(2024, 5, 1), date(2024, 5, 31)).unwrap());

        let as_of = ReportPeriod::resolve(None, Some(date(2024, 2, 10)), today, &fy).unwrap();
        assert_eq!(as_of.from, date(2023, 4, 1));
        assert_eq!(as_of.to, date(2024, 2, 10));

        let open_ended = ReportPeriod::resolve(Some(date(2024, 9, 1)), None, today, &fy).unwrap();
        assert_eq!(open_ended.to, today);

        let default = ReportPeriod::resolve(None, None, today, &fy).unwrap();
        assert_eq!(default.from, date(2024, 4, 1));
        assert_eq!(default.to, today);
    }

    #[test]
    fn test_inverted_period_is_rejected() {
        let result = ReportPeriod::new(date(2024, 5, 2), date(2024, 5, 1));
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let period = ReportPeriod::new(date(2024, 4, 1), date(2024, 4, 30)).unwrap();
        assert!(period.contains(date(2024, 4, 1)));
        assert!(period.contains(date(2024, 4, 30)));
        assert!(!period.contains(date(2024, 5, 1)));
        assert!(!period.contains(date(2024, 3, 31)));
    }
}
