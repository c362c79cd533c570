//! Report views over a built forest
//!
//! These are read-only consumers of [`Forest`]: they choose the sign
//! convention for each account classification and lay the nodes out in the
//! columns of a Trial Balance, Balance Sheet or Profit & Loss statement.
//! Rendering is left to the caller.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{Forest, ReportPeriod};
use crate::types::*;

/// One account line of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub account_id: String,
    pub name: String,
    pub account_type: AccountType,
    /// Nesting level, 0 for roots
    pub depth: usize,
    pub is_group: bool,
    pub debit_total: BigDecimal,
    pub credit_total: BigDecimal,
    /// Balance positive on the account's normal side
    pub balance: BigDecimal,
}

impl ReportLine {
    fn from_node(node: &AccountNode, depth: usize) -> Self {
        Self {
            account_id: node.id.clone(),
            name: node.name.clone(),
            account_type: node.account_type,
            depth,
            is_group: node.is_group,
            debit_total: node.debit_total.clone(),
            credit_total: node.credit_total.clone(),
            balance: node.balance(),
        }
    }

    /// Closing balance in the debit column, if it sits there
    pub fn debit_balance(&self) -> Option<BigDecimal> {
        let net = &self.debit_total - &self.credit_total;
        (net > BigDecimal::from(0)).then_some(net)
    }

    /// Closing balance in the credit column, if it sits there
    pub fn credit_balance(&self) -> Option<BigDecimal> {
        let net = &self.credit_total - &self.debit_total;
        (net > BigDecimal::from(0)).then_some(net)
    }
}

/// Lines for `root` and its subtree in pre-order
fn collect_lines(root: &AccountNode, out: &mut Vec<ReportLine>) {
    out.extend(root.walk().map(|(depth, node)| ReportLine::from_node(node, depth)));
}

/// Drop lines whose balance is zero unless a line below them is kept.
///
/// `lines` must be in pre-order with depths, as `collect_lines` produces
/// them. Walking backwards, `kept_below[d]` records whether any line at
/// depth `d` under the current parent survived.
fn without_zero_lines(lines: &[ReportLine]) -> Vec<ReportLine> {
    let max_depth = lines.iter().map(|line| line.depth).max().unwrap_or(0);
    let mut kept_below = vec![false; max_depth + 2];
    let mut keep = vec![false; lines.len()];

    for (i, line) in lines.iter().enumerate().rev() {
        let child_kept = std::mem::replace(&mut kept_below[line.depth + 1], false);
        keep[i] = child_kept || line.debit_total != line.credit_total;
        kept_below[line.depth] |= keep[i];
    }

    lines
        .iter()
        .zip(keep)
        .filter(|(_, keep)| *keep)
        .map(|(line, _)| line.clone())
        .collect()
}

/// Group of root accounts with a total on the section's normal side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub lines: Vec<ReportLine>,
    pub total: BigDecimal,
}

impl ReportSection {
    fn from_roots<'a>(roots: impl Iterator<Item = &'a AccountNode>) -> Self {
        let mut lines = Vec::new();
        let mut total = BigDecimal::from(0);
        for root in roots {
            total += root.balance();
            collect_lines(root, &mut lines);
        }
        Self { lines, total }
    }

    /// Same section with zero-balance lines left out; the total is unchanged
    pub fn without_zero_balances(&self) -> Self {
        Self {
            lines: without_zero_lines(&self.lines),
            total: self.total.clone(),
        }
    }
}

fn roots_of(forest: &Forest, account_type: AccountType) -> impl Iterator<Item = &AccountNode> {
    forest
        .roots
        .iter()
        .filter(move |root| root.account_type == account_type)
}

/// Trial balance with closing balances in debit and credit columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub period: ReportPeriod,
    pub lines: Vec<ReportLine>,
    /// Debit column over each account's own postings
    pub total_debits: BigDecimal,
    /// Credit column over each account's own postings
    pub total_credits: BigDecimal,
    pub is_balanced: bool,
}

impl TrialBalance {
    /// Totals place every account's direct net in its column, so each
    /// posting is counted once however the groups are nested.
    pub fn from_forest(period: ReportPeriod, forest: &Forest) -> Self {
        let zero = BigDecimal::from(0);
        let mut total_debits = BigDecimal::from(0);
        let mut total_credits = BigDecimal::from(0);
        for (_, node) in forest.walk() {
            let net = node.direct.net();
            if net > zero {
                total_debits += net;
            } else {
                total_credits -= net;
            }
        }

        let mut lines = Vec::new();
        for root in &forest.roots {
            collect_lines(root, &mut lines);
        }

        let is_balanced = total_debits == total_credits;
        Self {
            period,
            lines,
            total_debits,
            total_credits,
            is_balanced,
        }
    }

    /// Same report with zero-balance lines left out; totals are unchanged
    pub fn without_zero_balances(&self) -> Self {
        Self {
            period: self.period,
            lines: without_zero_lines(&self.lines),
            total_debits: self.total_debits.clone(),
            total_credits: self.total_credits.clone(),
            is_balanced: self.is_balanced,
        }
    }
}

/// Balance sheet; the period's profit is carried to the liabilities side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub period: ReportPeriod,
    pub assets: ReportSection,
    pub liabilities: ReportSection,
    pub equity: ReportSection,
    /// Profit (positive) or loss (negative) from revenue and expense accounts
    pub net_profit: BigDecimal,
    pub total_assets: BigDecimal,
    pub total_liabilities_and_equity: BigDecimal,
    pub is_balanced: bool,
}

impl BalanceSheet {
    /// Balances are the movements within `period`. For closing balances,
    /// build the forest over a period that starts when the books begin; an
    /// "as of" period from `ReportPeriod::resolve` only covers the financial
    /// year to date.
    pub fn from_forest(period: ReportPeriod, forest: &Forest) -> Self {
        let assets = ReportSection::from_roots(roots_of(forest, AccountType::Asset));
        let liabilities = ReportSection::from_roots(roots_of(forest, AccountType::Liability));
        let equity = ReportSection::from_roots(roots_of(forest, AccountType::Equity));
        let net_profit = net_profit(forest);

        let total_assets = assets.total.clone();
        let total_liabilities_and_equity = &liabilities.total + &equity.total + &net_profit;
        let is_balanced = total_assets == total_liabilities_and_equity;

        Self {
            period,
            assets,
            liabilities,
            equity,
            net_profit,
            total_assets,
            total_liabilities_and_equity,
            is_balanced,
        }
    }

    /// Same statement with zero-balance lines left out; totals are unchanged
    pub fn without_zero_balances(&self) -> Self {
        Self {
            assets: self.assets.without_zero_balances(),
            liabilities: self.liabilities.without_zero_balances(),
            equity: self.equity.without_zero_balances(),
            period: self.period,
            net_profit: self.net_profit.clone(),
            total_assets: self.total_assets.clone(),
            total_liabilities_and_equity: self.total_liabilities_and_equity.clone(),
            is_balanced: self.is_balanced,
        }
    }
}

/// Profit & loss statement for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitAndLoss {
    pub period: ReportPeriod,
    pub revenue: ReportSection,
    pub expenses: ReportSection,
    /// Revenue total minus expense total
    pub net_profit: BigDecimal,
}

impl ProfitAndLoss {
    pub fn from_forest(period: ReportPeriod, forest: &Forest) -> Self {
        let revenue = ReportSection::from_roots(roots_of(forest, AccountType::Revenue));
        let expenses = ReportSection::from_roots(roots_of(forest, AccountType::Expense));
        let net_profit = &revenue.total - &expenses.total;

        Self {
            period,
            revenue,
            expenses,
            net_profit,
        }
    }

    pub fn is_loss(&self) -> bool {
        self.net_profit < BigDecimal::from(0)
    }

    /// Same statement with zero-balance lines left out; totals are unchanged
    pub fn without_zero_balances(&self) -> Self {
        Self {
            revenue: self.revenue.without_zero_balances(),
            expenses: self.expenses.without_zero_balances(),
            period: self.period,
            net_profit: self.net_profit.clone(),
        }
    }
}

fn net_profit(forest: &Forest) -> BigDecimal {
    forest
        .roots
        .iter()
        .map(|root| match root.account_type {
            AccountType::Revenue => root.balance(),
            AccountType::Expense => -root.balance(),
            AccountType::Asset | AccountType::Liability | AccountType::Equity => {
                BigDecimal::from(0)
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerAggregator, PostingSums};
    use chrono::NaiveDate;

    fn period() -> ReportPeriod {
        ReportPeriod::new(
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        )
        .unwrap()
    }

    fn sums(entries: &[(&str, i64, i64)]) -> PostingSums {
        entries
            .iter()
            .map(|(id, debit, credit)| {
                (
                    id.to_string(),
                    PostingSum::new(BigDecimal::from(*debit), BigDecimal::from(*credit)),
                )
            })
            .collect()
    }

    /// Capital 10000 brought in as cash, goods sold for 3000 cash,
    /// rent 1200 paid from bank, 5000 moved from cash to bank.
    fn trading_forest() -> Forest {
        let accounts = vec![
            Account::new("assets", "Current Assets", AccountType::Asset, None),
            Account::new("cash", "Cash", AccountType::Asset, Some("assets")),
            Account::new("bank", "Bank", AccountType::Asset, Some("assets")),
            Account::new("capital", "Capital Account", AccountType::Equity, None),
            Account::new("loans", "Loans", AccountType::Liability, None),
            Account::new("sales", "Sales Accounts", AccountType::Revenue, None),
            Account::new("indirect", "Indirect Expenses", AccountType::Expense, None),
            Account::new("rent", "Rent", AccountType::Expense, Some("indirect")),
        ];
        let sums = sums(&[
            ("cash", 13000, 5000),
            ("bank", 5000, 1200),
            ("capital", 0, 10000),
            ("sales", 0, 3000),
            ("rent", 1200, 0),
        ]);
        LedgerAggregator::new().build(&accounts, &sums).unwrap()
    }

    #[test]
    fn test_trial_balance_columns() {
        let tb = TrialBalance::from_forest(period(), &trading_forest());

        assert!(tb.is_balanced);
        assert_eq!(tb.total_debits, BigDecimal::from(13000));
        assert_eq!(tb.total_credits, BigDecimal::from(13000));

        let capital = tb.lines.iter().find(|l| l.account_id == "capital").unwrap();
        assert_eq!(capital.credit_balance(), Some(BigDecimal::from(10000)));
        assert_eq!(capital.debit_balance(), None);

        let cash = tb.lines.iter().find(|l| l.account_id == "cash").unwrap();
        assert_eq!(cash.depth, 1);
        assert_eq!(cash.debit_balance(), Some(BigDecimal::from(8000)));
    }

    #[test]
    fn test_zero_balances_hidden_on_request() {
        let forest = trading_forest();

        let all = TrialBalance::from_forest(period(), &forest);
        assert!(all.lines.iter().any(|l| l.account_id == "loans"));

        let shown = all.without_zero_balances();
        assert!(!shown.lines.iter().any(|l| l.account_id == "loans"));
        assert_eq!(shown.lines.len(), all.lines.len() - 1);
        assert_eq!(shown.total_debits, all.total_debits);
    }

    /// Suspense group whose two ledgers cancel each other out
    fn suspense_forest() -> Forest {
        let accounts = vec![
            Account::new("suspense", "Suspense", AccountType::Asset, None),
            Account::new("a", "A", AccountType::Asset, Some("suspense")),
            Account::new("b", "B", AccountType::Asset, Some("suspense")),
            Account::new("idle", "Idle", AccountType::Asset, Some("suspense")),
        ];
        LedgerAggregator::new()
            .build(&accounts, &sums(&[("a", 50, 0), ("b", 0, 50)]))
            .unwrap()
    }

    #[test]
    fn test_zero_group_with_offsetting_children_is_kept() {
        let tb = TrialBalance::from_forest(period(), &suspense_forest()).without_zero_balances();

        let ids: Vec<&str> = tb.lines.iter().map(|l| l.account_id.as_str()).collect();
        assert_eq!(ids, vec!["suspense", "a", "b"]);
    }

    #[test]
    fn test_totals_count_offsetting_children() {
        let tb = TrialBalance::from_forest(period(), &suspense_forest());

        let leaf_debits: BigDecimal = tb.lines.iter().filter_map(|l| l.debit_balance()).sum();
        assert_eq!(tb.total_debits, BigDecimal::from(50));
        assert_eq!(tb.total_credits, BigDecimal::from(50));
        assert_eq!(tb.total_debits, leaf_debits);
        assert!(tb.is_balanced);
    }

    #[test]
    fn test_totals_include_group_direct_postings() {
        let accounts = vec![
            Account::new("assets", "Current Assets", AccountType::Asset, None),
            Account::new("cash", "Cash", AccountType::Asset, Some("assets")),
            Account::new("capital", "Capital", AccountType::Equity, None),
        ];
        let forest = LedgerAggregator::new()
            .build(
                &accounts,
                &sums(&[("assets", 100, 0), ("cash", 400, 0), ("capital", 0, 500)]),
            )
            .unwrap();

        let tb = TrialBalance::from_forest(period(), &forest);
        assert_eq!(tb.total_debits, BigDecimal::from(500));
        assert_eq!(tb.total_credits, BigDecimal::from(500));
    }

    #[test]
    fn test_section_hiding_keeps_totals() {
        let bs = BalanceSheet::from_forest(period(), &trading_forest());
        let shown = bs.without_zero_balances();

        assert!(bs.liabilities.lines.iter().any(|l| l.account_id == "loans"));
        assert!(shown.liabilities.lines.is_empty());
        assert_eq!(shown.total_assets, bs.total_assets);
        assert_eq!(shown.assets.lines, bs.assets.lines);

        let pl = ProfitAndLoss::from_forest(period(), &suspense_forest()).without_zero_balances();
        assert!(pl.revenue.lines.is_empty());
        assert_eq!(pl.net_profit, BigDecimal::from(0));
    }

    #[test]
    fn test_profit_and_loss() {
        let pl = ProfitAndLoss::from_forest(period(), &trading_forest());

        assert_eq!(pl.revenue.total, BigDecimal::from(3000));
        assert_eq!(pl.expenses.total, BigDecimal::from(1200));
        assert_eq!(pl.net_profit, BigDecimal::from(1800));
        assert!(!pl.is_loss());
        assert_eq!(pl.expenses.lines.len(), 2);
    }

    #[test]
    fn test_balance_sheet_balances() {
        let bs = BalanceSheet::from_forest(period(), &trading_forest());

        assert_eq!(bs.total_assets, BigDecimal::from(11800));
        assert_eq!(bs.equity.total, BigDecimal::from(10000));
        assert_eq!(bs.net_profit, BigDecimal::from(1800));
        assert_eq!(bs.total_liabilities_and_equity, BigDecimal::from(11800));
        assert!(bs.is_balanced);
    }

    #[test]
    fn test_loss_reduces_liabilities_side() {
        let accounts = vec![
            Account::new("cash", "Cash", AccountType::Asset, None),
            Account::new("capital", "Capital", AccountType::Equity, None),
            Account::new("salary", "Salary", AccountType::Expense, None),
        ];
        let forest = LedgerAggregator::new()
            .build(
                &accounts,
                &sums(&[("cash", 1000, 400), ("capital", 0, 1000), ("salary", 400, 0)]),
            )
            .unwrap();

        let pl = ProfitAndLoss::from_forest(period(), &forest);
        assert!(pl.is_loss());

        let bs = BalanceSheet::from_forest(period(), &forest);
        assert_eq!(bs.net_profit, BigDecimal::from(-400));
        assert!(bs.is_balanced);
    }
}
