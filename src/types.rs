//! Core types and data structures for the aggregation engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account classifications following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Assets - what the business owns (Cash, Bank, Stock, etc.)
    Asset,
    /// Liabilities - what the business owes (Loans, Sundry Creditors, etc.)
    Liability,
    /// Equity - owner's interest in the business (Capital, Reserves, etc.)
    Equity,
    /// Revenue - money earned by the business
    #[serde(alias = "Income")]
    Revenue,
    /// Expenses - costs incurred by the business
    Expense,
}

impl AccountType {
    /// Returns the side on which a positive balance sits for this classification.
    ///
    /// Assets and Expenses are debit-normal; Liabilities, Equity and Revenue
    /// are credit-normal.
    pub fn normal_balance(&self) -> EntryType {
        match self {
            AccountType::Asset | AccountType::Expense => EntryType::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                EntryType::Credit
            }
        }
    }

    /// Balance of the given totals, positive on the normal side
    pub fn signed_balance(&self, debit: &BigDecimal, credit: &BigDecimal) -> BigDecimal {
        match self.normal_balance() {
            EntryType::Debit => debit - credit,
            EntryType::Credit => credit - debit,
        }
    }

    /// Whether the classification belongs on the balance sheet
    pub fn is_balance_sheet(&self) -> bool {
        match self {
            AccountType::Asset | AccountType::Liability | AccountType::Equity => true,
            AccountType::Revenue | AccountType::Expense => false,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountType::Asset => "Asset",
            AccountType::Liability => "Liability",
            AccountType::Equity => "Equity",
            AccountType::Revenue => "Revenue",
            AccountType::Expense => "Expense",
        };
        f.write_str(name)
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asset" | "assets" => Ok(AccountType::Asset),
            "liability" | "liabilities" => Ok(AccountType::Liability),
            "equity" | "capital" => Ok(AccountType::Equity),
            "revenue" | "income" => Ok(AccountType::Revenue),
            "expense" | "expenses" => Ok(AccountType::Expense),
            other => Err(LedgerError::InvalidInput(format!(
                "Unknown account type '{}'",
                other
            ))),
        }
    }
}

/// Sides of a double-entry posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Debit,
    Credit,
}

/// A postable ledger or an organizational group in the chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: String,
    /// Human-readable account name
    pub name: String,
    /// Classification of the account
    pub account_type: AccountType,
    /// Optional parent account for hierarchical chart of accounts
    pub parent_id: Option<String>,
    /// Inactive accounts are left out of aggregation
    pub is_active: bool,
}

impl Account {
    /// Create a new active account
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        parent_id: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            account_type,
            parent_id: parent_id.map(str::to_string),
            is_active: true,
        }
    }

    /// Mark the account inactive
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Account row as delivered by an upstream provider, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    pub parent_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl TryFrom<AccountRecord> for Account {
    type Error = LedgerError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        let id = match record.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                return Err(LedgerError::InvalidInput(format!(
                    "Account '{}' has no id",
                    record.name
                )))
            }
        };
        let account_type = record.account_type.ok_or_else(|| {
            LedgerError::InvalidInput(format!("Account '{}' has no account type", id))
        })?;

        Ok(Account {
            id,
            name: record.name,
            account_type,
            // An empty parent column means "no parent"
            parent_id: record.parent_id.filter(|p| !p.trim().is_empty()),
            is_active: record.is_active,
        })
    }
}

/// One dated monetary movement against a single account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Account being affected
    pub account_id: String,
    /// Debit amount (never negative)
    pub debit: BigDecimal,
    /// Credit amount (never negative)
    pub credit: BigDecimal,
    /// Transaction date of the voucher the posting belongs to
    pub date: NaiveDate,
}

impl Posting {
    /// Create a posting, rejecting negative amounts
    pub fn new(
        account_id: impl Into<String>,
        debit: BigDecimal,
        credit: BigDecimal,
        date: NaiveDate,
    ) -> LedgerResult<Self> {
        let posting = Self {
            account_id: account_id.into(),
            debit,
            credit,
            date,
        };
        posting.validate()?;
        Ok(posting)
    }

    /// Create a debit-only posting
    pub fn debit(
        account_id: impl Into<String>,
        amount: BigDecimal,
        date: NaiveDate,
    ) -> LedgerResult<Self> {
        Self::new(account_id, amount, BigDecimal::from(0), date)
    }

    /// Create a credit-only posting
    pub fn credit(
        account_id: impl Into<String>,
        amount: BigDecimal,
        date: NaiveDate,
    ) -> LedgerResult<Self> {
        Self::new(account_id, BigDecimal::from(0), amount, date)
    }

    /// Check that neither side is negative
    pub fn validate(&self) -> LedgerResult<()> {
        let zero = BigDecimal::from(0);
        if self.debit < zero || self.credit < zero {
            return Err(LedgerError::InvalidInput(format!(
                "Posting against '{}' on {} has a negative amount",
                self.account_id, self.date
            )));
        }
        Ok(())
    }
}

/// Debit and credit sums for one account over a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingSum {
    pub debit: BigDecimal,
    pub credit: BigDecimal,
}

impl PostingSum {
    pub fn new(debit: BigDecimal, credit: BigDecimal) -> Self {
        Self { debit, credit }
    }

    /// Add another sum to this one, side by side
    pub fn add(&mut self, other: &PostingSum) {
        self.debit += &other.debit;
        self.credit += &other.credit;
    }

    /// Raw `debit - credit`
    pub fn net(&self) -> BigDecimal {
        &self.debit - &self.credit
    }
}

impl Default for PostingSum {
    fn default() -> Self {
        Self::new(BigDecimal::from(0), BigDecimal::from(0))
    }
}

/// Rolled-up result for one account
///
/// `debit_total` and `credit_total` include the account's own postings and
/// those of every descendant. Both sides are kept because the meaning of the
/// net sign depends on `account_type`.
///
/// Dropping, cloning and comparing nodes walk the subtree with an explicit
/// stack, so chains of any depth are safe. `Debug` and serde still recurse.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountNode {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    /// Postings made directly against this account
    pub direct: PostingSum,
    pub debit_total: BigDecimal,
    pub credit_total: BigDecimal,
    /// `debit_total - credit_total`
    pub net: BigDecimal,
    /// True iff the node has at least one child
    pub is_group: bool,
    pub children: Vec<AccountNode>,
}

impl AccountNode {
    /// Balance positive on the account's normal side
    pub fn balance(&self) -> BigDecimal {
        self.account_type
            .signed_balance(&self.debit_total, &self.credit_total)
    }

    /// True when both totals are zero
    pub fn is_zero(&self) -> bool {
        let zero = BigDecimal::from(0);
        self.debit_total == zero && self.credit_total == zero
    }

    /// Depth-first, pre-order walk over this node and its descendants
    pub fn walk(&self) -> NodeWalk<'_> {
        NodeWalk {
            stack: vec![(0, self)],
        }
    }

    /// Find a node by id in this subtree
    pub fn find(&self, id: &str) -> Option<&AccountNode> {
        self.walk().map(|(_, node)| node).find(|node| node.id == id)
    }

    fn with_children(&self, children: Vec<AccountNode>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            account_type: self.account_type,
            direct: self.direct.clone(),
            debit_total: self.debit_total.clone(),
            credit_total: self.credit_total.clone(),
            net: self.net.clone(),
            is_group: self.is_group,
            children,
        }
    }

    fn same_values(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.account_type == other.account_type
            && self.direct == other.direct
            && self.debit_total == other.debit_total
            && self.credit_total == other.credit_total
            && self.net == other.net
            && self.is_group == other.is_group
            && self.children.len() == other.children.len()
    }
}

impl Clone for AccountNode {
    fn clone(&self) -> Self {
        // Post-order: a node is rebuilt once its children sit at the end of `done`
        let mut done: Vec<AccountNode> = Vec::new();
        let mut stack: Vec<(&AccountNode, bool)> =
            self.children.iter().rev().map(|child| (child, false)).collect();
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let children = done.split_off(done.len() - node.children.len());
                done.push(node.with_children(children));
            } else {
                stack.push((node, true));
                stack.extend(node.children.iter().rev().map(|child| (child, false)));
            }
        }
        self.with_children(done)
    }
}

impl PartialEq for AccountNode {
    fn eq(&self, other: &Self) -> bool {
        // Equal pre-order sequences with equal child counts mean equal trees
        let mut left = self.walk();
        let mut right = other.walk();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some((_, a)), Some((_, b))) if a.same_values(b) => {}
                _ => return false,
            }
        }
    }
}

impl Drop for AccountNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Pre-order iterator yielding `(depth, node)`
pub struct NodeWalk<'a> {
    stack: Vec<(usize, &'a AccountNode)>,
}

impl<'a> NodeWalk<'a> {
    pub(crate) fn over(roots: &'a [AccountNode]) -> Self {
        Self {
            stack: roots.iter().rev().map(|node| (0, node)).collect(),
        }
    }
}

impl<'a> Iterator for NodeWalk<'a> {
    type Item = (usize, &'a AccountNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

/// Non-fatal data quality issues found while building a forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataIntegrityWarning {
    /// Parent id is unknown or inactive; the account was placed at the root
    DanglingParent {
        account_id: String,
        parent_id: String,
    },
    /// Following parents from the account leads back to it; the link was cut
    ParentCycle {
        account_id: String,
        parent_id: String,
    },
    /// Posting sums were supplied for an account that is not in the forest
    OrphanPostings { account_id: String },
}

impl fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataIntegrityWarning::DanglingParent {
                account_id,
                parent_id,
            } => write!(
                f,
                "account '{}' references missing parent '{}'",
                account_id, parent_id
            ),
            DataIntegrityWarning::ParentCycle {
                account_id,
                parent_id,
            } => write!(
                f,
                "account '{}' closes a parent cycle through '{}'",
                account_id, parent_id
            ),
            DataIntegrityWarning::OrphanPostings { account_id } => {
                write!(f, "postings for unknown account '{}'", account_id)
            }
        }
    }
}

/// Errors that can occur while aggregating or reporting
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
