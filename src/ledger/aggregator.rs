//! Hierarchical roll-up of posting sums over the chart of accounts

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

use crate::types::*;

/// Per-account posting sums keyed by account id
pub type PostingSums = HashMap<String, PostingSum>;

/// Result of one aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    /// Root nodes in the order their accounts were supplied
    pub roots: Vec<AccountNode>,
    /// Data quality issues that were worked around while building
    pub warnings: Vec<DataIntegrityWarning>,
}

impl Forest {
    /// Depth-first, pre-order walk over every node
    pub fn walk(&self) -> NodeWalk<'_> {
        NodeWalk::over(&self.roots)
    }

    /// Find a node anywhere in the forest
    pub fn find(&self, id: &str) -> Option<&AccountNode> {
        self.walk().map(|(_, node)| node).find(|node| node.id == id)
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Debit and credit over every posting in the forest
    pub fn totals(&self) -> PostingSum {
        let mut totals = PostingSum::default();
        for root in &self.roots {
            totals.debit += &root.debit_total;
            totals.credit += &root.credit_total;
        }
        totals
    }
}

/// Arena slot used while the forest is being built
struct Slot<'a> {
    account: &'a Account,
    direct: PostingSum,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Builds rolled-up account forests
///
/// The aggregator holds no state; every call allocates its own arena, so
/// concurrent callers need no coordination.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerAggregator;

impl LedgerAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Build the forest for `accounts` using the already period-filtered
    /// `posting_sums`.
    ///
    /// Inactive accounts are skipped. A parent that is unknown or inactive
    /// makes the child a root, and a parent cycle is cut at the account whose
    /// link closes it; both are reported as warnings instead of errors.
    /// Accounts without sums count as zero activity. Roots and children keep
    /// the order of `accounts`.
    ///
    /// # Errors
    ///
    /// `LedgerError::InvalidInput` when an account id is blank or appears
    /// more than once.
    #[instrument(skip_all, fields(accounts = accounts.len(), sums = posting_sums.len()))]
    pub fn build(&self, accounts: &[Account], posting_sums: &PostingSums) -> LedgerResult<Forest> {
        let mut warnings = Vec::new();

        // Pass 1: one slot per active account, seeded with its direct sums
        let mut slots: Vec<Slot<'_>> = Vec::with_capacity(accounts.len());
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(accounts.len());
        for account in accounts {
            if account.id.trim().is_empty() {
                return Err(LedgerError::InvalidInput(format!(
                    "Account '{}' has an empty id",
                    account.name
                )));
            }
            if !account.is_active {
                debug!(account_id = %account.id, "skipping inactive account");
                continue;
            }
            if index.insert(account.id.as_str(), slots.len()).is_some() {
                return Err(LedgerError::InvalidInput(format!(
                    "Duplicate account id '{}'",
                    account.id
                )));
            }
            slots.push(Slot {
                account,
                direct: posting_sums.get(&account.id).cloned().unwrap_or_default(),
                parent: None,
                children: Vec::new(),
            });
        }

        let mut orphans: Vec<&String> = posting_sums
            .keys()
            .filter(|id| !index.contains_key(id.as_str()))
            .collect();
        orphans.sort();
        for account_id in orphans {
            warnings.push(DataIntegrityWarning::OrphanPostings {
                account_id: account_id.clone(),
            });
        }

        // Pass 2: resolve parents, then cut cycles, then link in input order
        for i in 0..slots.len() {
            let account = slots[i].account;
            let Some(parent_id) = account.parent_id.as_deref() else {
                continue;
            };
            match index.get(parent_id) {
                Some(&p) => slots[i].parent = Some(p),
                None => warnings.push(DataIntegrityWarning::DanglingParent {
                    account_id: account.id.clone(),
                    parent_id: parent_id.to_string(),
                }),
            }
        }
        break_cycles(&mut slots, &mut warnings);

        let mut roots = Vec::new();
        for i in 0..slots.len() {
            let parent = slots[i].parent;
            match parent {
                Some(p) => slots[p].children.push(i),
                None => roots.push(i),
            }
        }

        // Pass 3: post-order roll-up
        let nodes = roll_up(&slots, &roots);

        for warning in &warnings {
            warn!(%warning, "data integrity issue in chart of accounts");
        }
        debug!(
            roots = nodes.len(),
            warnings = warnings.len(),
            "built account forest"
        );

        Ok(Forest {
            roots: nodes,
            warnings,
        })
    }
}

/// Cut every parent cycle at the account whose parent link closes it.
///
/// Walks up from each unvisited slot, marking the path as in progress. Reaching
/// a slot that is still in progress means the last link walked closes a cycle.
fn break_cycles(slots: &mut [Slot<'_>], warnings: &mut Vec<DataIntegrityWarning>) {
    let mut done: HashSet<usize> = HashSet::with_capacity(slots.len());

    for start in 0..slots.len() {
        if done.contains(&start) {
            continue;
        }
        let mut path = Vec::new();
        let mut on_path = HashSet::new();
        let mut current = start;
        loop {
            path.push(current);
            on_path.insert(current);
            let parent = slots[current].parent;
            match parent {
                Some(parent) if on_path.contains(&parent) => {
                    warnings.push(DataIntegrityWarning::ParentCycle {
                        account_id: slots[current].account.id.clone(),
                        parent_id: slots[parent].account.id.clone(),
                    });
                    slots[current].parent = None;
                    break;
                }
                Some(parent) if !done.contains(&parent) => current = parent,
                _ => break,
            }
        }
        done.extend(path);
    }
}

/// Compute totals children-first and assemble owned nodes.
///
/// Iterative so that very deep charts cannot exhaust the stack.
fn roll_up(slots: &[Slot<'_>], roots: &[usize]) -> Vec<AccountNode> {
    // Pre-order over the linked forest; its reverse visits children first
    let mut order = Vec::with_capacity(slots.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(slots[i].children.iter().rev());
    }

    let mut built: Vec<Option<AccountNode>> = (0..slots.len()).map(|_| None).collect();
    for &i in order.iter().rev() {
        let slot = &slots[i];
        let children: Vec<AccountNode> = slot
            .children
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();

        let mut debit_total = slot.direct.debit.clone();
        let mut credit_total = slot.direct.credit.clone();
        for child in &children {
            debit_total += &child.debit_total;
            credit_total += &child.credit_total;
        }
        let net: BigDecimal = &debit_total - &credit_total;

        built[i] = Some(AccountNode {
            id: slot.account.id.clone(),
            name: slot.account.name.clone(),
            account_type: slot.account.account_type,
            direct: slot.direct.clone(),
            debit_total,
            credit_total,
            net,
            is_group: !children.is_empty(),
            children,
        });
    }

    roots.iter().filter_map(|&r| built[r].take()).collect()
}
