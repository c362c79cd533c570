//! # Trial Balance Core
//!
//! Hierarchical trial balance aggregation: a flat chart of accounts and
//! period-filtered posting sums go in, a rolled-up forest of account nodes
//! comes out, with Trial Balance, Balance Sheet and Profit & Loss views on
//! top.
//!
//! ## Features
//!
//! - **Roll-up**: every group carries its own postings plus those of all
//!   descendants, to any depth
//! - **Graceful degradation**: dangling parents and parent cycles become
//!   roots with a warning instead of failing the report
//! - **Sign conventions**: debit-normal Assets/Expenses, credit-normal
//!   Liabilities/Equity/Revenue, applied by exhaustive match
//! - **Financial years**: April to March by default, configurable
//! - **Storage abstraction**: any backend implementing [`LedgerSource`]
//!
//! ## Quick Start
//!
//! ```rust
//! use trial_balance_core::{Account, AccountType, LedgerAggregator, PostingSum};
//! use bigdecimal::BigDecimal;
//! use std::collections::HashMap;
//!
//! let accounts = vec![
//!     Account::new("G1", "Current Assets", AccountType::Asset, None),
//!     Account::new("L1", "Cash", AccountType::Asset, Some("G1")),
//!     Account::new("L2", "Bank", AccountType::Asset, Some("G1")),
//! ];
//! let sums = HashMap::from([
//!     ("L1".to_string(), PostingSum::new(BigDecimal::from(1000), BigDecimal::from(200))),
//!     ("L2".to_string(), PostingSum::new(BigDecimal::from(500), BigDecimal::from(0))),
//! ]);
//!
//! let forest = LedgerAggregator::new().build(&accounts, &sums).unwrap();
//! assert_eq!(forest.roots[0].net, BigDecimal::from(1300));
//! ```

pub mod cache;
pub mod config;
pub mod ledger;
pub mod reports;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use cache::ForestCache;
pub use config::*;
pub use ledger::*;
pub use reports::*;
pub use traits::*;
pub use types::*;
