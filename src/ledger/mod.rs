//! Ledger module containing the aggregation engine and its inputs

pub mod aggregator;
pub mod core;
pub mod period;
pub mod posting;

pub use self::aggregator::*;
pub use self::core::*;
pub use self::period::*;
pub use self::posting::*;
