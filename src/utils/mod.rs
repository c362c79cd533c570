//! Utility modules

pub mod chart;
pub mod memory_storage;
pub mod validation;

pub use chart::*;
pub use memory_storage::*;
pub use validation::*;
