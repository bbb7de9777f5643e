//! Command implementations.

pub mod completions;
pub mod ledger;
pub mod sync;
pub mod version;
