//! Analysis modules.
//!
//! `aggregator` holds the filter and rollup functions the dashboard views
//! are built from; `insights` holds the deeper descriptive statistics used
//! by the report.

pub mod aggregator;
pub mod insights;

pub use aggregator::*;
pub use insights::*;
