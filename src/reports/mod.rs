//! Reports
//!
//! Period statistics and monthly budget usage, each renderable for the
//! terminal, as CSV or as JSON.

pub mod budget_usage;
pub mod statistics;

pub use budget_usage::{BudgetUsageReport, BudgetUsageRow};
pub use statistics::StatisticsReport;
