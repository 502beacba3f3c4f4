//! Terminal rendering helpers

pub mod expense;
pub mod report;

pub use expense::{format_budget_list, format_expense_page};
pub use report::{format_bar, format_share, format_status};
