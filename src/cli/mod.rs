//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod expense;
pub mod stats;

pub use budget::{handle_budget_command, BudgetCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use stats::{handle_stats_command, StatsArgs};

use chrono::NaiveDate;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Money;

/// Parse a `YYYY-MM-DD` argument
pub(crate) fn parse_date(value: &str, what: &str) -> ExpenseResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ExpenseError::Validation(format!(
            "Invalid {} format: '{}'. Use YYYY-MM-DD",
            what, value
        ))
    })
}

pub(crate) fn parse_amount(value: &str) -> ExpenseResult<Money> {
    Money::parse(value).map_err(|e| {
        ExpenseError::Validation(format!(
            "Invalid amount format: '{}'. Use format like '12.50' or '100'. Error: {}",
            value, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-02-28", "date").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        let err = parse_date("28/02/2025", "start date").unwrap_err();
        assert!(err.to_string().contains("start date"));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.5").unwrap(), Money::from_cents(1250));
        assert!(parse_amount("12.345").unwrap_err().is_validation());
    }
}
