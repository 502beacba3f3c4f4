//! Custom error types for expense-stats
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for expense-stats operations
#[derive(Error, Debug)]
pub enum ExpenseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Unrecognised statistics period
    #[error("Invalid period '{0}': expected week, month or year")]
    InvalidPeriod(String),

    /// An expense handed to the bucketizer lies outside the reference window
    #[error("Expense dated {date} is outside the {period} window {start}..={end}")]
    OutsidePeriod {
        date: NaiveDate,
        period: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// A computed bucket index fell outside the series
    #[error("Bucket index {index} out of range for {bucket_count} buckets (expense dated {date})")]
    BucketOutOfRange {
        index: i64,
        bucket_count: usize,
        date: NaiveDate,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ExpenseError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the caller handed the bucketizer data outside its window
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::OutsidePeriod { .. } | Self::BucketOutOfRange { .. }
        )
    }
}

impl From<std::io::Error> for ExpenseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ExpenseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for ExpenseError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for expense-stats operations
pub type ExpenseResult<T> = Result<T, ExpenseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExpenseError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = ExpenseError::budget_not_found("Groceries");
        assert_eq!(err.to_string(), "Budget not found: Groceries");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_bucket_out_of_range_display() {
        let err = ExpenseError::BucketOutOfRange {
            index: 7,
            bucket_count: 6,
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Bucket index 7 out of range for 6 buckets (expense dated 2025-01-02)"
        );
        assert!(err.is_out_of_range());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExpenseError = io_err.into();
        assert!(matches!(err, ExpenseError::Io(_)));
    }
}
