//! Expense model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::ids::{BudgetId, ExpenseId};
use super::money::Money;

/// A single logged expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Amount spent (never negative)
    pub amount: Money,

    /// Spending category, `None` when the user did not pick one
    #[serde(default)]
    pub category: Option<Category>,

    /// Calendar date of the expense
    pub expense_date: NaiveDate,

    /// Budget this expense counts against
    #[serde(default)]
    pub budget_id: Option<BudgetId>,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new uncategorized, unbudgeted expense
    pub fn new(amount: Money, expense_date: NaiveDate) -> Self {
        Self {
            id: ExpenseId::new(),
            amount,
            category: None,
            expense_date,
            budget_id: None,
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_budget(mut self, budget_id: BudgetId) -> Self {
        self.budget_id = Some(budget_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount(self.amount));
        }
        if self.description.len() > 200 {
            return Err(ExpenseValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NegativeAmount(Money),
    DescriptionTooLong(usize),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Expense amount cannot be negative: {}", amount)
            }
            Self::DescriptionTooLong(len) => {
                write!(f, "Description too long ({} chars, max 200)", len)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_builder() {
        let budget = BudgetId::new();
        let expense = Expense::new(Money::from_cents(1250), date(2025, 3, 4))
            .with_category(Category::Food)
            .with_budget(budget)
            .with_description("Lunch");

        assert_eq!(expense.category, Some(Category::Food));
        assert_eq!(expense.budget_id, Some(budget));
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let expense = Expense::new(Money::from_cents(-1), date(2025, 3, 4));
        assert_eq!(
            expense.validate(),
            Err(ExpenseValidationError::NegativeAmount(Money::from_cents(-1)))
        );
    }

    #[test]
    fn test_zero_amount_allowed() {
        let expense = Expense::new(Money::zero(), date(2025, 3, 4));
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "amount": 500,
            "expense_date": "2025-01-02",
            "created_at": "2025-01-02T10:00:00Z"
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.category, None);
        assert_eq!(expense.budget_id, None);
        assert!(expense.description.is_empty());
    }
}
