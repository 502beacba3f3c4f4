//! Budget model
//!
//! A budget is a named monthly spending cap that expenses can be linked to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::money::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    /// Display name, unique per data directory
    pub name: String,

    /// Monthly spending cap
    pub cap: Money,

    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(name: impl Into<String>, cap: Money) -> Self {
        Self {
            id: BudgetId::new(),
            name: name.into(),
            cap,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.name.trim().is_empty() {
            return Err(BudgetValidationError::EmptyName);
        }
        if self.name.len() > 50 {
            return Err(BudgetValidationError::NameTooLong(self.name.len()));
        }
        if !self.cap.is_positive() {
            return Err(BudgetValidationError::NonPositiveCap(self.cap));
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyName,
    NameTooLong(usize),
    NonPositiveCap(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Budget name too long ({} chars, max 50)", len)
            }
            Self::NonPositiveCap(cap) => {
                write!(f, "Budget cap must be greater than zero, got {}", cap)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_budget() {
        let budget = Budget::new("Groceries", Money::from_units(400, 0));
        assert!(budget.validate().is_ok());
        assert_eq!(budget.to_string(), "Groceries");
    }

    #[test]
    fn test_cap_must_be_positive() {
        let budget = Budget::new("Zero", Money::zero());
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::NonPositiveCap(Money::zero()))
        );

        let budget = Budget::new("Negative", Money::from_cents(-100));
        assert!(budget.validate().is_err());
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(
            Budget::new("   ", Money::from_cents(1)).validate(),
            Err(BudgetValidationError::EmptyName)
        );
        assert!(Budget::new("x".repeat(51), Money::from_cents(1))
            .validate()
            .is_err());
    }
}
