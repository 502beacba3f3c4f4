//! Core data models
//!
//! Expenses, budgets, the category taxonomy and statistics periods. These are
//! the plain in-memory types the statistics functions operate on.

pub mod budget;
pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod period;

pub use budget::{Budget, BudgetValidationError};
pub use category::{Category, CategoryInfo, CategoryTaxonomy};
pub use expense::{Expense, ExpenseValidationError};
pub use ids::{BudgetId, ExpenseId};
pub use money::{Money, MoneyParseError};
pub use period::StatsPeriod;
