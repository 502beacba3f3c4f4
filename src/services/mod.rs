//! Service layer
//!
//! Business rules on top of the storage layer: validation, budget linkage and
//! month-scoped usage.

pub mod budget;
pub mod expense;

pub use budget::BudgetService;
pub use expense::{ExpenseService, NewExpense};
