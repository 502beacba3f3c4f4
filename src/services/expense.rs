//! Expense service
//!
//! Validation and cross-entity checks on top of the expense repository.

use chrono::NaiveDate;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{BudgetId, Category, Expense, Money};
use crate::storage::{ExpensePage, ExpenseQuery, Storage};

/// Input for creating an expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: Money,
    pub expense_date: NaiveDate,
    pub category: Option<Category>,
    /// Budget name or id
    pub budget: Option<String>,
    pub description: String,
}

pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate, persist and return a new expense
    pub fn add(&self, input: NewExpense) -> ExpenseResult<Expense> {
        let budget_id = match input.budget.as_deref() {
            Some(identifier) => Some(self.resolve_budget(identifier)?),
            None => None,
        };

        let mut expense = Expense::new(input.amount, input.expense_date)
            .with_description(input.description.trim());
        expense.category = input.category;
        expense.budget_id = budget_id;

        expense.validate().map_err(|e| {
            tracing::warn!(error = %e, "rejected expense");
            ExpenseError::Validation(e.to_string())
        })?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        tracing::info!(id = %expense.id, amount = expense.amount.cents(), "added expense");
        Ok(expense)
    }

    pub fn find(&self, identifier: &str) -> ExpenseResult<Option<Expense>> {
        self.storage.expenses.find(identifier)
    }

    pub fn delete(&self, identifier: &str) -> ExpenseResult<Expense> {
        let expense = self
            .find(identifier)?
            .ok_or_else(|| ExpenseError::expense_not_found(identifier))?;

        self.storage.expenses.delete(expense.id)?;
        self.storage.expenses.save()?;

        tracing::info!(id = %expense.id, "deleted expense");
        Ok(expense)
    }

    pub fn list(&self, query: &ExpenseQuery) -> ExpenseResult<ExpensePage> {
        if let (Some(start), Some(end)) = (query.start, query.end) {
            if start > end {
                return Err(ExpenseError::Validation(format!(
                    "Start date {} is after end date {}",
                    start, end
                )));
            }
        }
        self.storage.expenses.query(query)
    }

    /// Resolve a budget name or id to its id
    pub fn resolve_budget(&self, identifier: &str) -> ExpenseResult<BudgetId> {
        self.storage
            .budgets
            .find(identifier)?
            .map(|b| b.id)
            .ok_or_else(|| ExpenseError::budget_not_found(identifier))
    }
}
