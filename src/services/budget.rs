//! Budget service
//!
//! Budget creation and removal, and usage for the calendar month containing a
//! given day.

use chrono::NaiveDate;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Budget, Money, StatsPeriod};
use crate::stats::{self, BudgetUsage};
use crate::storage::Storage;

pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, name: &str, cap: Money) -> ExpenseResult<Budget> {
        let name = name.trim();
        let budget = Budget::new(name, cap);
        budget
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        if self.storage.budgets.name_exists(name, None)? {
            return Err(ExpenseError::Duplicate {
                entity_type: "Budget",
                identifier: name.to_string(),
            });
        }

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        tracing::info!(id = %budget.id, name = %budget.name, cap = budget.cap.cents(), "created budget");
        Ok(budget)
    }

    pub fn list(&self) -> ExpenseResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    pub fn find(&self, identifier: &str) -> ExpenseResult<Option<Budget>> {
        self.storage.budgets.find(identifier)
    }

    pub fn get(&self, identifier: &str) -> ExpenseResult<Budget> {
        self.find(identifier)?
            .ok_or_else(|| ExpenseError::budget_not_found(identifier))
    }

    /// Delete a budget; linked expenses are kept and unlinked
    ///
    /// Returns the deleted budget and the number of expenses unlinked.
    pub fn delete(&self, identifier: &str) -> ExpenseResult<(Budget, usize)> {
        let budget = self.get(identifier)?;

        let unlinked = self.storage.expenses.unlink_budget(budget.id)?;
        self.storage.budgets.delete(budget.id)?;
        // Budgets first: if the expenses write then fails, the leftover links
        // point at a missing budget, which lookups already treat as unlinked
        self.storage.budgets.save()?;
        self.storage.expenses.save()?;

        tracing::info!(id = %budget.id, unlinked, "deleted budget");
        Ok((budget, unlinked))
    }

    /// Usage of `budget` for the calendar month containing `today`
    pub fn usage(&self, budget: &Budget, today: NaiveDate) -> ExpenseResult<BudgetUsage> {
        let (start, end) = StatsPeriod::Month.window(today);
        let expenses = self
            .storage
            .expenses
            .get_by_budget_in_range(budget.id, start, end)?;

        tracing::debug!(budget = %budget.name, %start, %end, count = expenses.len(), "computing usage");
        Ok(stats::usage(budget, &expenses))
    }

    /// Usage of every budget, in name order
    pub fn usage_all(&self, today: NaiveDate) -> ExpenseResult<Vec<(Budget, BudgetUsage)>> {
        self.list()?
            .into_iter()
            .map(|budget| {
                let usage = self.usage(&budget, today)?;
                Ok((budget, usage))
            })
            .collect()
    }
}
