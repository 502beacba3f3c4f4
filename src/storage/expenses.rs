//! Expense repository backed by `expenses.json`
//!
//! Besides plain lookups the repository answers filtered, sorted and paginated
//! queries, which is what the statistics and listing code needs from a store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::error::ExpenseError;
use crate::models::{BudgetId, Category, Expense, ExpenseId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Category filter for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Is(Category),
    Uncategorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Amount,
}

/// Filter, sort and page selection for [`ExpenseRepository::query`]
#[derive(Debug, Clone)]
pub struct ExpenseQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub budget_id: Option<BudgetId>,
    pub category: Option<CategoryFilter>,
    pub sort: SortField,
    pub descending: bool,
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
}

impl Default for ExpenseQuery {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            budget_id: None,
            category: None,
            sort: SortField::Date,
            descending: true,
            page: 1,
            per_page: 20,
        }
    }
}

impl ExpenseQuery {
    fn matches(&self, expense: &Expense) -> bool {
        if self.start.is_some_and(|start| expense.expense_date < start) {
            return false;
        }
        if self.end.is_some_and(|end| expense.expense_date > end) {
            return false;
        }
        if self.budget_id.is_some() && expense.budget_id != self.budget_id {
            return false;
        }
        match self.category {
            Some(CategoryFilter::Is(c)) => expense.category == Some(c),
            Some(CategoryFilter::Uncategorized) => expense.category.is_none(),
            None => true,
        }
    }
}

/// One page of query results
#[derive(Debug, Clone)]
pub struct ExpensePage {
    pub items: Vec<Expense>,
    /// Number of matches across all pages
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl ExpensePage {
    pub fn page_count(&self) -> usize {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page)
    }
}

pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: budget_id -> expense ids
    by_budget: RwLock<HashMap<BudgetId, Vec<ExpenseId>>>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_budget: RwLock::new(HashMap::new()),
        }
    }

    fn read_data(&self) -> Result<RwLockReadGuard<'_, HashMap<ExpenseId, Expense>>, ExpenseError> {
        self.data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_data(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<ExpenseId, Expense>>, ExpenseError> {
        self.data
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn write_index(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<BudgetId, Vec<ExpenseId>>>, ExpenseError> {
        self.by_budget
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load expenses from disk and rebuild the budget index
    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.write_data()?;
        let mut by_budget = self.write_index()?;
        data.clear();
        by_budget.clear();

        for expense in file_data.expenses {
            if let Some(budget_id) = expense.budget_id {
                by_budget.entry(budget_id).or_default().push(expense.id);
            }
            data.insert(expense.id, expense);
        }

        tracing::debug!(count = data.len(), "loaded expenses");
        Ok(())
    }

    pub fn save(&self) -> Result<(), ExpenseError> {
        let data = self.read_data()?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut expenses);

        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseError> {
        Ok(self.read_data()?.get(&id).cloned())
    }

    /// Find by full id or by a unique prefix of it
    pub fn find(&self, identifier: &str) -> Result<Option<Expense>, ExpenseError> {
        let data = self.read_data()?;
        if let Ok(id) = identifier.parse::<ExpenseId>() {
            return Ok(data.get(&id).cloned());
        }
        let mut matches = data.values().filter(|e| e.id.matches_prefix(identifier));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(Some(found.clone())),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => Err(ExpenseError::Validation(format!(
                "Ambiguous expense id '{}'",
                identifier
            ))),
        }
    }

    /// All expenses, newest first
    pub fn get_all(&self) -> Result<Vec<Expense>, ExpenseError> {
        let mut expenses: Vec<_> = self.read_data()?.values().cloned().collect();
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Expenses dated within `start..=end`
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>, ExpenseError> {
        let mut expenses: Vec<_> = self
            .read_data()?
            .values()
            .filter(|e| e.expense_date >= start && e.expense_date <= end)
            .cloned()
            .collect();
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Expenses linked to `budget_id` dated within `start..=end`
    pub fn get_by_budget_in_range(
        &self,
        budget_id: BudgetId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>, ExpenseError> {
        let data = self.read_data()?;
        let by_budget = self
            .by_budget
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_budget.get(&budget_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut expenses: Vec<_> = ids
            .iter()
            .filter_map(|id| data.get(id))
            .filter(|e| e.expense_date >= start && e.expense_date <= end)
            .cloned()
            .collect();
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Filter, sort and paginate
    pub fn query(&self, query: &ExpenseQuery) -> Result<ExpensePage, ExpenseError> {
        let mut matches: Vec<_> = self
            .read_data()?
            .values()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match query.sort {
                SortField::Date => a.expense_date.cmp(&b.expense_date),
                SortField::Amount => a.amount.cmp(&b.amount),
            }
            .then(a.created_at.cmp(&b.created_at));
            if query.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        let total = matches.len();
        let page = query.page.max(1);
        let per_page = query.per_page.max(1);
        let items = matches
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Ok(ExpensePage {
            items,
            total,
            page,
            per_page,
        })
    }

    /// Insert or update an expense
    pub fn upsert(&self, expense: Expense) -> Result<(), ExpenseError> {
        let mut data = self.write_data()?;
        let mut by_budget = self.write_index()?;

        if let Some(old_budget) = data.get(&expense.id).and_then(|old| old.budget_id) {
            if let Some(ids) = by_budget.get_mut(&old_budget) {
                ids.retain(|&id| id != expense.id);
            }
        }
        if let Some(budget_id) = expense.budget_id {
            by_budget.entry(budget_id).or_default().push(expense.id);
        }

        data.insert(expense.id, expense);
        Ok(())
    }

    pub fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseError> {
        let mut data = self.write_data()?;
        let mut by_budget = self.write_index()?;

        let removed = data.remove(&id);
        if let Some(budget_id) = removed.as_ref().and_then(|e| e.budget_id) {
            if let Some(ids) = by_budget.get_mut(&budget_id) {
                ids.retain(|&other| other != id);
            }
        }
        Ok(removed)
    }

    /// Remove the budget link from every expense pointing at `budget_id`
    ///
    /// Returns the number of expenses changed.
    pub fn unlink_budget(&self, budget_id: BudgetId) -> Result<usize, ExpenseError> {
        let mut data = self.write_data()?;
        let mut by_budget = self.write_index()?;

        let ids = by_budget.remove(&budget_id).unwrap_or_default();
        for id in &ids {
            if let Some(expense) = data.get_mut(id) {
                expense.budget_id = None;
            }
        }
        Ok(ids.len())
    }

    pub fn count(&self) -> Result<usize, ExpenseError> {
        Ok(self.read_data()?.len())
    }
}

fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        b.expense_date
            .cmp(&a.expense_date)
            .then(b.created_at.cmp(&a.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_save_load() {
        let (_temp_dir, repo) = repo();
        let expense = Expense::new(Money::from_cents(1200), date(2025, 2, 3))
            .with_category(Category::Food);
        repo.upsert(expense.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = ExpenseRepository::new(repo.path.clone());
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(expense.id).unwrap(), Some(expense));
    }

    #[test]
    fn test_budget_index_follows_updates() {
        let (_temp_dir, repo) = repo();
        let a = BudgetId::new();
        let b = BudgetId::new();
        let mut expense = Expense::new(Money::from_cents(500), date(2025, 2, 3)).with_budget(a);
        repo.upsert(expense.clone()).unwrap();

        expense.budget_id = Some(b);
        repo.upsert(expense.clone()).unwrap();

        let (start, end) = (date(2025, 2, 1), date(2025, 2, 28));
        assert!(repo.get_by_budget_in_range(a, start, end).unwrap().is_empty());
        assert_eq!(repo.get_by_budget_in_range(b, start, end).unwrap().len(), 1);

        assert_eq!(repo.unlink_budget(b).unwrap(), 1);
        assert_eq!(repo.get(expense.id).unwrap().unwrap().budget_id, None);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let (_temp_dir, repo) = repo();
        for day in [1, 15, 28] {
            repo.upsert(Expense::new(Money::from_cents(100), date(2025, 2, day)))
                .unwrap();
        }
        repo.upsert(Expense::new(Money::from_cents(100), date(2025, 3, 1)))
            .unwrap();

        let feb = repo
            .get_by_date_range(date(2025, 2, 1), date(2025, 2, 28))
            .unwrap();
        assert_eq!(feb.len(), 3);
        assert_eq!(feb[0].expense_date, date(2025, 2, 28));
    }

    #[test]
    fn test_query_filters_sorts_and_pages() {
        let (_temp_dir, repo) = repo();
        for (cents, day, category) in [
            (300, 1, Some(Category::Food)),
            (100, 2, Some(Category::Food)),
            (900, 3, None),
            (200, 4, Some(Category::Food)),
            (50, 5, Some(Category::Housing)),
        ] {
            let mut e = Expense::new(Money::from_cents(cents), date(2025, 4, day));
            e.category = category;
            repo.upsert(e).unwrap();
        }

        let query = ExpenseQuery {
            category: Some(CategoryFilter::Is(Category::Food)),
            sort: SortField::Amount,
            descending: false,
            per_page: 2,
            ..Default::default()
        };
        let first = repo.query(&query).unwrap();
        assert_eq!(first.total, 3);
        assert_eq!(first.page_count(), 2);
        let amounts: Vec<_> = first.items.iter().map(|e| e.amount.cents()).collect();
        assert_eq!(amounts, vec![100, 200]);

        let second = repo.query(&ExpenseQuery { page: 2, ..query }).unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].amount.cents(), 300);

        let uncategorized = repo
            .query(&ExpenseQuery {
                category: Some(CategoryFilter::Uncategorized),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(uncategorized.total, 1);
    }

    #[test]
    fn test_query_page_past_end_is_empty() {
        let (_temp_dir, repo) = repo();
        repo.upsert(Expense::new(Money::from_cents(100), date(2025, 4, 1)))
            .unwrap();

        let page = repo
            .query(&ExpenseQuery {
                page: usize::MAX,
                per_page: 20,
                ..Default::default()
            })
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
        assert_eq!(page.page, usize::MAX);
    }

    #[test]
    fn test_find_by_prefix() {
        let (_temp_dir, repo) = repo();
        let expense = Expense::new(Money::from_cents(100), date(2025, 1, 1));
        repo.upsert(expense.clone()).unwrap();

        let short = expense.id.short();
        assert_eq!(repo.find(&short).unwrap().unwrap().id, expense.id);
        assert!(repo.find("exp-zzzz").unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = repo();
        let expense = Expense::new(Money::from_cents(100), date(2025, 1, 1));
        repo.upsert(expense.clone()).unwrap();
        assert!(repo.delete(expense.id).unwrap().is_some());
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.delete(expense.id).unwrap().is_none());
    }
}
