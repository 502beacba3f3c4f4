//! Storage layer
//!
//! JSON file repositories with atomic writes. This is the data-access side of
//! the application; the statistics code only ever sees the plain records these
//! repositories return.

pub mod budgets;
pub mod expenses;
pub mod file_io;

pub use budgets::BudgetRepository;
pub use expenses::{CategoryFilter, ExpensePage, ExpenseQuery, ExpenseRepository, SortField};
pub use file_io::{read_json, write_json_atomic};

use crate::config::paths::ExpensePaths;
use crate::error::ExpenseError;

/// Owns every repository for one data directory
pub struct Storage {
    paths: ExpensePaths,
    pub expenses: ExpenseRepository,
    pub budgets: BudgetRepository,
}

impl Storage {
    pub fn new(paths: ExpensePaths) -> Result<Self, ExpenseError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &ExpensePaths {
        &self.paths
    }

    pub fn load_all(&mut self) -> Result<(), ExpenseError> {
        self.expenses.load()?;
        self.budgets.load()?;
        Ok(())
    }

    /// Create empty data files for a fresh installation
    pub fn initialize(&self) -> Result<(), ExpenseError> {
        self.paths.ensure_directories()?;
        if !self.paths.expenses_file().exists() {
            self.expenses.save()?;
        }
        if !self.paths.budgets_file().exists() {
            self.budgets.save()?;
        }
        tracing::info!(dir = %self.paths.data_dir().display(), "initialized storage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_initialize() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();

        storage.initialize().unwrap();
        assert!(temp_dir.path().join("data").join("expenses.json").exists());
        assert!(temp_dir.path().join("data").join("budgets.json").exists());

        storage.load_all().unwrap();
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }
}
