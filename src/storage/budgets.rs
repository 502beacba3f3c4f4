//! Budget repository backed by `budgets.json`

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ExpenseError;
use crate::models::{Budget, BudgetId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    budgets: Vec<Budget>,
}

pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for budget in file_data.budgets {
            data.insert(budget.id, budget);
        }

        tracing::debug!(count = data.len(), "loaded budgets");
        Ok(())
    }

    pub fn save(&self) -> Result<(), ExpenseError> {
        let budgets = self.get_all()?;
        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, ExpenseError> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All budgets sorted by name
    pub fn get_all(&self) -> Result<Vec<Budget>, ExpenseError> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut budgets: Vec<_> = data.values().cloned().collect();
        budgets.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(budgets)
    }

    /// Case-insensitive lookup by name
    pub fn get_by_name(&self, name: &str) -> Result<Option<Budget>, ExpenseError> {
        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let needle = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|b| b.name.to_lowercase() == needle)
            .cloned())
    }

    /// Look up by name, full id or unique id prefix
    pub fn find(&self, identifier: &str) -> Result<Option<Budget>, ExpenseError> {
        if let Some(budget) = self.get_by_name(identifier)? {
            return Ok(Some(budget));
        }
        if let Ok(id) = identifier.parse::<BudgetId>() {
            return self.get(id);
        }

        let data = self
            .data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let mut matches = data.values().filter(|b| b.id.matches_prefix(identifier));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(Some(found.clone())),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => Err(ExpenseError::Validation(format!(
                "Ambiguous budget id '{}'",
                identifier
            ))),
        }
    }

    pub fn upsert(&self, budget: Budget) -> Result<(), ExpenseError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(budget.id, budget);
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> Result<Option<Budget>, ExpenseError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id))
    }

    pub fn name_exists(&self, name: &str, exclude_id: Option<BudgetId>) -> Result<bool, ExpenseError> {
        Ok(self
            .get_by_name(name)?
            .is_some_and(|b| Some(b.id) != exclude_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_save_and_reload_sorted() {
        let (temp_dir, repo) = repo();
        repo.upsert(Budget::new("rent", Money::from_units(1500, 0)))
            .unwrap();
        repo.upsert(Budget::new("Groceries", Money::from_units(400, 0)))
            .unwrap();
        repo.save().unwrap();

        let reloaded = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        reloaded.load().unwrap();
        let names: Vec<_> = reloaded
            .get_all()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Groceries", "rent"]);
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, repo) = repo();
        let budget = Budget::new("Groceries", Money::from_units(400, 0));
        repo.upsert(budget.clone()).unwrap();

        assert_eq!(repo.find("groceries").unwrap().unwrap().id, budget.id);
        assert_eq!(repo.find(&budget.id.short()).unwrap().unwrap().id, budget.id);
        let full_id = serde_json::to_value(budget.id).unwrap();
        assert_eq!(
            repo.find(full_id.as_str().unwrap()).unwrap().unwrap().id,
            budget.id
        );
        assert!(repo.find("Rent").unwrap().is_none());
    }

    #[test]
    fn test_name_exists() {
        let (_temp_dir, repo) = repo();
        let budget = Budget::new("Fun", Money::from_units(50, 0));
        repo.upsert(budget.clone()).unwrap();

        assert!(repo.name_exists("FUN", None).unwrap());
        assert!(!repo.name_exists("fun", Some(budget.id)).unwrap());
    }
}
