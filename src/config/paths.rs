//! Where expense-stats keeps its files
//!
//! ```text
//! <base>/config.json
//! <base>/data/expenses.json
//! <base>/data/budgets.json
//! ```
//!
//! `<base>` is `EXPENSE_STATS_DATA_DIR` when set, otherwise an
//! `expense-stats` folder in the platform config directory.

use std::path::{Path, PathBuf};

use crate::error::ExpenseError;

pub const DATA_DIR_ENV: &str = "EXPENSE_STATS_DATA_DIR";

const APP_DIR: &str = "expense-stats";

#[derive(Debug, Clone)]
pub struct ExpensePaths {
    base_dir: PathBuf,
}

impl ExpensePaths {
    /// Base directory from the process environment
    pub fn new() -> Result<Self, ExpenseError> {
        let base_dir = resolve_base_dir(|key| std::env::var(key).ok())?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Create `<base>/data` and its parents
    pub fn ensure_directories(&self) -> Result<(), ExpenseError> {
        let data_dir = self.data_dir();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            ExpenseError::Io(format!("Cannot create {}: {}", data_dir.display(), e))
        })
    }

    /// `init` writes the settings file, so its presence marks a set-up directory
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Pick the base directory using `lookup` for environment variables
///
/// Blank values count as unset.
fn resolve_base_dir(lookup: impl Fn(&str) -> Option<String>) -> Result<PathBuf, ExpenseError> {
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(custom) = var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(custom));
    }

    let config_root = if cfg!(windows) {
        var("APPDATA")
            .map(PathBuf::from)
            .ok_or_else(|| ExpenseError::Config("APPDATA is not set".into()))?
    } else if let Some(xdg) = var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg)
    } else {
        var("HOME")
            .map(|home| PathBuf::from(home).join(".config"))
            .ok_or_else(|| ExpenseError::Config("Neither XDG_CONFIG_HOME nor HOME is set".into()))?
    };

    Ok(config_root.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(
            paths.expenses_file(),
            temp_dir.path().join("data").join("expenses.json")
        );
        assert_eq!(
            paths.budgets_file(),
            temp_dir.path().join("data").join("budgets.json")
        );
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_ensure_directories_creates_nested_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().join("a").join("b"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().is_dir());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_override_wins_over_platform_dirs() {
        let base = resolve_base_dir(env(&[
            (DATA_DIR_ENV, "/srv/expenses"),
            ("XDG_CONFIG_HOME", "/xdg"),
            ("HOME", "/home/me"),
            ("APPDATA", "C:\\Users\\me"),
        ]))
        .unwrap();
        assert_eq!(base, PathBuf::from("/srv/expenses"));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_unix_fallbacks() {
        let xdg = resolve_base_dir(env(&[(DATA_DIR_ENV, "  "), ("XDG_CONFIG_HOME", "/xdg")]));
        assert_eq!(xdg.unwrap(), PathBuf::from("/xdg/expense-stats"));

        let home = resolve_base_dir(env(&[("HOME", "/home/me")]));
        assert_eq!(home.unwrap(), PathBuf::from("/home/me/.config/expense-stats"));

        assert!(resolve_base_dir(env(&[])).is_err());
    }
}
