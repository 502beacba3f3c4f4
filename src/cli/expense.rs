//! Expense CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_expense_page;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Category, CategoryTaxonomy};
use crate::services::{BudgetService, ExpenseService, NewExpense};
use crate::storage::{CategoryFilter, ExpenseQuery, SortField, Storage};

use super::{parse_amount, parse_date};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount (e.g., "12.50" or "100")
        amount: String,
        /// Category key (food, transport, housing, ...)
        #[arg(short, long)]
        category: Option<String>,
        /// Budget name or ID to charge
        #[arg(short, long)]
        budget: Option<String>,
        /// Expense date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },
    /// List expenses
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Filter by budget name or ID
        #[arg(short, long)]
        budget: Option<String>,
        /// Filter by category key, or "none" for uncategorized
        #[arg(short, long)]
        category: Option<String>,
        /// Sort field: date or amount
        #[arg(long, default_value = "date")]
        sort: String,
        /// Sort ascending instead of newest/largest first
        #[arg(long)]
        asc: bool,
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Expenses per page
        #[arg(long, default_value = "20")]
        per_page: usize,
    },
    /// Delete an expense
    Delete {
        /// Expense ID or unique prefix
        id: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
    today: NaiveDate,
) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            budget,
            date,
            description,
        } => {
            let amount = parse_amount(&amount)?;
            let expense_date = match date {
                Some(d) => parse_date(&d, "date")?,
                None => today,
            };
            let category = category.as_deref().map(parse_category).transpose()?;

            let expense = service.add(NewExpense {
                amount,
                expense_date,
                category,
                budget,
                description,
            })?;

            println!(
                "Added expense {}: {} on {}",
                expense.id,
                expense.amount.format_with_symbol(&settings.currency_symbol),
                expense.expense_date.format(&settings.date_format)
            );
        }

        ExpenseCommands::List {
            from,
            to,
            budget,
            category,
            sort,
            asc,
            page,
            per_page,
        } => {
            if page == 0 || per_page == 0 {
                return Err(ExpenseError::Validation(
                    "Page and page size must be at least 1".into(),
                ));
            }

            let budget_id = budget
                .as_deref()
                .map(|b| service.resolve_budget(b))
                .transpose()?;

            let category = match category.as_deref() {
                Some("none") | Some("uncategorized") => Some(CategoryFilter::Uncategorized),
                Some(key) => Some(CategoryFilter::Is(parse_category(key)?)),
                None => None,
            };

            let sort = match sort.to_lowercase().as_str() {
                "date" => SortField::Date,
                "amount" => SortField::Amount,
                other => {
                    return Err(ExpenseError::Validation(format!(
                        "Unknown sort field '{}'. Use date or amount",
                        other
                    )))
                }
            };

            let query = ExpenseQuery {
                start: from.as_deref().map(|s| parse_date(s, "start date")).transpose()?,
                end: to.as_deref().map(|s| parse_date(s, "end date")).transpose()?,
                budget_id,
                category,
                sort,
                descending: !asc,
                page,
                per_page,
            };

            let result = service.list(&query)?;
            let budgets = BudgetService::new(storage).list()?;
            println!(
                "{}",
                format_expense_page(
                    &result,
                    &budgets,
                    &CategoryTaxonomy::standard(),
                    &settings.currency_symbol,
                    &settings.date_format,
                )
            );
        }

        ExpenseCommands::Delete { id } => {
            let expense = service.delete(&id)?;
            println!(
                "Deleted expense {} ({})",
                expense.id,
                expense.amount.format_with_symbol(&settings.currency_symbol)
            );
        }
    }

    Ok(())
}

fn parse_category(key: &str) -> ExpenseResult<Category> {
    key.parse::<Category>().map_err(ExpenseError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ExpensePaths;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_add_defaults_to_today() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();

        let cmd = ExpenseCommands::Add {
            amount: "12.50".into(),
            category: Some("food".into()),
            budget: None,
            date: None,
            description: "Lunch".into(),
        };
        handle_expense_command(&storage, &settings, cmd, today()).unwrap();

        let all = storage.expenses.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].expense_date, today());
        assert_eq!(all[0].amount, Money::from_cents(1250));
        assert_eq!(all[0].category, Some(Category::Food));
    }

    #[test]
    fn test_add_rejects_unknown_category() {
        let (_temp_dir, storage) = create_test_storage();
        let cmd = ExpenseCommands::Add {
            amount: "5".into(),
            category: Some("travel".into()),
            budget: None,
            date: None,
            description: String::new(),
        };
        let err = handle_expense_command(&storage, &Settings::default(), cmd, today()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_list_rejects_bad_sort() {
        let (_temp_dir, storage) = create_test_storage();
        let cmd = ExpenseCommands::List {
            from: None,
            to: None,
            budget: None,
            category: None,
            sort: "payee".into(),
            asc: false,
            page: 1,
            per_page: 20,
        };
        let err = handle_expense_command(&storage, &Settings::default(), cmd, today()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_delete_missing() {
        let (_temp_dir, storage) = create_test_storage();
        let cmd = ExpenseCommands::Delete { id: "exp-deadbeef".into() };
        let err = handle_expense_command(&storage, &Settings::default(), cmd, today()).unwrap_err();
        assert!(err.is_not_found());
    }
}
