//! Budget Usage Report
//!
//! One row per budget comparing this month's linked spending against the cap.

use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

use crate::display::report::{double_separator, format_bar, format_status, separator};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{BudgetId, Money, StatsPeriod};
use crate::services::BudgetService;
use crate::stats::{BudgetUsage, UsageStatus, UsageThresholds};
use crate::storage::Storage;

/// A row in the usage report
#[derive(Debug, Clone, Serialize)]
pub struct BudgetUsageRow {
    pub budget_id: BudgetId,
    pub name: String,
    pub usage: BudgetUsage,
    /// Absent when the cap is not positive
    pub status: Option<UsageStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetUsageReport {
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    pub rows: Vec<BudgetUsageRow>,
    pub total_cap: Money,
    pub total_used: Money,
}

impl BudgetUsageReport {
    /// Usage of every budget for the month containing `today`
    pub fn generate(
        storage: &Storage,
        thresholds: &UsageThresholds,
        today: NaiveDate,
    ) -> ExpenseResult<Self> {
        let (month_start, month_end) = StatsPeriod::Month.window(today);
        let service = BudgetService::new(storage);

        let mut rows = Vec::new();
        let mut total_cap = Money::zero();
        let mut total_used = Money::zero();

        for (budget, usage) in service.usage_all(today)? {
            total_cap += usage.cap;
            total_used += usage.used;
            rows.push(BudgetUsageRow {
                budget_id: budget.id,
                name: budget.name,
                status: usage.status(thresholds),
                usage,
            });
        }

        Ok(Self {
            month_start,
            month_end,
            rows,
            total_cap,
            total_used,
        })
    }

    pub fn over_budget_count(&self) -> usize {
        self.rows.iter().filter(|r| r.usage.is_over_budget()).count()
    }

    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Budget usage {} to {}\n",
            self.month_start, self.month_end
        ));
        output.push_str(&double_separator(88));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No budgets yet.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<20} {:>12} {:>12} {:>12} {:>7}  {:<10} {}\n",
            "Budget", "Cap", "Used", "Remaining", "Used%", "Status", ""
        ));
        output.push_str(&separator(88));
        output.push('\n');

        for row in &self.rows {
            let percent = row
                .usage
                .used_percent()
                .map(|p| format!("{:.1}%", p))
                .unwrap_or_else(|| "-".to_string());

            output.push_str(&format!(
                "{:<20} {:>12} {:>12} {:>12} {:>7}  {:<10} {}\n",
                row.name,
                row.usage.cap.format_with_symbol(currency_symbol),
                row.usage.used.format_with_symbol(currency_symbol),
                row.usage.remaining.format_with_symbol(currency_symbol),
                percent,
                format_status(row.status),
                format_bar(row.usage.used, row.usage.cap, 12)
            ));
        }

        output.push_str(&separator(88));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>12} {:>12} {:>12}\n",
            "TOTAL",
            self.total_cap.format_with_symbol(currency_symbol),
            self.total_used.format_with_symbol(currency_symbol),
            (self.total_cap - self.total_used).format_with_symbol(currency_symbol),
        ));

        let over = self.over_budget_count();
        if over > 0 {
            output.push_str(&format!("\n{} budget(s) over their cap\n", over));
        }

        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> ExpenseResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["budget", "cap", "used", "remaining", "used_percent", "status"])?;

        for row in &self.rows {
            csv.write_record([
                row.name.clone(),
                units(row.usage.cap),
                units(row.usage.used),
                units(row.usage.remaining),
                row.usage
                    .used_percent()
                    .map(|p| format!("{:.1}", p))
                    .unwrap_or_default(),
                row.status.map(|s| s.to_string()).unwrap_or_default(),
            ])?;
        }

        csv.flush().map_err(|e| ExpenseError::Export(e.to_string()))?;
        Ok(())
    }

    pub fn to_json(&self) -> ExpenseResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn units(amount: Money) -> String {
    format!("{:.2}", amount.as_units_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ExpensePaths;
    use crate::models::{Budget, Expense};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add_budget(storage: &Storage, name: &str, cap_units: i64) -> Budget {
        let budget = Budget::new(name, Money::from_units(cap_units, 0));
        storage.budgets.upsert(budget.clone()).unwrap();
        budget
    }

    fn spend(storage: &Storage, budget: &Budget, units: i64, day: NaiveDate) {
        let expense = Expense::new(Money::from_units(units, 0), day).with_budget(budget.id);
        storage.expenses.upsert(expense).unwrap();
    }

    #[test]
    fn test_generate_classifies_each_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_budget(&storage, "Food", 1000);
        let rent = add_budget(&storage, "Rent", 500);
        let fun = add_budget(&storage, "Fun", 100);

        spend(&storage, &food, 900, date(2025, 3, 4));
        spend(&storage, &rent, 600, date(2025, 3, 1));
        spend(&storage, &fun, 30, date(2025, 3, 20));
        // Previous month is ignored
        spend(&storage, &fun, 500, date(2025, 2, 28));

        let report =
            BudgetUsageReport::generate(&storage, &UsageThresholds::default(), date(2025, 3, 15))
                .unwrap();

        let status_of = |name: &str| {
            report
                .rows
                .iter()
                .find(|r| r.name == name)
                .and_then(|r| r.status)
        };
        assert_eq!(status_of("Food"), Some(UsageStatus::Critical));
        assert_eq!(status_of("Rent"), Some(UsageStatus::Critical));
        assert_eq!(status_of("Fun"), Some(UsageStatus::Ok));
        assert_eq!(report.over_budget_count(), 1);
        assert_eq!(report.total_cap, Money::from_units(1600, 0));
        assert_eq!(report.total_used, Money::from_units(1530, 0));
    }

    #[test]
    fn test_format_terminal() {
        let (_temp_dir, storage) = create_test_storage();
        let food = add_budget(&storage, "Food", 1000);
        spend(&storage, &food, 250, date(2025, 3, 4));

        let report =
            BudgetUsageReport::generate(&storage, &UsageThresholds::default(), date(2025, 3, 15))
                .unwrap();
        let text = report.format_terminal("$");

        assert!(text.contains("2025-03-01 to 2025-03-31"));
        assert!(text.contains("Food"));
        assert!(text.contains("25.0%"));
        assert!(text.contains("$750.00"));
    }

    #[test]
    fn test_export_csv_leaves_status_empty_for_zero_cap() {
        let (_temp_dir, storage) = create_test_storage();
        let free = add_budget(&storage, "Free", 0);
        spend(&storage, &free, 5, date(2025, 3, 4));

        let report =
            BudgetUsageReport::generate(&storage, &UsageThresholds::default(), date(2025, 3, 15))
                .unwrap();
        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Free,0.00,5.00,-5.00,,"));
    }

    #[test]
    fn test_empty_report() {
        let (_temp_dir, storage) = create_test_storage();
        let report =
            BudgetUsageReport::generate(&storage, &UsageThresholds::default(), date(2025, 3, 15))
                .unwrap();
        assert!(report.format_terminal("$").contains("No budgets yet."));
    }
}
