//! Statistics Report
//!
//! Spending over a week, month or year: a per-bucket histogram and a
//! per-category breakdown with shares.

use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

use crate::display::report::{double_separator, format_bar, format_share, separator};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{CategoryTaxonomy, Money, StatsPeriod};
use crate::stats::{aggregate_by_category, bucketize, CategoryBreakdown, PeriodBucketSeries};
use crate::storage::Storage;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub period: StatsPeriod,
    pub reference: NaiveDate,
    pub series: PeriodBucketSeries,
    pub breakdown: CategoryBreakdown,
    pub expense_count: usize,
}

impl StatisticsReport {
    /// Load the expenses of the window and compute both views
    pub fn generate(
        storage: &Storage,
        taxonomy: &CategoryTaxonomy,
        period: StatsPeriod,
        reference: NaiveDate,
    ) -> ExpenseResult<Self> {
        let (start, end) = period.window(reference);
        let expenses = storage.expenses.get_by_date_range(start, end)?;
        tracing::debug!(%period, %start, %end, count = expenses.len(), "generating statistics");

        let series = bucketize(&expenses, period, reference)?;
        let breakdown = aggregate_by_category(&expenses, &taxonomy.categories());

        Ok(Self {
            period,
            reference,
            series,
            breakdown,
            expense_count: expenses.len(),
        })
    }

    /// Render the histogram and category table; `top` keeps only the largest
    /// categories with spending
    pub fn format_terminal(
        &self,
        taxonomy: &CategoryTaxonomy,
        currency_symbol: &str,
        top: Option<usize>,
    ) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Statistics for {} {} to {}\n",
            self.period, self.series.start, self.series.end
        ));
        output.push_str(&double_separator(64));
        output.push('\n');
        output.push_str(&format!(
            "Total spent: {}  ({} expenses)\n\n",
            self.breakdown.total_used.format_with_symbol(currency_symbol),
            self.expense_count
        ));

        let peak = self.series.peak();
        for (label, amount) in self.series.labels().iter().zip(&self.series.buckets) {
            output.push_str(&format!(
                "{:<5} {:>14} {}\n",
                label,
                amount.format_with_symbol(currency_symbol),
                format_bar(*amount, peak, BAR_WIDTH)
            ));
        }

        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>14} {:>6} {:>7}\n",
            "Category", "Amount", "Count", "Share"
        ));
        output.push_str(&separator(64));
        output.push('\n');

        let entries: Vec<_> = match top {
            Some(limit) => self.breakdown.top(limit),
            None => self.breakdown.categories.iter().collect(),
        };
        for entry in entries {
            output.push_str(&format!(
                "{:<24} {:>14} {:>6} {:>7}\n",
                taxonomy.label(entry.category),
                entry.amount.format_with_symbol(currency_symbol),
                entry.count,
                format_share(entry.share)
            ));
        }

        output
    }

    /// Export buckets and categories as CSV
    ///
    /// Rows are `section,label,amount,count,share`; bucket rows leave count
    /// and share empty.
    pub fn export_csv<W: Write>(&self, writer: W) -> ExpenseResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["section", "label", "amount", "count", "share"])?;

        for (label, amount) in self.series.labels().into_iter().zip(&self.series.buckets) {
            csv.write_record([
                "bucket".to_string(),
                label,
                units(*amount),
                String::new(),
                String::new(),
            ])?;
        }

        for entry in &self.breakdown.categories {
            let key = entry.category.map(|c| c.key()).unwrap_or("none");
            csv.write_record([
                "category".to_string(),
                key.to_string(),
                units(entry.amount),
                entry.count.to_string(),
                format!("{:.1}", entry.share),
            ])?;
        }

        csv.write_record([
            "total".to_string(),
            self.period.name().to_string(),
            units(self.breakdown.total_used),
            self.expense_count.to_string(),
            String::new(),
        ])?;

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
    use crate::models::{Category, Expense};
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

    fn seed(storage: &Storage) {
        let rows = [
            (2000, date(2024, 12, 2), Some(Category::Food)),
            (3000, date(2024, 12, 31), Some(Category::Housing)),
            (5000, date(2024, 12, 15), None),
            // Outside December, must be filtered out before bucketing
            (9999, date(2024, 11, 30), Some(Category::Food)),
        ];
        for (cents, day, category) in rows {
            let mut e = Expense::new(Money::from_cents(cents), day);
            e.category = category;
            storage.expenses.upsert(e).unwrap();
        }
    }

    #[test]
    fn test_generate_month_across_iso_year() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);
        let taxonomy = CategoryTaxonomy::standard();

        let report =
            StatisticsReport::generate(&storage, &taxonomy, StatsPeriod::Month, date(2024, 12, 20))
                .unwrap();

        assert_eq!(report.expense_count, 3);
        assert_eq!(report.series.len(), 6);
        assert_eq!(report.series.total(), Money::from_cents(10000));
        assert_eq!(report.breakdown.total_used, Money::from_cents(10000));
        assert_eq!(report.breakdown.uncategorized().share, 50.0);
        assert_eq!(report.breakdown.get(Category::Food).unwrap().share, 20.0);
    }

    #[test]
    fn test_format_terminal_lists_every_category() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);
        let taxonomy = CategoryTaxonomy::standard();
        let report =
            StatisticsReport::generate(&storage, &taxonomy, StatsPeriod::Month, date(2024, 12, 20))
                .unwrap();

        let text = report.format_terminal(&taxonomy, "$", None);
        assert!(text.contains("Total spent: $100.00"));
        assert!(text.contains("W48"));
        assert!(text.contains("W01"));
        assert!(text.contains("No category"));
        assert!(text.contains("Education"));
    }

    #[test]
    fn test_format_terminal_top_categories() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);
        let taxonomy = CategoryTaxonomy::standard();
        let report =
            StatisticsReport::generate(&storage, &taxonomy, StatsPeriod::Month, date(2024, 12, 20))
                .unwrap();

        let text = report.format_terminal(&taxonomy, "$", Some(2));
        assert!(text.contains("No category"));
        assert!(text.contains("Housing"));
        assert!(!text.contains("Food & Dining"));
        assert!(!text.contains("Education"));
    }

    #[test]
    fn test_export_csv() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);
        let taxonomy = CategoryTaxonomy::standard();
        let report =
            StatisticsReport::generate(&storage, &taxonomy, StatsPeriod::Year, date(2024, 6, 1))
                .unwrap();

        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "section,label,amount,count,share");
        // 12 months, 10 category rows, 1 total
        assert_eq!(lines.len(), 1 + 12 + 10 + 1);
        assert!(lines.contains(&"bucket,Nov,99.99,,"));
        assert!(lines.contains(&"category,none,50.00,1,25.0"));
    }

    #[test]
    fn test_json_output() {
        let (_temp_dir, storage) = create_test_storage();
        let taxonomy = CategoryTaxonomy::standard();
        let report =
            StatisticsReport::generate(&storage, &taxonomy, StatsPeriod::Week, date(2025, 1, 1))
                .unwrap();

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["period"], "week");
        assert_eq!(json["series"]["buckets"].as_array().unwrap().len(), 7);
    }
}
