//! Expense and budget tables

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Budget, CategoryTaxonomy, Expense};
use crate::storage::ExpensePage;

use super::report::truncate;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Monthly cap")]
    cap: String,
}

/// Render one page of expenses; `budgets` resolves budget names
pub fn format_expense_page(
    page: &ExpensePage,
    budgets: &[Budget],
    taxonomy: &CategoryTaxonomy,
    currency_symbol: &str,
    date_format: &str,
) -> String {
    if page.items.is_empty() {
        return "No expenses found.".to_string();
    }

    let rows: Vec<ExpenseRow> = page
        .items
        .iter()
        .map(|e| expense_row(e, budgets, taxonomy, currency_symbol, date_format))
        .collect();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push_str(&format!(
        "\nPage {} of {} ({} expenses)",
        page.page,
        page.page_count(),
        page.total
    ));
    output
}

fn expense_row(
    expense: &Expense,
    budgets: &[Budget],
    taxonomy: &CategoryTaxonomy,
    currency_symbol: &str,
    date_format: &str,
) -> ExpenseRow {
    let budget = expense
        .budget_id
        .and_then(|id| budgets.iter().find(|b| b.id == id))
        .map(|b| b.name.clone())
        .unwrap_or_default();

    ExpenseRow {
        id: expense.id.short(),
        date: expense.expense_date.format(date_format).to_string(),
        amount: expense.amount.format_with_symbol(currency_symbol),
        category: taxonomy.label(expense.category).to_string(),
        budget,
        description: truncate(&expense.description, 40),
    }
}

pub fn format_budget_list(budgets: &[Budget], currency_symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets yet. Create one with 'expense-stats budget create'.".to_string();
    }

    let rows: Vec<BudgetRow> = budgets
        .iter()
        .map(|b| BudgetRow {
            id: b.id.short(),
            name: b.name.clone(),
            cap: b.cap.format_with_symbol(currency_symbol),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_expense_page_table() {
        let budget = Budget::new("Food", Money::from_units(100, 0));
        let expense = Expense::new(
            Money::from_cents(1234),
            NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
        )
        .with_category(Category::Food)
        .with_budget(budget.id)
        .with_description("Groceries");

        let page = ExpensePage {
            items: vec![expense],
            total: 1,
            page: 1,
            per_page: 20,
        };
        let output = format_expense_page(
            &page,
            &[budget],
            &CategoryTaxonomy::standard(),
            "€",
            "%d.%m.%Y",
        );
        assert!(output.contains("€12.34"));
        assert!(output.contains("09.01.2025"));
        assert!(output.contains("Food & Dining"));
        assert!(output.contains("Page 1 of 1"));
    }

    #[test]
    fn test_empty_page() {
        let page = ExpensePage {
            items: Vec::new(),
            total: 0,
            page: 1,
            per_page: 20,
        };
        let output = format_expense_page(&page, &[], &CategoryTaxonomy::standard(), "$", "%Y");
        assert_eq!(output, "No expenses found.");
    }
}
