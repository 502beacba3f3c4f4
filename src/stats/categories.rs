//! Category aggregator
//!
//! Sums expenses per category and computes each category's share of the total.

use serde::Serialize;

use crate::models::{Category, Expense, Money};

/// Spending for one category, or for uncategorized expenses when `category` is `None`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub category: Option<Category>,
    pub amount: Money,
    /// Number of expenses counted in this entry
    pub count: usize,
    /// Percentage of the total, rounded half-up to one decimal place
    pub share: f64,
}

impl CategoryAggregate {
    fn seed(category: Option<Category>) -> Self {
        Self {
            category,
            amount: Money::zero(),
            count: 0,
            share: 0.0,
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.is_none()
    }
}

/// Result of aggregating a set of expenses by category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub total_used: Money,
    /// Known categories in the order given, then the "no category" entry
    pub categories: Vec<CategoryAggregate>,
}

impl CategoryBreakdown {
    /// The trailing "no category" entry
    pub fn uncategorized(&self) -> &CategoryAggregate {
        // Always seeded last by `aggregate_by_category`
        &self.categories[self.categories.len() - 1]
    }

    pub fn get(&self, category: Category) -> Option<&CategoryAggregate> {
        self.categories
            .iter()
            .find(|c| c.category == Some(category))
    }

    /// Entries with spending, largest first; ties keep seed order
    pub fn top(&self, limit: usize) -> Vec<&CategoryAggregate> {
        let mut spent: Vec<_> = self
            .categories
            .iter()
            .filter(|c| !c.amount.is_zero())
            .collect();
        spent.sort_by(|a, b| b.amount.cmp(&a.amount));
        spent.into_iter().take(limit).collect()
    }
}

/// Aggregate `expenses` over `known_categories`
///
/// Expenses without a category, or with one missing from `known_categories`,
/// are counted in the "no category" entry so the amounts always add up to the
/// input total.
pub fn aggregate_by_category(
    expenses: &[Expense],
    known_categories: &[Category],
) -> CategoryBreakdown {
    let mut categories: Vec<CategoryAggregate> = known_categories
        .iter()
        .map(|&c| CategoryAggregate::seed(Some(c)))
        .collect();
    categories.push(CategoryAggregate::seed(None));
    let uncategorized = categories.len() - 1;

    for expense in expenses {
        let slot = expense
            .category
            .and_then(|c| known_categories.iter().position(|&k| k == c))
            .unwrap_or(uncategorized);
        categories[slot].amount += expense.amount;
        categories[slot].count += 1;
    }

    let total_used: Money = categories.iter().map(|c| c.amount).sum();
    for entry in &mut categories {
        entry.share = share_percent(entry.amount, total_used);
    }

    CategoryBreakdown {
        total_used,
        categories,
    }
}

/// `amount / total * 100` rounded half-up to one decimal
///
/// Done in integer tenths of a percent so 12.25 % rounds to 12.3 rather than
/// whatever the nearest double happens to be. A zero amount short-circuits
/// before the division, which also covers a zero total.
pub fn share_percent(amount: Money, total: Money) -> f64 {
    if amount.is_zero() || !total.is_positive() {
        return 0.0;
    }
    let amount = amount.cents() as i128;
    let total = total.cents() as i128;
    let tenths = (amount * 2000 + total).div_euclid(2 * total);
    tenths as f64 / 10.0
}
