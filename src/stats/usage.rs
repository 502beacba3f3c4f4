//! Budget usage calculator
//!
//! Compares the expenses linked to a budget in the current month against the
//! budget's cap.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Budget, Expense, Money};

/// How close a budget is to its cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageStatus {
    Ok,
    Warning,
    Critical,
}

impl fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Critical => "critical",
        };
        f.pad(s)
    }
}

/// Percent boundaries for [`UsageStatus`]; both are inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageThresholds {
    /// At or below this percentage of the cap the budget is ok
    #[serde(default = "default_ok_up_to")]
    pub ok_up_to_percent: u32,
    /// At or above this percentage of the cap the budget is critical
    #[serde(default = "default_critical_from")]
    pub critical_from_percent: u32,
}

fn default_ok_up_to() -> u32 {
    60
}

fn default_critical_from() -> u32 {
    90
}

impl Default for UsageThresholds {
    fn default() -> Self {
        Self {
            ok_up_to_percent: default_ok_up_to(),
            critical_from_percent: default_critical_from(),
        }
    }
}

impl UsageThresholds {
    pub fn validate(&self) -> Result<(), String> {
        if self.ok_up_to_percent >= self.critical_from_percent {
            return Err(format!(
                "ok threshold ({}%) must be below critical threshold ({}%)",
                self.ok_up_to_percent, self.critical_from_percent
            ));
        }
        Ok(())
    }

    /// Classify `used` against `cap`, `None` when `cap` is not positive
    ///
    /// Compared in integer cents so 900 of 1000 is exactly 90 %.
    pub fn classify(&self, used: Money, cap: Money) -> Option<UsageStatus> {
        if !cap.is_positive() {
            return None;
        }
        let used = used.cents() as i128 * 100;
        let cap = cap.cents() as i128;
        let status = if used >= cap * self.critical_from_percent as i128 {
            UsageStatus::Critical
        } else if used <= cap * self.ok_up_to_percent as i128 {
            UsageStatus::Ok
        } else {
            UsageStatus::Warning
        };
        Some(status)
    }
}

/// Usage of one budget for the current month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetUsage {
    pub cap: Money,
    pub used: Money,
    /// `cap - used`; negative when over budget
    pub remaining: Money,
    /// `used / cap`, absent when the cap is not positive
    pub used_ratio: Option<f64>,
}

impl BudgetUsage {
    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_negative()
    }

    pub fn used_percent(&self) -> Option<f64> {
        self.used_ratio.map(|r| r * 100.0)
    }

    pub fn status(&self, thresholds: &UsageThresholds) -> Option<UsageStatus> {
        thresholds.classify(self.used, self.cap)
    }
}

/// Usage of `budget` given the expenses already filtered to it and to the
/// current calendar month
pub fn usage(budget: &Budget, expenses_in_current_month: &[Expense]) -> BudgetUsage {
    let used: Money = expenses_in_current_month.iter().map(|e| e.amount).sum();
    BudgetUsage {
        cap: budget.cap,
        used,
        remaining: budget.cap - used,
        used_ratio: used.ratio_of(budget.cap),
    }
}
