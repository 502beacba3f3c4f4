//! Statistics periods
//!
//! A period plus a reference date determines the calendar window that
//! statistics are computed over: the ISO week (Monday to Sunday), the calendar
//! month, or the calendar year containing the reference date.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExpenseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Week,
    #[default]
    Month,
    Year,
}

impl StatsPeriod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Inclusive calendar window containing `reference`
    pub fn window(&self, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Week => {
                let start = week_start(reference);
                (start, start + Duration::days(6))
            }
            Self::Month => (month_start(reference), month_end(reference)),
            Self::Year => (
                reference.with_ordinal(1).unwrap_or(reference),
                NaiveDate::from_ymd_opt(reference.year(), 12, 31).unwrap_or(reference),
            ),
        }
    }
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for StatsPeriod {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "weekly" | "w" => Ok(Self::Week),
            "month" | "monthly" | "m" => Ok(Self::Month),
            "year" | "yearly" | "y" => Ok(Self::Year),
            _ => Err(ExpenseError::InvalidPeriod(s.to_string())),
        }
    }
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the calendar month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the calendar month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|next| next - Duration::days(1))
        .unwrap_or(date)
}
