//! Period bucketizer
//!
//! Splits the expenses of a week, month or year into a histogram:
//!
//! - week: 7 daily buckets, Monday first
//! - month: one bucket per ISO week touched by the calendar month
//! - year: 12 monthly buckets
//!
//! Month buckets follow ISO-8601 week numbering. A month can start in the last
//! ISO week of the previous ISO year (January 2021 starts in 2020-W53) or end in
//! week 1 of the next one (December 2024 ends in 2025-W01), so week offsets are
//! corrected by the length of the ISO year when the numbering wraps.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::period::week_start;
use crate::models::{Expense, Money, StatsPeriod};

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Ordered per-bucket sums for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucketSeries {
    pub period: StatsPeriod,
    /// First day of the window the series covers
    pub start: NaiveDate,
    /// Last day of the window (inclusive)
    pub end: NaiveDate,
    pub buckets: Vec<Money>,
}

impl PeriodBucketSeries {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> Money {
        self.buckets.iter().sum()
    }

    /// Largest single bucket, zero for an empty period
    pub fn peak(&self) -> Money {
        self.buckets.iter().copied().max().unwrap_or_default()
    }

    /// Human readable label for each bucket ("Mon", "W49", "Jan", ...)
    pub fn labels(&self) -> Vec<String> {
        match self.period {
            StatsPeriod::Week => WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect(),
            StatsPeriod::Year => MONTH_LABELS.iter().map(|s| s.to_string()).collect(),
            StatsPeriod::Month => {
                let first_monday = week_start(self.start);
                (0..self.buckets.len())
                    .map(|i| {
                        let monday = first_monday + Duration::weeks(i as i64);
                        format!("W{:02}", monday.iso_week().week())
                    })
                    .collect()
            }
        }
    }
}

/// Number of ISO weeks in the ISO year `iso_year` (52 or 53)
///
/// December 28th always falls in the last ISO week of its year.
pub fn iso_weeks_in_year(iso_year: i32) -> u32 {
    NaiveDate::from_ymd_opt(iso_year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52)
}

/// ISO week offset of `date` relative to `anchor` (anchor's week = 0)
///
/// When `date` lies in a later ISO year than `anchor` the week number has
/// wrapped, so the anchor year's week count is added back.
fn iso_week_offset(anchor: NaiveDate, date: NaiveDate) -> i64 {
    let from = anchor.iso_week();
    let to = date.iso_week();
    let mut offset = to.week() as i64 - from.week() as i64;
    if to.year() > from.year() {
        offset += iso_weeks_in_year(from.year()) as i64;
    } else if to.year() < from.year() {
        offset -= iso_weeks_in_year(to.year()) as i64;
    }
    offset
}

/// Number of buckets for `period` around `reference`
pub fn bucket_count(period: StatsPeriod, reference: NaiveDate) -> usize {
    match period {
        StatsPeriod::Week => 7,
        StatsPeriod::Year => 12,
        StatsPeriod::Month => {
            let (first, last) = period.window(reference);
            (iso_week_offset(first, last) + 1) as usize
        }
    }
}

/// Bucket index of `date` within the `period` window around `reference`
///
/// Dates outside the window are a caller error: the upstream date filter did
/// not match the window assumed here.
pub fn bucket_index(
    period: StatsPeriod,
    reference: NaiveDate,
    date: NaiveDate,
) -> ExpenseResult<usize> {
    let (start, end) = period.window(reference);
    if date < start || date > end {
        return Err(ExpenseError::OutsidePeriod {
            date,
            period: period.name(),
            start,
            end,
        });
    }

    let index = match period {
        // Sunday = 0 in this numbering, shifted so Monday lands on 0
        StatsPeriod::Week => ((date.weekday().num_days_from_sunday() + 6) % 7) as i64,
        StatsPeriod::Month => iso_week_offset(start, date),
        StatsPeriod::Year => date.month0() as i64,
    };

    let bucket_count = bucket_count(period, reference);
    debug_assert!(
        index >= 0 && (index as usize) < bucket_count,
        "in-window date {} mapped to bucket {} of {}",
        date,
        index,
        bucket_count
    );
    if index < 0 || index as usize >= bucket_count {
        return Err(ExpenseError::BucketOutOfRange {
            index,
            bucket_count,
            date,
        });
    }
    Ok(index as usize)
}

/// Sum `expenses` into the buckets of `period` around `reference`
///
/// Fails on the first expense that does not belong to the window; nothing is
/// clamped or silently dropped.
pub fn bucketize(
    expenses: &[Expense],
    period: StatsPeriod,
    reference: NaiveDate,
) -> ExpenseResult<PeriodBucketSeries> {
    let (start, end) = period.window(reference);
    let mut buckets = vec![Money::zero(); bucket_count(period, reference)];

    for expense in expenses {
        let index = bucket_index(period, reference, expense.expense_date)?;
        buckets[index] += expense.amount;
    }

    Ok(PeriodBucketSeries {
        period,
        start,
        end,
        buckets,
    })
}
