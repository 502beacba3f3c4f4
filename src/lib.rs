//! expense-stats - expense tracking with period statistics
//!
//! This library provides the statistics core of a personal expense tracker
//! together with the storage, services and CLI glue around it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `stats`: Pure statistics: period bucketizer, category aggregator, budget usage
//! - `models`: Expenses, budgets, categories, money and periods
//! - `storage`: JSON file repositories
//! - `services`: Validation and budget linkage on top of storage
//! - `reports`: Terminal, CSV and JSON renderings of the statistics
//! - `config`: Paths and user settings
//! - `cli`: clap subcommands and their handlers
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use expense_stats::models::{Expense, Money, StatsPeriod};
//! use expense_stats::stats::bucketize;
//!
//! let day = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
//! let expenses = vec![Expense::new(Money::from_units(20, 0), day)];
//! let series = bucketize(&expenses, StatsPeriod::Week, day).unwrap();
//! assert_eq!(series.buckets[2], Money::from_units(20, 0));
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod stats;
pub mod storage;

pub use error::{ExpenseError, ExpenseResult};
