//! Pure statistics over in-memory expenses
//!
//! Nothing in this module touches storage. Callers fetch and filter expenses
//! first, then hand plain slices to these functions.

pub mod buckets;
pub mod categories;
pub mod usage;

pub use buckets::{bucket_count, bucket_index, bucketize, PeriodBucketSeries};
pub use categories::{aggregate_by_category, CategoryAggregate, CategoryBreakdown};
pub use usage::{usage, BudgetUsage, UsageStatus, UsageThresholds};
