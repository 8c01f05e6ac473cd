//! Monthly spend aggregation and budget types.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{SpendingError, SpendingService, aggregate_month, month_bounds, parse_month_key};
pub use types::{Budget, BudgetPeriod, BudgetSpending, CategoryLimit, CategorySpend};
