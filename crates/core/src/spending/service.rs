//! Idempotent monthly spend recomputation.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use bankfeed_shared::types::CustomerId;

use super::types::{BudgetSpending, CategorySpend};
use crate::category::{self, CustomCategory};
use crate::model::Transaction;
use crate::store::{Store, StoreError, TransactionFilter};

/// Errors surfaced by spend aggregation.
#[derive(Debug, thiserror::Error)]
pub enum SpendingError {
    /// The requested month does not exist on the calendar.
    #[error("invalid month: {year:04}-{month:02}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// The month key was not of the form `YYYY-MM`.
    #[error("invalid month key: {0:?}")]
    InvalidMonthKey(String),

    /// The store collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The inclusive first and last day of a month, or `None` for an impossible
/// month.
#[must_use]
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

/// Parses a `YYYY-MM` month key.
#[must_use]
pub fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (year, month) = key.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    Some((year.parse().ok()?, month.parse().ok()?))
}

/// Computes the spend snapshot for one month from stored transactions.
///
/// Pure: takes whatever the store returned, drops non-expenses and anything
/// outside the month, re-sorts by booked date (provider-cursor insertion
/// order is meaningless), and accumulates absolute decimal values per
/// category. Output category order is sorted by key so that recomputation of
/// identical data is byte-identical.
#[must_use]
pub fn aggregate_month(
    customer_id: &CustomerId,
    year: i32,
    month: u32,
    transactions: &[Transaction],
    custom_categories: &[CustomCategory],
) -> BudgetSpending {
    let month_key = format!("{year:04}-{month:02}");
    let bounds = month_bounds(year, month);

    let mut expenses: Vec<&Transaction> = transactions
        .iter()
        .filter(|txn| txn.amount.is_expense())
        .filter(|txn| {
            bounds.is_none_or(|(first, last)| {
                txn.booked_date >= first && txn.booked_date <= last
            })
        })
        .collect();
    expenses.sort_by(|a, b| {
        a.booked_date
            .cmp(&b.booked_date)
            .then_with(|| a.dedup_key.cmp(&b.dedup_key))
    });

    let mut total_spent = Decimal::ZERO;
    let mut per_category: BTreeMap<String, Decimal> = BTreeMap::new();
    for txn in expenses {
        let amount = txn.amount.abs().value();
        total_spent += amount;
        let key = category::categorize(&txn.narration, custom_categories);
        *per_category.entry(key).or_insert(Decimal::ZERO) += amount;
    }

    BudgetSpending {
        customer_id: customer_id.clone(),
        month: month_key,
        total_spent,
        category_spending: per_category
            .into_iter()
            .map(|(category, amount)| CategorySpend { category, amount })
            .collect(),
    }
}

/// Recomputes and persists spending snapshots.
pub struct SpendingService<S> {
    store: Arc<S>,
}

impl<S> SpendingService<S>
where
    S: Store,
{
    /// Creates the service over a store handle.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Recomputes the snapshot for `(customer, year, month)` and replaces any
    /// prior snapshot for that key.
    ///
    /// A full recompute rather than an incremental accumulation: repeated
    /// syncs of the same period therefore cannot drift the totals.
    ///
    /// # Errors
    ///
    /// Returns [`SpendingError::InvalidMonth`] for an impossible month, or a
    /// store error if the query or replace fails.
    pub async fn recalculate_month(
        &self,
        customer_id: &CustomerId,
        year: i32,
        month: u32,
    ) -> Result<BudgetSpending, SpendingError> {
        let (first, last) =
            month_bounds(year, month).ok_or(SpendingError::InvalidMonth { year, month })?;

        let transactions = self
            .store
            .query_transactions(
                customer_id,
                TransactionFilter::date_range(first, last).expenses_only(),
            )
            .await?;
        let custom_categories = self.store.list_custom_categories(customer_id).await?;

        let snapshot =
            aggregate_month(customer_id, year, month, &transactions, &custom_categories);
        debug!(
            customer_id = %customer_id,
            month = %snapshot.month,
            total_spent = %snapshot.total_spent,
            categories = snapshot.category_spending.len(),
            "recomputed spending snapshot"
        );

        self.store
            .replace_spending_snapshot(customer_id, &snapshot.month, snapshot.clone())
            .await?;

        Ok(snapshot)
    }
}
