//! The `Store` collaborator contract.
//!
//! The store is the only shared mutable resource in the pipeline. All writes
//! are upserts keyed by deterministic identity (account `provider_id`,
//! transaction dedup key), so concurrent workers writing disjoint accounts
//! never contend on the same logical key; the store only has to provide an
//! atomic per-key upsert primitive. The reference in-memory implementation
//! lives in `bankfeed-store`.

use async_trait::async_trait;
use chrono::NaiveDate;

use bankfeed_shared::types::{AccountUniqueId, CustomerId};

use crate::category::CustomCategory;
use crate::model::{Account, Transaction};
use crate::spending::BudgetSpending;

/// Errors surfaced by the store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write failed. Recoverable per record: the batch skips it.
    #[error("store write failed: {0}")]
    Write(String),

    /// A query failed.
    #[error("store query failed: {0}")]
    Query(String),
}

/// Filter for transaction queries.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Restrict to one account, by stable unique ID.
    pub account_unique_id: Option<AccountUniqueId>,
    /// Inclusive lower bound on booked date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on booked date.
    pub to: Option<NaiveDate>,
    /// Keep only expenses (negative signed amounts).
    pub expenses_only: bool,
}

impl TransactionFilter {
    /// Filter covering an inclusive booked-date window.
    #[must_use]
    pub fn date_range(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    /// Keep only expenses.
    #[must_use]
    pub fn expenses_only(mut self) -> Self {
        self.expenses_only = true;
        self
    }

    /// Returns true if the transaction passes this filter.
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(account) = &self.account_unique_id {
            if &transaction.account_unique_id != account {
                return false;
            }
        }
        if let Some(from) = self.from {
            if transaction.booked_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if transaction.booked_date > to {
                return false;
            }
        }
        if self.expenses_only && !transaction.amount.is_expense() {
            return false;
        }
        true
    }
}

/// Durable upsert/query collaborator consumed by the pipeline.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts or replaces an account, keyed by `provider_id`. On replace,
    /// only the fields enumerated by [`crate::model::AccountUpdate`] change;
    /// identity fields are preserved.
    async fn upsert_account(&self, account: Account) -> Result<(), StoreError>;

    /// Inserts or replaces a transaction, keyed by its dedup key. Must be
    /// atomic per key.
    async fn upsert_transaction(&self, transaction: Transaction) -> Result<(), StoreError>;

    /// Queries a customer's transactions. Result order is unspecified beyond
    /// being deterministic; callers re-sort by booked date.
    async fn query_transactions(
        &self,
        customer_id: &CustomerId,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Replaces the spending snapshot for `(customer, month)`. The snapshot
    /// is a derived artifact; replacing wholesale (rather than accumulating)
    /// is what keeps repeated recomputation drift-free.
    async fn replace_spending_snapshot(
        &self,
        customer_id: &CustomerId,
        month: &str,
        snapshot: BudgetSpending,
    ) -> Result<(), StoreError>;

    /// Reads the spending snapshot for `(customer, month)`, if one exists.
    async fn get_spending_snapshot(
        &self,
        customer_id: &CustomerId,
        month: &str,
    ) -> Result<Option<BudgetSpending>, StoreError>;

    /// Lists the customer's custom categories, in creation order.
    async fn list_custom_categories(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<CustomCategory>, StoreError>;
}
