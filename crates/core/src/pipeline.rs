//! The facade consumed by the serving layer.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use bankfeed_shared::types::CustomerId;

use crate::category::{self, CustomCategory};
use crate::provider::BankProvider;
use crate::recurring::{self, RecurringPayment};
use crate::spending::{BudgetSpending, SpendingError, SpendingService, parse_month_key};
use crate::store::{Store, StoreError, TransactionFilter};
use crate::sync::{SyncError, SyncOptions, SyncResult, SyncService};

/// The pipeline contract: sync, spending reads, recurring reads, and
/// classification, over injected provider and store handles.
///
/// The composition root constructs this once with explicitly opened
/// collaborators; there is no process-wide cached client.
pub struct Pipeline<P, S> {
    store: Arc<S>,
    sync: SyncService<P, S>,
    spending: SpendingService<S>,
}

impl<P, S> Pipeline<P, S>
where
    P: BankProvider + 'static,
    S: Store + 'static,
{
    /// Wires the pipeline over a provider client and a store handle.
    #[must_use]
    pub fn new(provider: Arc<P>, store: Arc<S>, options: SyncOptions) -> Self {
        Self {
            sync: SyncService::new(provider, Arc::clone(&store), options),
            spending: SpendingService::new(Arc::clone(&store)),
            store,
        }
    }

    /// Runs a full sync for one customer. See [`SyncService::sync`].
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] only for fatal failures (token exchange,
    /// account listing); partial failures are recorded in the result.
    pub async fn sync(
        &self,
        customer_id: &CustomerId,
        auth_code: &str,
        cancel: &CancellationToken,
    ) -> Result<SyncResult, SyncError> {
        self.sync.sync(customer_id, auth_code, cancel).await
    }

    /// Reads the spending snapshot for a `YYYY-MM` month, recomputing it if
    /// no snapshot exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`SpendingError::InvalidMonthKey`] for a malformed month key,
    /// or a store error.
    pub async fn get_spending(
        &self,
        customer_id: &CustomerId,
        month_key: &str,
    ) -> Result<BudgetSpending, SpendingError> {
        let (year, month) = parse_month_key(month_key)
            .ok_or_else(|| SpendingError::InvalidMonthKey(month_key.to_owned()))?;

        if let Some(snapshot) = self
            .store
            .get_spending_snapshot(customer_id, month_key)
            .await?
        {
            return Ok(snapshot);
        }
        self.spending
            .recalculate_month(customer_id, year, month)
            .await
    }

    /// Detects the customer's recurring payments from stored transactions.
    ///
    /// # Errors
    ///
    /// Returns a store error if the transaction query fails.
    pub async fn get_recurring_payments(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<RecurringPayment>, StoreError> {
        let transactions = self
            .store
            .query_transactions(customer_id, TransactionFilter::default().expenses_only())
            .await?;
        let custom = self.store.list_custom_categories(customer_id).await?;
        Ok(recurring::detect(&transactions, &custom))
    }

    /// Classifies a narration. Total; never fails.
    #[must_use]
    pub fn categorize(&self, narration: &str, custom_categories: &[CustomCategory]) -> String {
        category::categorize(narration, custom_categories)
    }
}
