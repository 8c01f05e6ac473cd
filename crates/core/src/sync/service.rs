//! The sync orchestrator.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use bankfeed_shared::types::{AccountUniqueId, CustomerId, ProviderAccountId};

use super::error::SyncError;
use super::types::{SyncFailure, SyncOptions, SyncResult, SyncStage};
use crate::provider::{AccessToken, BankProvider};
use crate::recurring;
use crate::spending::SpendingService;
use crate::store::{Store, TransactionFilter};

/// Drives one customer's sync: token exchange, account ingestion, bounded
/// concurrent transaction pagination, and the post-ingest derivation passes.
///
/// Concurrent re-entrant syncs for the *same* customer must be serialized by
/// the caller; the orchestrator does not provide cross-call mutual
/// exclusion.
pub struct SyncService<P, S> {
    provider: Arc<P>,
    store: Arc<S>,
    spending: SpendingService<S>,
    options: SyncOptions,
}

/// Per-account ingestion outcome, merged into the overall result.
#[derive(Debug, Default)]
struct AccountIngest {
    imported: u64,
    skipped: u64,
    /// `(year, month)` pairs touched by imported transactions.
    months: BTreeSet<(i32, u32)>,
    failure: Option<SyncFailure>,
}

impl<P, S> SyncService<P, S>
where
    P: BankProvider + 'static,
    S: Store + 'static,
{
    /// Creates the orchestrator over injected collaborator handles.
    #[must_use]
    pub fn new(provider: Arc<P>, store: Arc<S>, options: SyncOptions) -> Self {
        let spending = SpendingService::new(Arc::clone(&store));
        Self {
            provider,
            store,
            spending,
            options,
        }
    }

    /// Runs a full sync for one customer.
    ///
    /// Fatal only when the token exchange or the account listing fails; all
    /// per-account and per-record failures are isolated into the returned
    /// [`SyncResult`]. Running twice against identical provider data stores
    /// no duplicates and produces identical aggregates.
    ///
    /// On cancellation, in-flight page fetches complete (an account is never
    /// left half-paginated mid-page) but no new account workers start and no
    /// further pages are requested.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::AuthExchange`] if the provider rejects the
    /// authorization code, [`SyncError::AccountList`] if the account list
    /// cannot be fetched.
    pub async fn sync(
        &self,
        customer_id: &CustomerId,
        auth_code: &str,
        cancel: &CancellationToken,
    ) -> Result<SyncResult, SyncError> {
        // 1. Token exchange. Nothing is meaningful without a token.
        let token = self
            .provider
            .exchange_token(auth_code)
            .await
            .map_err(SyncError::AuthExchange)?;

        // 2. Account list, then balance/identity upserts. These happen before
        //    any transaction fetch so a failed account still has fresh
        //    balances.
        let provider_accounts = self
            .provider
            .list_accounts(&token)
            .await
            .map_err(SyncError::AccountList)?;
        info!(
            customer_id = %customer_id,
            accounts = provider_accounts.len(),
            "starting sync"
        );

        let mut result = SyncResult::default();
        let refreshed_at = Utc::now();
        let mut account_keys: Vec<(ProviderAccountId, AccountUniqueId)> = Vec::new();
        for provider_account in provider_accounts {
            let account = provider_account.into_account(customer_id, refreshed_at);
            let keys = (account.provider_id.clone(), account.unique_id.clone());
            match self.store.upsert_account(account).await {
                Ok(()) => result.accounts_imported += 1,
                Err(error) => {
                    warn!(
                        account_unique_id = %keys.1,
                        %error,
                        "account upsert failed, skipping record"
                    );
                    result.skipped_records += 1;
                }
            }
            account_keys.push(keys);
        }

        // 3. Per-account transaction pagination, fanned out across a bounded
        //    worker pool.
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent_accounts.max(1)));
        let mut workers: JoinSet<AccountIngest> = JoinSet::new();
        for (provider_account_id, account_unique_id) in account_keys {
            let provider = Arc::clone(&self.provider);
            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);
            let token = token.clone();
            let customer_id = customer_id.clone();
            let cancel = cancel.clone();
            workers.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    // The semaphore is never closed while workers run.
                    return AccountIngest::default();
                };
                if cancel.is_cancelled() {
                    debug!(account_unique_id = %account_unique_id, "cancelled before start");
                    return AccountIngest::default();
                }
                ingest_account(
                    provider.as_ref(),
                    store.as_ref(),
                    &token,
                    &customer_id,
                    &provider_account_id,
                    &account_unique_id,
                    &cancel,
                )
                .await
            });
        }

        let mut touched_months: BTreeSet<(i32, u32)> = BTreeSet::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(ingest) => {
                    result.transactions_imported += ingest.imported;
                    result.skipped_records += ingest.skipped;
                    touched_months.extend(ingest.months);
                    if let Some(failure) = ingest.failure {
                        result.per_account_errors.push(failure);
                    }
                }
                Err(error) => {
                    result.per_account_errors.push(SyncFailure {
                        account_unique_id: None,
                        stage: SyncStage::Transactions,
                        message: format!("account worker failed: {error}"),
                    });
                }
            }
        }
        // Worker completion order is nondeterministic; keep the error list
        // stable for callers and tests.
        result
            .per_account_errors
            .sort_by(|a, b| a.account_unique_id.cmp(&b.account_unique_id));

        // 4. Derivation passes. These must complete before the caller's next
        //    read, so they run inside the sync rather than being detached.
        self.refresh_derived(customer_id, &touched_months, &mut result)
            .await;

        info!(
            customer_id = %customer_id,
            accounts_imported = result.accounts_imported,
            transactions_imported = result.transactions_imported,
            skipped_records = result.skipped_records,
            failures = result.per_account_errors.len(),
            "sync finished"
        );
        Ok(result)
    }

    /// Recomputes spending snapshots for every touched month and runs a
    /// recurring-payment pass. Failures degrade to recorded warnings;
    /// ingestion has already succeeded.
    async fn refresh_derived(
        &self,
        customer_id: &CustomerId,
        touched_months: &BTreeSet<(i32, u32)>,
        result: &mut SyncResult,
    ) {
        for (year, month) in touched_months {
            if let Err(error) = self
                .spending
                .recalculate_month(customer_id, *year, *month)
                .await
            {
                warn!(customer_id = %customer_id, year, month, %error, "snapshot recompute failed");
                result.per_account_errors.push(SyncFailure {
                    account_unique_id: None,
                    stage: SyncStage::Aggregation,
                    message: format!("{year:04}-{month:02}: {error}"),
                });
            }
        }

        match self
            .store
            .query_transactions(customer_id, TransactionFilter::default().expenses_only())
            .await
        {
            Ok(transactions) => {
                let custom = self
                    .store
                    .list_custom_categories(customer_id)
                    .await
                    .unwrap_or_default();
                // Deliberately stateless: results are not persisted. Reads
                // recompute from stored transactions, so this pass only
                // validates the data and surfaces query failures early.
                let payments = recurring::detect(&transactions, &custom);
                debug!(
                    customer_id = %customer_id,
                    patterns = payments.len(),
                    "recurring pass complete"
                );
            }
            Err(error) => {
                warn!(customer_id = %customer_id, %error, "recurring pass failed");
                result.per_account_errors.push(SyncFailure {
                    account_unique_id: None,
                    stage: SyncStage::Detection,
                    message: error.to_string(),
                });
            }
        }
    }
}

/// Sequentially paginates one account's transactions and upserts each record
/// by dedup key.
///
/// Pagination is the only mandatory suspension point in a worker: each page
/// request depends on the previous page's cursor.
async fn ingest_account<P, S>(
    provider: &P,
    store: &S,
    token: &AccessToken,
    customer_id: &CustomerId,
    provider_account_id: &ProviderAccountId,
    account_unique_id: &AccountUniqueId,
    cancel: &CancellationToken,
) -> AccountIngest
where
    P: BankProvider,
    S: Store,
{
    let mut ingest = AccountIngest::default();
    let mut page_token: Option<String> = None;

    loop {
        if cancel.is_cancelled() {
            debug!(account_unique_id = %account_unique_id, "cancelled, no further pages");
            break;
        }

        let page = match provider
            .list_transactions(token, provider_account_id, page_token.as_deref())
            .await
        {
            Ok(page) => page,
            Err(error) => {
                // Isolated: sibling accounts keep syncing, and this account
                // keeps the balances stored in step 2.
                warn!(account_unique_id = %account_unique_id, %error, "transaction fetch failed");
                ingest.failure = Some(SyncFailure {
                    account_unique_id: Some(account_unique_id.clone()),
                    stage: SyncStage::Transactions,
                    message: error.to_string(),
                });
                break;
            }
        };

        for record in page.items {
            let transaction = record.into_transaction(account_unique_id, customer_id);
            let month = (
                transaction.booked_date.year(),
                transaction.booked_date.month(),
            );
            match store.upsert_transaction(transaction).await {
                Ok(()) => {
                    ingest.imported += 1;
                    ingest.months.insert(month);
                }
                Err(error) => {
                    warn!(account_unique_id = %account_unique_id, %error, "transaction upsert failed, skipping");
                    ingest.skipped += 1;
                }
            }
        }

        match page.next_page_token {
            Some(next) => page_token = Some(next),
            None => break,
        }
    }

    ingest
}
