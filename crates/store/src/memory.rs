//! In-memory store backed by sharded concurrent maps.
//!
//! Every write is an upsert keyed by deterministic identity, and `DashMap`
//! gives an atomic per-key entry API, so concurrent sync workers never need
//! an outer lock.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use bankfeed_core::category::CustomCategory;
use bankfeed_core::model::{Account, Transaction};
use bankfeed_core::spending::BudgetSpending;
use bankfeed_core::store::{Store, StoreError, TransactionFilter};
use bankfeed_shared::types::{CustomerId, DedupKey, ProviderAccountId};

/// Concurrent in-memory store.
///
/// Suitable for the sync daemon's single-process deployments and as the
/// reference implementation the contract tests run against.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: DashMap<ProviderAccountId, Account>,
    transactions: DashMap<DedupKey, Transaction>,
    snapshots: DashMap<(CustomerId, String), BudgetSpending>,
    custom_categories: DashMap<CustomerId, Vec<CustomCategory>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a customer's custom categories.
    ///
    /// Categories are managed out-of-band from the sync pipeline, which only
    /// reads them; this is the corresponding write path.
    pub fn put_custom_categories(
        &self,
        customer_id: &CustomerId,
        categories: Vec<CustomCategory>,
    ) {
        self.custom_categories
            .insert(customer_id.clone(), categories);
    }

    /// Number of stored accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of stored transactions.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_account(&self, account: Account) -> Result<(), StoreError> {
        match self.accounts.entry(account.provider_id.clone()) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().apply_update(account.as_update());
            }
            Entry::Vacant(vacant) => {
                debug!(unique_id = %account.unique_id, "new account");
                vacant.insert(account);
            }
        }
        Ok(())
    }

    async fn upsert_transaction(&self, transaction: Transaction) -> Result<(), StoreError> {
        self.transactions
            .insert(transaction.dedup_key.clone(), transaction);
        Ok(())
    }

    async fn query_transactions(
        &self,
        customer_id: &CustomerId,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut matches: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|entry| &entry.customer_id == customer_id && filter.matches(entry))
            .map(|entry| entry.clone())
            .collect();
        // DashMap iteration order is arbitrary; the contract promises a
        // deterministic order.
        matches.sort_by(|a, b| {
            a.booked_date
                .cmp(&b.booked_date)
                .then_with(|| a.dedup_key.cmp(&b.dedup_key))
        });
        Ok(matches)
    }

    async fn replace_spending_snapshot(
        &self,
        customer_id: &CustomerId,
        month: &str,
        snapshot: BudgetSpending,
    ) -> Result<(), StoreError> {
        self.snapshots
            .insert((customer_id.clone(), month.to_owned()), snapshot);
        Ok(())
    }

    async fn get_spending_snapshot(
        &self,
        customer_id: &CustomerId,
        month: &str,
    ) -> Result<Option<BudgetSpending>, StoreError> {
        Ok(self
            .snapshots
            .get(&(customer_id.clone(), month.to_owned()))
            .map(|entry| entry.clone()))
    }

    async fn list_custom_categories(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<CustomCategory>, StoreError> {
        Ok(self
            .custom_categories
            .get(customer_id)
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use bankfeed_core::identity;
    use bankfeed_core::model::TransactionStatus;
    use bankfeed_shared::Money;
    use bankfeed_shared::types::{AccountUniqueId, ProviderTransactionId};

    use super::*;

    fn customer() -> CustomerId {
        CustomerId::new("cust-1")
    }

    fn account(provider_id: &str, account_number: &str) -> Account {
        Account {
            provider_id: ProviderAccountId::new(provider_id),
            unique_id: identity::account_unique_id("ing", "12-34-56", account_number),
            customer_id: customer(),
            name: "Current Account".to_owned(),
            account_type: "CHECKING".to_owned(),
            booked: Money::new(1_000_00, 2, "GBP"),
            available: Money::new(900_00, 2, "GBP"),
            identifiers: serde_json::Value::Null,
            last_refreshed: Utc::now(),
            financial_institution_id: "ing".to_owned(),
            customer_segment: None,
        }
    }

    fn transaction(provider_id: &str, unscaled: i64, day: u32) -> Transaction {
        let account_unique_id: AccountUniqueId =
            identity::account_unique_id("ing", "12-34-56", "11112222");
        let provider_txn_id = ProviderTransactionId::new(provider_id);
        let dedup_key = identity::transaction_dedup_key(&provider_txn_id, &account_unique_id);
        Transaction {
            provider_id: provider_txn_id,
            account_unique_id,
            customer_id: customer(),
            amount: Money::new(unscaled, 2, "GBP"),
            narration: "TESCO STORES 3214".to_owned(),
            normalized_narration: "tesco stores".to_owned(),
            booked_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            identifiers: serde_json::Value::Null,
            types: vec![],
            status: TransactionStatus::Booked,
            provider_mutability: "IMMUTABLE".to_owned(),
            dedup_key,
        }
    }

    #[tokio::test]
    async fn account_upsert_preserves_identity_fields() {
        let store = MemoryStore::new();
        let original = account("prov-1", "11112222");
        let original_unique_id = original.unique_id.clone();
        store.upsert_account(original).await.unwrap();

        let mut refreshed = account("prov-1", "99999999");
        refreshed.booked = Money::new(500_00, 2, "GBP");
        refreshed.name = "Renamed Account".to_owned();
        store.upsert_account(refreshed).await.unwrap();

        assert_eq!(store.account_count(), 1);
        let stored = store
            .accounts
            .get(&ProviderAccountId::new("prov-1"))
            .unwrap();
        // Balance and name moved, the stable unique ID did not.
        assert_eq!(stored.booked, Money::new(500_00, 2, "GBP"));
        assert_eq!(stored.name, "Renamed Account");
        assert_eq!(stored.unique_id, original_unique_id);
    }

    #[tokio::test]
    async fn transaction_upsert_deduplicates_by_key() {
        let store = MemoryStore::new();
        store
            .upsert_transaction(transaction("t1", -12_50, 3))
            .await
            .unwrap();

        let mut settled = transaction("t1", -12_50, 3);
        settled.status = TransactionStatus::Booked;
        store.upsert_transaction(settled).await.unwrap();
        store
            .upsert_transaction(transaction("t2", -9_99, 5))
            .await
            .unwrap();

        assert_eq!(store.transaction_count(), 2);
    }

    #[tokio::test]
    async fn query_order_is_deterministic() {
        let store = MemoryStore::new();
        store
            .upsert_transaction(transaction("b", -9_99, 5))
            .await
            .unwrap();
        store
            .upsert_transaction(transaction("a", -12_50, 3))
            .await
            .unwrap();
        store
            .upsert_transaction(transaction("c", 100_00, 4))
            .await
            .unwrap();

        let all = store
            .query_transactions(&customer(), TransactionFilter::default())
            .await
            .unwrap();
        let days: Vec<u32> = all
            .iter()
            .map(|txn| chrono::Datelike::day(&txn.booked_date))
            .collect();
        assert_eq!(days, vec![3, 4, 5]);

        let expenses = store
            .query_transactions(&customer(), TransactionFilter::default().expenses_only())
            .await
            .unwrap();
        assert_eq!(expenses.len(), 2);
    }

    #[tokio::test]
    async fn query_is_scoped_to_the_customer() {
        let store = MemoryStore::new();
        store
            .upsert_transaction(transaction("t1", -12_50, 3))
            .await
            .unwrap();
        let mut foreign = transaction("t2", -9_99, 5);
        foreign.customer_id = CustomerId::new("cust-2");
        store.upsert_transaction(foreign).await.unwrap();

        let visible = store
            .query_transactions(&customer(), TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(visible.len(), 1);
    }

    #[tokio::test]
    async fn date_range_filter_is_inclusive() {
        let store = MemoryStore::new();
        for (id, day) in [("t1", 3), ("t2", 10), ("t3", 20)] {
            store
                .upsert_transaction(transaction(id, -10_00, day))
                .await
                .unwrap();
        }

        let from = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let windowed = store
            .query_transactions(&customer(), TransactionFilter::date_range(from, to))
            .await
            .unwrap();
        assert_eq!(windowed.len(), 2);
    }

    #[tokio::test]
    async fn snapshots_replace_rather_than_accumulate() {
        use rust_decimal_macros::dec;

        let store = MemoryStore::new();
        let first = BudgetSpending {
            customer_id: customer(),
            month: "2026-03".to_owned(),
            total_spent: dec!(10.00),
            category_spending: vec![],
        };
        let second = BudgetSpending {
            total_spent: dec!(22.49),
            ..first.clone()
        };

        store
            .replace_spending_snapshot(&customer(), "2026-03", first)
            .await
            .unwrap();
        store
            .replace_spending_snapshot(&customer(), "2026-03", second)
            .await
            .unwrap();

        let stored = store
            .get_spending_snapshot(&customer(), "2026-03")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_spent, dec!(22.49));
        assert!(store
            .get_spending_snapshot(&customer(), "2026-04")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn custom_categories_default_to_empty() {
        let store = MemoryStore::new();
        assert!(store
            .list_custom_categories(&customer())
            .await
            .unwrap()
            .is_empty());
    }
}
