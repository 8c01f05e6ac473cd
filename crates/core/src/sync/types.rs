//! Sync orchestration inputs and results.

use serde::{Deserialize, Serialize};

use bankfeed_shared::types::AccountUniqueId;

/// Tunables for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Maximum number of accounts whose transactions are fetched
    /// concurrently. Per-account pagination is always sequential; this
    /// bounds only the cross-account fan-out.
    pub max_concurrent_accounts: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_concurrent_accounts: 4,
        }
    }
}

/// Outcome of one sync run.
///
/// A sync with partial account failures still counts as a success with a
/// non-empty failure list, so callers can render "3 of 4 accounts
/// refreshed".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncResult {
    /// Accounts whose identity and balances were stored.
    pub accounts_imported: u64,
    /// Transactions upserted across all accounts.
    pub transactions_imported: u64,
    /// Records skipped because a store write or validation failed.
    pub skipped_records: u64,
    /// Isolated non-fatal failures, per account or per pipeline stage.
    pub per_account_errors: Vec<SyncFailure>,
}

/// A non-fatal failure recorded during a sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncFailure {
    /// The affected account, when the failure is account-scoped.
    pub account_unique_id: Option<AccountUniqueId>,
    /// The pipeline stage that failed.
    pub stage: SyncStage,
    /// Human-readable failure description.
    pub message: String,
}

/// Pipeline stage a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStage {
    /// Fetching or storing an account's transactions.
    Transactions,
    /// Recomputing monthly spending snapshots after ingestion.
    Aggregation,
    /// The post-ingest recurring-payment pass.
    Detection,
}
