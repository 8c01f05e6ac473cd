//! The `BankProvider` collaborator contract.
//!
//! The pipeline consumes an open-banking provider through this trait: token
//! exchange, account listing, and cursor-paginated transaction listing. The
//! HTTP adapter lives in `bankfeed-provider`; tests script the trait
//! directly.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bankfeed_shared::types::{CustomerId, ProviderAccountId, ProviderTransactionId};
use bankfeed_shared::Money;

use crate::identity;
use crate::model::{Account, Transaction, TransactionStatus, normalize_narration};

/// An access token obtained from the provider's token exchange.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken(pub String);

impl std::fmt::Debug for AccessToken {
    /// Redacted: tokens must never leak into logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Errors surfaced by the provider collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider rejected the authorization code. Fatal to the sync.
    #[error("token exchange rejected: {0}")]
    AuthExchange(String),

    /// A fetch call failed (network, timeout, non-success status).
    /// Recoverable per account.
    #[error("provider fetch failed: {0}")]
    Fetch(String),

    /// The provider returned a payload that could not be decoded at all.
    #[error("provider payload could not be decoded: {0}")]
    Decode(String),
}

/// A bank account as reported by the provider, already typed.
///
/// Malformed wire records are dropped at the adapter boundary; anything that
/// reaches this type has an ID and routing data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderAccount {
    /// Provider-assigned (volatile) account ID.
    pub provider_id: ProviderAccountId,
    /// Display name reported by the bank.
    pub name: String,
    /// Account type as reported by the provider.
    pub account_type: String,
    /// Booked balance.
    pub booked: Money,
    /// Available balance.
    pub available: Money,
    /// The bank this account belongs to.
    pub institution_id: String,
    /// Bank sort code.
    pub sort_code: String,
    /// Bank account number.
    pub account_number: String,
    /// Provider-reported customer segment, if any.
    pub customer_segment: Option<String>,
    /// Opaque provider metadata blob.
    pub identifiers: serde_json::Value,
}

impl ProviderAccount {
    /// Builds the stored account record, deriving the relink-stable unique ID
    /// from the routing triplet.
    #[must_use]
    pub fn into_account(self, customer_id: &CustomerId, refreshed_at: DateTime<Utc>) -> Account {
        let unique_id =
            identity::account_unique_id(&self.institution_id, &self.sort_code, &self.account_number);
        Account {
            provider_id: self.provider_id,
            unique_id,
            customer_id: customer_id.clone(),
            name: self.name,
            account_type: self.account_type,
            booked: self.booked,
            available: self.available,
            identifiers: self.identifiers,
            last_refreshed: refreshed_at,
            financial_institution_id: self.institution_id,
            customer_segment: self.customer_segment,
        }
    }
}

/// A transaction as reported by the provider, already typed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTransaction {
    /// Provider-assigned transaction ID.
    pub provider_id: ProviderTransactionId,
    /// Signed amount; negative values are expenses.
    pub amount: Money,
    /// Raw description string.
    pub narration: String,
    /// The date the transaction was booked.
    pub booked_date: NaiveDate,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Provider-reported type tags.
    pub types: Vec<String>,
    /// Whether the provider may still mutate this record.
    pub mutability: String,
    /// Opaque provider metadata blob.
    pub identifiers: serde_json::Value,
}

impl ProviderTransaction {
    /// Builds the stored transaction record: derives the normalized narration
    /// and the dedup key binding this record to its account.
    #[must_use]
    pub fn into_transaction(
        self,
        account_unique_id: &bankfeed_shared::types::AccountUniqueId,
        customer_id: &CustomerId,
    ) -> Transaction {
        let dedup_key = identity::transaction_dedup_key(&self.provider_id, account_unique_id);
        let normalized_narration = normalize_narration(&self.narration);
        Transaction {
            provider_id: self.provider_id,
            account_unique_id: account_unique_id.clone(),
            customer_id: customer_id.clone(),
            amount: self.amount,
            narration: self.narration,
            normalized_narration,
            booked_date: self.booked_date,
            identifiers: self.identifiers,
            types: self.types,
            status: self.status,
            provider_mutability: self.mutability,
            dedup_key,
        }
    }
}

/// One page of transactions from the provider's cursor API.
#[derive(Debug, Clone, Default)]
pub struct TransactionPage {
    /// Transactions on this page, in provider-cursor order. Not guaranteed
    /// chronological; consumers must re-sort by booked date.
    pub items: Vec<ProviderTransaction>,
    /// Cursor for the next page, absent on the last page.
    pub next_page_token: Option<String>,
}

/// The open-banking provider client consumed by the orchestrator.
#[async_trait]
pub trait BankProvider: Send + Sync {
    /// Exchanges a one-time authorization code for an access token.
    async fn exchange_token(&self, code: &str) -> Result<AccessToken, ProviderError>;

    /// Lists the customer's linked accounts.
    async fn list_accounts(&self, token: &AccessToken)
        -> Result<Vec<ProviderAccount>, ProviderError>;

    /// Fetches one page of transactions for an account. Pass the previous
    /// page's `next_page_token` to continue; `None` starts from the first
    /// page.
    async fn list_transactions(
        &self,
        token: &AccessToken,
        account_id: &ProviderAccountId,
        page_token: Option<&str>,
    ) -> Result<TransactionPage, ProviderError>;
}
