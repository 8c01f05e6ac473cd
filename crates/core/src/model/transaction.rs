//! Bank transaction records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bankfeed_shared::types::{AccountUniqueId, CustomerId, DedupKey, ProviderTransactionId};
use bankfeed_shared::Money;

/// A bank transaction, typed at the ingestion boundary.
///
/// Uniquely identified by `dedup_key`; re-syncing the same period overwrites
/// in place instead of creating duplicates. Immutable once booked except for
/// status transitions (pending -> booked) and category re-derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Provider-assigned transaction ID, volatile per provider session.
    pub provider_id: ProviderTransactionId,
    /// Stable foreign key to the owning account.
    pub account_unique_id: AccountUniqueId,
    /// The customer who owns the account.
    pub customer_id: CustomerId,
    /// Signed amount; negative values are expenses.
    pub amount: Money,
    /// Raw description as reported by the bank. The only display text.
    pub narration: String,
    /// Lowercased narration with digits and punctuation stripped. Used only
    /// for pattern matching, never shown to the user.
    pub normalized_narration: String,
    /// The date the transaction was booked.
    pub booked_date: NaiveDate,
    /// Opaque provider metadata blob.
    pub identifiers: serde_json::Value,
    /// Provider-reported transaction type tags.
    pub types: Vec<String>,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Whether the provider may still mutate this record.
    pub provider_mutability: String,
    /// Deterministic upsert key, derived from `provider_id` and
    /// `account_unique_id`.
    pub dedup_key: DedupKey,
}

/// Settlement status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// The transaction has not settled yet.
    Pending,
    /// The transaction has settled.
    Booked,
    /// The provider did not report a recognizable status.
    Undefined,
}

impl std::str::FromStr for TransactionStatus {
    type Err = std::convert::Infallible;

    /// Total conversion: unknown provider statuses map to `Undefined`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "BOOKED" | "SETTLED" => Self::Booked,
            _ => Self::Undefined,
        })
    }
}

/// Normalizes a narration for pattern matching: lowercase, strip digits,
/// strip non-word characters, collapse whitespace, trim.
///
/// `"Netflix.com 0423"` and `"NETFLIX.COM 0523"` both normalize to
/// `"netflixcom"`, which is what lets the recurring detector group monthly
/// charges whose raw narrations differ only in reference numbers.
#[must_use]
pub fn normalize_narration(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.to_lowercase().chars() {
        if ch.is_alphabetic() {
            out.push(ch);
        } else if ch.is_whitespace() {
            out.push(' ');
        }
        // digits and punctuation are stripped
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
