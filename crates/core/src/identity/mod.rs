//! Relink-stable account identity and transaction dedup keys.
//!
//! The provider assigns a fresh account ID every time a user re-links their
//! bank, so nothing durable may hang off it. Instead, accounts are keyed by a
//! deterministic concatenation of bank routing data: the same physical
//! account always resolves to the same unique ID, no matter how many times
//! the institution is disconnected and reconnected.
//!
//! These are plain concatenation keys, not cryptographic hashes: they must be
//! reproducible and human-diffable when debugging identity questions.

use bankfeed_shared::types::{AccountUniqueId, DedupKey, ProviderTransactionId};

#[cfg(test)]
mod props;

/// Prefix marking the key namespace for account unique IDs.
const ACCOUNT_KEY_PREFIX: &str = "bank-account";

/// Separator between key components. Colons do not occur in institution IDs,
/// sort codes, or account numbers, so empty components cannot collide with
/// shifted ones.
const SEPARATOR: char = ':';

/// Computes the relink-stable unique ID for an account.
///
/// Order-sensitive: `(a, b, c)` and `(b, a, c)` produce different keys.
#[must_use]
pub fn account_unique_id(
    institution_id: &str,
    sort_code: &str,
    account_number: &str,
) -> AccountUniqueId {
    AccountUniqueId::new(format!(
        "{ACCOUNT_KEY_PREFIX}{SEPARATOR}{institution_id}{SEPARATOR}{sort_code}{SEPARATOR}{account_number}"
    ))
}

/// Computes the deterministic upsert key for a transaction.
///
/// Guarantees at most one stored record per provider transaction per account,
/// even under concurrent or repeated sync runs.
#[must_use]
pub fn transaction_dedup_key(
    provider_id: &ProviderTransactionId,
    account_unique_id: &AccountUniqueId,
) -> DedupKey {
    DedupKey::new(format!(
        "{account_unique_id}{SEPARATOR}{provider_id}"
    ))
}
