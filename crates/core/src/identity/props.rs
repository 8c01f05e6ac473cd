//! Property-based tests for identity keys.

use proptest::prelude::*;

use super::{account_unique_id, transaction_dedup_key};
use bankfeed_shared::types::ProviderTransactionId;

/// Strategy for routing-data components: colons never occur in real
/// institution IDs, sort codes, or account numbers.
fn component() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _-]{0,16}"
}

proptest! {
    /// The unique ID depends only on the routing triplet, so any change to
    /// the provider-assigned account ID (a relink) leaves it untouched.
    #[test]
    fn stable_across_relinks(
        institution in component(),
        sort_code in component(),
        account_number in component(),
    ) {
        let first = account_unique_id(&institution, &sort_code, &account_number);
        let second = account_unique_id(&institution, &sort_code, &account_number);
        prop_assert_eq!(first, second);
    }

    /// Distinct routing triplets never produce the same unique ID.
    #[test]
    fn distinct_triplets_never_collide(
        a in (component(), component(), component()),
        b in (component(), component(), component()),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            account_unique_id(&a.0, &a.1, &a.2),
            account_unique_id(&b.0, &b.1, &b.2)
        );
    }

    /// Dedup keys are injective over (provider transaction ID, account).
    #[test]
    fn dedup_keys_never_collide(
        txn_a in component(),
        txn_b in component(),
        routing in (component(), component(), component()),
    ) {
        prop_assume!(txn_a != txn_b);
        let account = account_unique_id(&routing.0, &routing.1, &routing.2);
        prop_assert_ne!(
            transaction_dedup_key(&ProviderTransactionId::new(txn_a), &account),
            transaction_dedup_key(&ProviderTransactionId::new(txn_b), &account)
        );
    }
}
