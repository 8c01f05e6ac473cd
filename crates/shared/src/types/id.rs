//! Typed keys for type-safe entity references.
//!
//! Using typed keys prevents accidentally passing a volatile provider account
//! ID where the relink-stable unique ID is expected. All keys are plain
//! strings on the wire; the wrappers exist purely for compile-time safety.

use serde::{Deserialize, Serialize};

/// Macro to generate typed string-key wrappers.
macro_rules! typed_key {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates a key from any string-like value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

typed_key!(CustomerId, "Unique identifier for a customer.");
typed_key!(
    ProviderAccountId,
    "Provider-assigned account ID. Volatile: changes when the user re-links \
     the same bank, so it must never be used for cross-session identity."
);
typed_key!(
    ProviderTransactionId,
    "Provider-assigned transaction ID, scoped to a provider account."
);
typed_key!(
    AccountUniqueId,
    "Relink-stable account identifier derived from bank routing data. \
     The durable foreign key for transactions and UI selection."
);
typed_key!(
    DedupKey,
    "Deterministic transaction upsert key. At most one stored record exists \
     per dedup key, even under concurrent or repeated sync runs."
);
