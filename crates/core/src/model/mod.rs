//! Typed domain records produced at the ingestion boundary.
//!
//! Categorization, aggregation, and detection operate only on these typed
//! shapes, never on raw provider payloads.

pub mod account;
pub mod transaction;

pub use account::{Account, AccountUpdate};
pub use transaction::{Transaction, TransactionStatus, normalize_narration};
