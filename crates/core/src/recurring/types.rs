//! Recurring-payment result types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bankfeed_shared::types::ProviderTransactionId;

/// A detected recurring payment.
///
/// Derived on demand from stored transactions; never persisted as a source
/// of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringPayment {
    /// The shared narration pattern, title-cased for display.
    pub pattern: String,
    /// Category key of the payments.
    pub category: String,
    /// Mean of the absolute payment amounts.
    pub average_amount: Decimal,
    /// Number of contributing transactions.
    pub count: usize,
    /// Mean gap between consecutive payments, in days (rounded).
    pub interval_days: i64,
    /// Date of the most recent payment.
    pub last_payment: NaiveDate,
    /// Predicted date of the next payment.
    pub next_payment: NaiveDate,
    /// Provider IDs of the contributing transactions, in date order.
    pub contributing_transaction_ids: Vec<ProviderTransactionId>,
}
