//! Detection fixtures, including the exact tolerance boundaries.

use chrono::{Duration, NaiveDate};
use rust_decimal_macros::dec;

use super::detector::detect;
use crate::identity;
use crate::model::{Transaction, TransactionStatus, normalize_narration};
use bankfeed_shared::Money;
use bankfeed_shared::types::{CustomerId, ProviderTransactionId};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn txn(id: &str, unscaled: i64, day_offset: i64, narration: &str) -> Transaction {
    let provider_id = ProviderTransactionId::new(id);
    let account = identity::account_unique_id("ing", "12-34-56", "11112222");
    Transaction {
        dedup_key: identity::transaction_dedup_key(&provider_id, &account),
        provider_id,
        account_unique_id: account,
        customer_id: CustomerId::new("cust-1"),
        amount: Money::new(unscaled, 2, "GBP"),
        narration: narration.to_owned(),
        normalized_narration: normalize_narration(narration),
        booked_date: base_date() + Duration::days(day_offset),
        identifiers: serde_json::Value::Null,
        types: vec![],
        status: TransactionStatus::Booked,
        provider_mutability: "IMMUTABLE".to_owned(),
    }
}

/// Days 0/30/37: gaps 30 and 7 around a mean of 18.5 deviate by 11.5 each,
/// outside the +/-7 tolerance.
#[test]
fn one_irregular_gap_rejects_the_group() {
    let transactions = vec![
        txn("t1", -9_99, 0, "NETFLIX.COM 01"),
        txn("t2", -9_99, 30, "NETFLIX.COM 02"),
        txn("t3", -9_99, 37, "NETFLIX.COM 03"),
    ];

    assert!(detect(&transactions, &[]).is_empty());
}

/// Days 0/30/31: gaps 30 and 1, mean 15.5, deviations 14.5 each. A tight
/// pair right after a long gap is still not recurring.
#[test]
fn clustered_payments_are_not_recurring() {
    let transactions = vec![
        txn("t1", -9_99, 0, "NETFLIX.COM 01"),
        txn("t2", -9_99, 30, "NETFLIX.COM 02"),
        txn("t3", -9_99, 31, "NETFLIX.COM 03"),
    ];

    assert!(detect(&transactions, &[]).is_empty());
}

/// Gaps 23 and 37 around a mean of 30 deviate by exactly 7 days: the
/// tolerance is inclusive, so the group qualifies.
#[test]
fn deviation_of_exactly_seven_days_is_accepted() {
    let transactions = vec![
        txn("t1", -9_99, 0, "NETFLIX.COM 01"),
        txn("t2", -9_99, 23, "NETFLIX.COM 02"),
        txn("t3", -9_99, 60, "NETFLIX.COM 03"),
    ];

    let payments = detect(&transactions, &[]);
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].interval_days, 30);
}

/// Gaps 22 and 38 deviate by 8 days from the mean of 30: one day past the
/// tolerance, rejected.
#[test]
fn deviation_of_eight_days_is_rejected() {
    let transactions = vec![
        txn("t1", -9_99, 0, "NETFLIX.COM 01"),
        txn("t2", -9_99, 22, "NETFLIX.COM 02"),
        txn("t3", -9_99, 60, "NETFLIX.COM 03"),
    ];

    assert!(detect(&transactions, &[]).is_empty());
}

#[test]
fn monthly_direct_debit_is_detected() {
    let transactions = vec![
        txn("t1", -55_00, 0, "DD BRITISH GAS 0001"),
        txn("t2", -57_00, 30, "DD BRITISH GAS 0002"),
        txn("t3", -56_00, 60, "DD BRITISH GAS 0003"),
    ];

    let payments = detect(&transactions, &[]);
    assert_eq!(payments.len(), 1);

    let payment = &payments[0];
    assert_eq!(payment.pattern, "Dd British Gas");
    assert_eq!(payment.category, "utilities");
    assert_eq!(payment.average_amount, dec!(56.00));
    assert_eq!(payment.count, 3);
    assert_eq!(payment.interval_days, 30);
    assert_eq!(payment.last_payment, base_date() + Duration::days(60));
    assert_eq!(payment.next_payment, base_date() + Duration::days(90));
    assert_eq!(
        payment.contributing_transaction_ids,
        vec![
            ProviderTransactionId::new("t1"),
            ProviderTransactionId::new("t2"),
            ProviderTransactionId::new("t3"),
        ]
    );
}

#[test]
fn weekly_interval_sits_on_the_lower_bound() {
    let transactions = vec![
        txn("t1", -3_20, 0, "PUREGYM CLASS"),
        txn("t2", -3_20, 7, "PUREGYM CLASS"),
        txn("t3", -3_20, 14, "PUREGYM CLASS"),
    ];

    let payments = detect(&transactions, &[]);
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].interval_days, 7);
}

#[test]
fn intervals_under_seven_days_are_rejected() {
    let transactions = vec![
        txn("t1", -3_20, 0, "PUREGYM CLASS"),
        txn("t2", -3_20, 6, "PUREGYM CLASS"),
        txn("t3", -3_20, 12, "PUREGYM CLASS"),
    ];

    assert!(detect(&transactions, &[]).is_empty());
}

#[test]
fn intervals_over_a_year_are_rejected() {
    let transactions = vec![
        txn("t1", -120_00, 0, "DOMAIN RENEWAL"),
        txn("t2", -120_00, 400, "DOMAIN RENEWAL"),
    ];

    assert!(detect(&transactions, &[]).is_empty());
}

#[test]
fn a_single_occurrence_is_never_recurring() {
    let transactions = vec![txn("t1", -9_99, 0, "NETFLIX.COM")];

    assert!(detect(&transactions, &[]).is_empty());
}

#[test]
fn short_patterns_are_too_ambiguous() {
    // "EE 12" normalizes to "ee": under four characters.
    let transactions = vec![
        txn("t1", -10_00, 0, "EE 12"),
        txn("t2", -10_00, 30, "EE 13"),
        txn("t3", -10_00, 60, "EE 14"),
    ];

    assert!(detect(&transactions, &[]).is_empty());
}

#[test]
fn income_is_never_recurring_spend() {
    let transactions = vec![
        txn("t1", 2_000_00, 0, "ACME PAYROLL"),
        txn("t2", 2_000_00, 30, "ACME PAYROLL"),
        txn("t3", 2_000_00, 60, "ACME PAYROLL"),
    ];

    assert!(detect(&transactions, &[]).is_empty());
}

#[test]
fn results_are_sorted_by_next_payment() {
    let transactions = vec![
        // Monthly, last on day 60, next due day 90.
        txn("a1", -9_99, 0, "NETFLIX.COM"),
        txn("a2", -9_99, 30, "NETFLIX.COM"),
        txn("a3", -9_99, 60, "NETFLIX.COM"),
        // Weekly, last on day 70, next due day 77.
        txn("b1", -3_20, 56, "PUREGYM CLASS"),
        txn("b2", -3_20, 63, "PUREGYM CLASS"),
        txn("b3", -3_20, 70, "PUREGYM CLASS"),
    ];

    let payments = detect(&transactions, &[]);
    let patterns: Vec<&str> = payments.iter().map(|p| p.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["Puregym Class", "Netflixcom"]);
}

#[test]
fn detection_ignores_provider_cursor_order() {
    let mut transactions = vec![
        txn("t3", -9_99, 60, "NETFLIX.COM"),
        txn("t1", -9_99, 0, "NETFLIX.COM"),
        txn("t2", -9_99, 30, "NETFLIX.COM"),
    ];
    let shuffled = detect(&transactions, &[]);
    transactions.sort_by_key(|t| t.booked_date);
    let sorted = detect(&transactions, &[]);

    assert_eq!(shuffled, sorted);
    assert_eq!(shuffled.len(), 1);
}
