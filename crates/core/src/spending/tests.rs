//! Aggregation and budget-window tests.

use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal_macros::dec;

use super::service::{aggregate_month, month_bounds, parse_month_key};
use super::types::BudgetPeriod;
use crate::identity;
use crate::model::{Transaction, TransactionStatus, normalize_narration};
use bankfeed_shared::Money;
use bankfeed_shared::types::{CustomerId, ProviderTransactionId};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn txn(id: &str, unscaled: i64, day: u32, narration: &str) -> Transaction {
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
        booked_date: date(2026, 3, day),
        identifiers: serde_json::Value::Null,
        types: vec![],
        status: TransactionStatus::Booked,
        provider_mutability: "IMMUTABLE".to_owned(),
    }
}

#[test]
fn sums_absolute_expenses_per_category() {
    let customer = CustomerId::new("cust-1");
    let transactions = vec![
        txn("t1", -12_50, 3, "TESCO STORES"),
        txn("t2", -30_00, 10, "SAINSBURYS LOCAL"),
        txn("t3", -9_99, 12, "NETFLIX.COM"),
        // Income must not count toward spend.
        txn("t4", 2_000_00, 25, "SALARY MARCH"),
    ];

    let snapshot = aggregate_month(&customer, 2026, 3, &transactions, &[]);

    assert_eq!(snapshot.month, "2026-03");
    assert_eq!(snapshot.total_spent, dec!(52.49));
    let by_category: Vec<(&str, _)> = snapshot
        .category_spending
        .iter()
        .map(|c| (c.category.as_str(), c.amount))
        .collect();
    assert_eq!(
        by_category,
        vec![("entertainment", dec!(9.99)), ("groceries", dec!(42.50))]
    );
}

#[test]
fn transactions_outside_the_month_are_ignored() {
    let customer = CustomerId::new("cust-1");
    let mut outside = txn("t1", -10_00, 1, "TESCO");
    outside.booked_date = date(2026, 2, 28);
    let transactions = vec![outside, txn("t2", -5_00, 1, "TESCO")];

    let snapshot = aggregate_month(&customer, 2026, 3, &transactions, &[]);

    assert_eq!(snapshot.total_spent, dec!(5.00));
}

#[test]
fn recomputation_of_identical_data_is_identical() {
    let customer = CustomerId::new("cust-1");
    let transactions = vec![
        txn("t1", -12_50, 3, "TESCO STORES"),
        txn("t2", -9_99, 12, "NETFLIX.COM"),
    ];
    // Insertion order differs; output must not.
    let reversed: Vec<_> = transactions.iter().rev().cloned().collect();

    let first = aggregate_month(&customer, 2026, 3, &transactions, &[]);
    let second = aggregate_month(&customer, 2026, 3, &reversed, &[]);

    assert_eq!(first, second);
}

#[test]
fn empty_month_aggregates_to_zero() {
    let customer = CustomerId::new("cust-1");
    let snapshot = aggregate_month(&customer, 2026, 3, &[], &[]);

    assert_eq!(snapshot.total_spent, dec!(0));
    assert!(snapshot.category_spending.is_empty());
}

#[rstest]
#[case(2026, 2, 28)]
#[case(2028, 2, 29)]
#[case(2026, 12, 31)]
#[case(2026, 4, 30)]
fn month_bounds_cover_whole_month(#[case] year: i32, #[case] month: u32, #[case] last_day: u32) {
    let (first, last) = month_bounds(year, month).unwrap();
    assert_eq!(first, date(year, month, 1));
    assert_eq!(last, date(year, month, last_day));
}

#[test]
fn month_bounds_reject_impossible_months() {
    assert!(month_bounds(2026, 0).is_none());
    assert!(month_bounds(2026, 13).is_none());
}

#[rstest]
#[case("2026-03", Some((2026, 3)))]
#[case("1999-12", Some((1999, 12)))]
#[case("2026-3", None)]
#[case("garbage", None)]
#[case("", None)]
fn month_key_parsing(#[case] key: &str, #[case] want: Option<(i32, u32)>) {
    assert_eq!(parse_month_key(key), want);
}

#[test]
fn current_month_window_is_the_calendar_month() {
    let window = BudgetPeriod::CurrentMonth.window(date(2026, 2, 14));
    assert_eq!(window, (date(2026, 2, 1), date(2026, 2, 28)));
}

#[test]
fn custom_window_falls_back_per_missing_bound() {
    let period = BudgetPeriod::CustomDate {
        start_date: Some(date(2026, 1, 10)),
        end_date: None,
    };
    let window = period.window(date(2026, 3, 14));
    assert_eq!(window, (date(2026, 1, 10), date(2026, 3, 31)));
}

#[test]
fn recurring_window_anchors_on_day_of_month() {
    let period = BudgetPeriod::Recurring {
        start_date: Some(date(2025, 11, 15)),
        end_date: None,
    };

    // Mid-cycle: the window started on the 15th of this month.
    assert_eq!(
        period.window(date(2026, 3, 20)),
        (date(2026, 3, 15), date(2026, 4, 14))
    );
    // Before this month's anchor day: still in the previous cycle.
    assert_eq!(
        period.window(date(2026, 3, 10)),
        (date(2026, 2, 15), date(2026, 3, 14))
    );
}

#[test]
fn recurring_window_clamps_short_months() {
    let period = BudgetPeriod::Recurring {
        start_date: Some(date(2025, 10, 31)),
        end_date: None,
    };

    // February has no 31st; the cycle starts on its last day instead.
    assert_eq!(
        period.window(date(2026, 2, 28)),
        (date(2026, 2, 28), date(2026, 3, 30))
    );
}
