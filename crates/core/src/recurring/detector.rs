//! Interval-regularity detection over narration patterns.

use std::collections::BTreeMap;

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::types::RecurringPayment;
use crate::category::{self, CustomCategory};
use crate::model::Transaction;

/// Every gap must sit within this many days of the mean gap.
///
/// Tolerates weekend and holiday shifts in direct debits without accepting
/// irregular spending as recurring. A heuristic, not a statistical model:
/// missed detections of highly irregular recurring payments are an accepted
/// tradeoff for determinism. Load-bearing literal; do not tune.
const GAP_TOLERANCE_DAYS: i64 = 7;

/// Shortest mean interval considered recurring, in days.
const MIN_INTERVAL_DAYS: i64 = 7;

/// Longest mean interval considered recurring, in days.
const MAX_INTERVAL_DAYS: i64 = 365;

/// Patterns shorter than this are too ambiguous to be a merchant signature.
const MIN_PATTERN_CHARS: usize = 4;

/// A group needs at least this many transactions to establish an interval.
const MIN_OCCURRENCES: usize = 2;

/// Detects recurring payments among the given transactions.
///
/// Groups expense transactions by normalized narration, tests every
/// consecutive gap against the mean gap, and emits one prediction per
/// qualifying group, sorted by ascending predicted next payment.
#[must_use]
pub fn detect(
    transactions: &[Transaction],
    custom_categories: &[CustomCategory],
) -> Vec<RecurringPayment> {
    // BTreeMap keeps group iteration deterministic regardless of input order.
    let mut groups: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for txn in transactions {
        if !txn.amount.is_expense() {
            continue;
        }
        let pattern = txn.normalized_narration.as_str();
        if pattern.chars().count() < MIN_PATTERN_CHARS {
            continue;
        }
        groups.entry(pattern).or_default().push(txn);
    }

    let mut payments: Vec<RecurringPayment> = groups
        .into_iter()
        .filter(|(_, group)| group.len() >= MIN_OCCURRENCES)
        .filter_map(|(pattern, group)| evaluate_group(pattern, group, custom_categories))
        .collect();

    payments.sort_by(|a, b| {
        a.next_payment
            .cmp(&b.next_payment)
            .then_with(|| a.pattern.cmp(&b.pattern))
    });
    payments
}

/// Tests one narration group for interval regularity.
fn evaluate_group(
    pattern: &str,
    mut group: Vec<&Transaction>,
    custom_categories: &[CustomCategory],
) -> Option<RecurringPayment> {
    group.sort_by(|a, b| {
        a.booked_date
            .cmp(&b.booked_date)
            .then_with(|| a.dedup_key.cmp(&b.dedup_key))
    });

    let gaps: Vec<i64> = group
        .windows(2)
        .map(|pair| (pair[1].booked_date - pair[0].booked_date).num_days())
        .collect();
    let gap_count = i64::try_from(gaps.len()).ok()?;
    let mean_gap = Decimal::from(gaps.iter().sum::<i64>()) / Decimal::from(gap_count);

    if mean_gap < Decimal::from(MIN_INTERVAL_DAYS) || mean_gap > Decimal::from(MAX_INTERVAL_DAYS) {
        return None;
    }
    let tolerance = Decimal::from(GAP_TOLERANCE_DAYS);
    let regular = gaps
        .iter()
        .all(|gap| (Decimal::from(*gap) - mean_gap).abs() <= tolerance);
    if !regular {
        return None;
    }

    let count = group.len();
    let total: Decimal = group.iter().map(|txn| txn.amount.abs().value()).sum();
    let average_amount = total / Decimal::from(count);

    let last = group.last()?;
    let interval_days = mean_gap.round().to_i64()?;

    Some(RecurringPayment {
        pattern: title_case(pattern),
        category: category::categorize(&last.narration, custom_categories),
        average_amount,
        count,
        interval_days,
        last_payment: last.booked_date,
        next_payment: last.booked_date + Duration::days(interval_days),
        contributing_transaction_ids: group
            .iter()
            .map(|txn| txn.provider_id.clone())
            .collect(),
    })
}

/// Title-cases a normalized (lowercase, space-separated) pattern for display.
fn title_case(pattern: &str) -> String {
    pattern
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
