//! Budget and spending snapshot types.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bankfeed_shared::types::CustomerId;

/// A customer's spending limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The customer this budget belongs to.
    pub customer_id: CustomerId,
    /// Overall spending limit for the period.
    pub total_limit: Decimal,
    /// Per-category limits.
    pub category_limits: Vec<CategoryLimit>,
    /// The period the limits apply to.
    pub period: BudgetPeriod,
}

/// A spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLimit {
    /// Category key the limit applies to.
    pub category: String,
    /// The limit amount.
    pub limit: Decimal,
}

/// The period a budget applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BudgetPeriod {
    /// The calendar month containing today.
    CurrentMonth,
    /// A fixed date window.
    CustomDate {
        /// Inclusive start of the window.
        start_date: Option<NaiveDate>,
        /// Inclusive end of the window.
        end_date: Option<NaiveDate>,
    },
    /// A monthly window anchored on the start date's day of month.
    Recurring {
        /// Anchor date; its day-of-month starts each cycle.
        start_date: Option<NaiveDate>,
        /// Last day the budget recurs, if bounded.
        end_date: Option<NaiveDate>,
    },
}

impl BudgetPeriod {
    /// Resolves the active inclusive date window as of `today`.
    ///
    /// Missing bounds fall back to the calendar month containing today.
    #[must_use]
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let (month_start, month_end) = calendar_month(today);
        match self {
            Self::CurrentMonth => (month_start, month_end),
            Self::CustomDate {
                start_date,
                end_date,
            } => (
                start_date.unwrap_or(month_start),
                end_date.unwrap_or(month_end),
            ),
            Self::Recurring {
                start_date,
                end_date: _,
            } => match start_date {
                Some(anchor) => recurring_window(*anchor, today),
                None => (month_start, month_end),
            },
        }
    }
}

/// The calendar month containing `date`, as an inclusive window.
fn calendar_month(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(date);
    (first, last)
}

/// The recurring cycle containing `today`, anchored on `anchor`'s day of
/// month. Anchor days beyond a month's length clamp to the month end.
fn recurring_window(anchor: NaiveDate, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let day = anchor.day();
    let this_cycle = clamp_to_month(today.year(), today.month(), day);
    let start = if this_cycle <= today {
        this_cycle
    } else if today.month() == 1 {
        clamp_to_month(today.year() - 1, 12, day)
    } else {
        clamp_to_month(today.year(), today.month() - 1, day)
    };
    let next = if start.month() == 12 {
        clamp_to_month(start.year() + 1, 1, day)
    } else {
        clamp_to_month(start.year(), start.month() + 1, day)
    };
    let end = next.pred_opt().unwrap_or(start);
    (start, end)
}

/// The given day in the given month, clamped to the month's last day.
fn clamp_to_month(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| {
        // Day is past the end of the month; walk back to the last valid day.
        (1..=4)
            .filter_map(|back| NaiveDate::from_ymd_opt(year, month, day.saturating_sub(back)))
            .next()
            .unwrap_or_default()
    })
}

/// Derived, re-computable snapshot of a customer's spend for one month.
///
/// Not a source of truth: recomputed wholesale from stored transactions, so
/// repeated syncs can never double-count into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSpending {
    /// The customer the snapshot belongs to.
    pub customer_id: CustomerId,
    /// Month key, `YYYY-MM`.
    pub month: String,
    /// Sum of absolute expense amounts for the month.
    pub total_spent: Decimal,
    /// Per-category expense totals, sorted by category key.
    pub category_spending: Vec<CategorySpend>,
}

/// Spend attributed to one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    /// Category key.
    pub category: String,
    /// Sum of absolute expense amounts in this category.
    pub amount: Decimal,
}
