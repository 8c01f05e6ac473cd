//! Money as an integer unscaled value plus scale and currency.
//!
//! CRITICAL: Never use floating-point for money. The true amount is
//! `unscaled_value * 10^-scale`; conversion to a decimal happens only at the
//! formatting boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The highest scale `rust_decimal` can represent.
const MAX_SCALE: u32 = 28;

/// Scale used for the zero fallback amount.
const FALLBACK_SCALE: u32 = 2;

/// A monetary amount in integer unscaled-value form.
///
/// Provider payloads carry amounts as `{unscaledValue, scale, currencyCode}`;
/// this type stores that triple verbatim so that no precision is lost between
/// ingestion and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in units of `10^-scale` of the currency.
    pub unscaled_value: i64,
    /// Number of decimal digits the unscaled value is shifted by.
    pub scale: u32,
    /// ISO 4217 currency code (e.g., "GBP", "EUR").
    pub currency: String,
}

impl Money {
    /// Creates a new amount. Scales beyond the representable range degrade to
    /// the zero amount rather than failing.
    #[must_use]
    pub fn new(unscaled_value: i64, scale: u32, currency: impl Into<String>) -> Self {
        let currency = currency.into();
        if scale > MAX_SCALE {
            return Self::zero(currency);
        }
        Self {
            unscaled_value,
            scale,
            currency,
        }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: impl Into<String>) -> Self {
        Self {
            unscaled_value: 0,
            scale: FALLBACK_SCALE,
            currency: currency.into(),
        }
    }

    /// Lenient constructor for provider payloads.
    ///
    /// A missing unscaled value or scale yields the zero amount, never an
    /// error. Money construction is a total function by contract.
    #[must_use]
    pub fn from_parts(
        unscaled_value: Option<i64>,
        scale: Option<u32>,
        currency: Option<String>,
    ) -> Self {
        let currency = currency.unwrap_or_default();
        match (unscaled_value, scale) {
            (Some(unscaled), Some(scale)) => Self::new(unscaled, scale, currency),
            _ => Self::zero(currency),
        }
    }

    /// The true amount as a decimal, `unscaled_value * 10^-scale`.
    #[must_use]
    pub fn value(&self) -> Decimal {
        Decimal::new(self.unscaled_value, self.scale)
    }

    /// Formats the amount at its own scale, e.g. `12345 / 2` -> `"123.45"`.
    #[must_use]
    pub fn format(&self) -> String {
        self.value().to_string()
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.unscaled_value == 0
    }

    /// Returns true if the signed amount represents an expense (negative).
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.unscaled_value < 0
    }

    /// The absolute amount, at the same scale and currency.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            unscaled_value: self.unscaled_value.saturating_abs(),
            scale: self.scale,
            currency: self.currency.clone(),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.currency.is_empty() {
            write!(f, "{}", self.format())
        } else {
            write!(f, "{} {}", self.format(), self.currency)
        }
    }
}
