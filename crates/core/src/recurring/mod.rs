//! Recurring-payment detection.

pub mod detector;
pub mod types;

#[cfg(test)]
mod tests;

pub use detector::detect;
pub use types::RecurringPayment;
