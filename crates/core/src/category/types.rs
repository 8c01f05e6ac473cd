//! Category definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankfeed_shared::types::CustomerId;

/// Key of the universal fallback category. It has no keywords; every
/// narration that matches nothing else lands here.
pub const FALLBACK_CATEGORY: &str = "other";

/// A built-in spending category.
///
/// The declared order of the default category list, and of each keyword list,
/// is load-bearing: classification is first-match-wins in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DefaultCategory {
    /// Stable category key stored on aggregates (e.g. "groceries").
    pub key: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Narration keywords, matched as lowercase substrings in order.
    pub keywords: &'static [&'static str],
    /// Display color, as a hex string.
    pub color: &'static str,
}

/// A user-defined category.
///
/// Custom categories are only consulted after every default category has
/// failed to match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCategory {
    /// Category ID; classification returns `custom_{id}`.
    pub id: String,
    /// The customer who owns this category.
    pub customer_id: CustomerId,
    /// Human-readable name.
    pub name: String,
    /// Narration keywords, matched as lowercase substrings in order.
    pub keywords: Vec<String>,
    /// Display color, as a hex string.
    pub color: String,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
    /// When the category was last modified.
    pub updated_at: DateTime<Utc>,
}
