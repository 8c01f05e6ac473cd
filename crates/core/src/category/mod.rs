//! Narration-to-category classification.

pub mod service;
pub mod types;


pub use service::{categorize, custom_category_key, default_categories};
pub use types::{CustomCategory, DefaultCategory, FALLBACK_CATEGORY};
