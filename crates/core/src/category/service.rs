//! Keyword-based narration classification.

use super::types::{CustomCategory, DefaultCategory, FALLBACK_CATEGORY};

/// The nine built-in categories, in match order.
///
/// Keyword lists and their order are load-bearing constants: downstream
/// aggregates and any stored snapshots depend on them. Do not reorder or
/// "improve" them.
const DEFAULT_CATEGORIES: &[DefaultCategory] = &[
    DefaultCategory {
        key: "groceries",
        display_name: "Groceries",
        keywords: &[
            "tesco",
            "sainsbury",
            "asda",
            "aldi",
            "lidl",
            "waitrose",
            "morrisons",
            "co-op",
            "iceland",
            "grocery",
            "supermarket",
        ],
        color: "#4caf50",
    },
    DefaultCategory {
        key: "eating_out",
        display_name: "Eating Out",
        keywords: &[
            "restaurant",
            "cafe",
            "coffee",
            "costa",
            "starbucks",
            "mcdonald",
            "kfc",
            "nando",
            "pret",
            "deliveroo",
            "just eat",
            "uber eats",
            "pizza",
            "takeaway",
        ],
        color: "#ff9800",
    },
    DefaultCategory {
        key: "transport",
        display_name: "Transport",
        keywords: &[
            "uber",
            "bolt",
            "tfl",
            "trainline",
            "national rail",
            "stagecoach",
            "shell",
            "esso",
            "texaco",
            "petrol",
            "fuel",
            "parking",
        ],
        color: "#2196f3",
    },
    DefaultCategory {
        key: "housing",
        display_name: "Housing",
        keywords: &["rent", "mortgage", "council tax", "letting", "landlord"],
        color: "#9c27b0",
    },
    DefaultCategory {
        key: "utilities",
        display_name: "Utilities",
        keywords: &[
            "electric",
            "energy",
            "british gas",
            "edf",
            "octopus",
            "water",
            "broadband",
            "vodafone",
            "virgin media",
            "sky",
            "giffgaff",
        ],
        color: "#607d8b",
    },
    DefaultCategory {
        key: "entertainment",
        display_name: "Entertainment",
        keywords: &[
            "netflix",
            "spotify",
            "disney",
            "prime video",
            "youtube",
            "cinema",
            "odeon",
            "steam",
            "playstation",
            "xbox",
            "nintendo",
        ],
        color: "#e91e63",
    },
    DefaultCategory {
        key: "shopping",
        display_name: "Shopping",
        keywords: &[
            "amazon",
            "ebay",
            "argos",
            "ikea",
            "john lewis",
            "next retail",
            "primark",
            "zara",
            "h&m",
            "etsy",
        ],
        color: "#795548",
    },
    DefaultCategory {
        key: "health",
        display_name: "Health",
        keywords: &[
            "pharmacy",
            "boots",
            "superdrug",
            "gym",
            "puregym",
            "dental",
            "doctor",
            "optician",
            "nhs",
        ],
        color: "#00bcd4",
    },
    DefaultCategory {
        key: FALLBACK_CATEGORY,
        display_name: "Other",
        // No keywords: the universal fallback.
        keywords: &[],
        color: "#9e9e9e",
    },
];

/// The built-in category list, in match order.
#[must_use]
pub fn default_categories() -> &'static [DefaultCategory] {
    DEFAULT_CATEGORIES
}

/// The category key reported for a custom category.
#[must_use]
pub fn custom_category_key(id: &str) -> String {
    format!("custom_{id}")
}

/// Classifies a narration into a category key.
///
/// Total function: any input, including the empty string and arbitrary
/// unicode, resolves to some key. Default categories are scanned first in
/// declared order (the fallback is skipped), then custom categories; within
/// a category, keywords match in declared order and the first substring hit
/// wins. Anything unmatched is [`FALLBACK_CATEGORY`].
#[must_use]
pub fn categorize(narration: &str, custom_categories: &[CustomCategory]) -> String {
    let lowered = narration.to_lowercase();

    for category in DEFAULT_CATEGORIES {
        if category.keywords.is_empty() {
            // The fallback never matches by keyword.
            continue;
        }
        for keyword in category.keywords {
            if lowered.contains(keyword) {
                return category.key.to_owned();
            }
        }
    }

    for category in custom_categories {
        for keyword in &category.keywords {
            if !keyword.is_empty() && lowered.contains(&keyword.to_lowercase()) {
                return custom_category_key(&category.id);
            }
        }
    }

    FALLBACK_CATEGORY.to_owned()
}
