//! Fixed product category taxonomy and the keyword classifier that maps raw
//! catalog fields onto it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Seating,
    Desks,
    Storage,
    Tables,
    Accessories,
    Lighting,
    Other,
}

/// Every category in the taxonomy, in dashboard display order.
pub const CATEGORIES: [Category; 7] = [
    Category::Seating,
    Category::Desks,
    Category::Storage,
    Category::Tables,
    Category::Accessories,
    Category::Lighting,
    Category::Other,
];

impl Category {
    /// Upper-case label used in storage and on the wire, e.g. `"SEATING"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Seating => "SEATING",
            Category::Desks => "DESKS",
            Category::Storage => "STORAGE",
            Category::Tables => "TABLES",
            Category::Accessories => "ACCESSORIES",
            Category::Lighting => "LIGHTING",
            Category::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the taxonomy labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Parses an exact upper-case label. Lower-case input is rejected so that
    /// stored values and query parameters share one spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORIES
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Classifies a product from its raw tag string, product type and title.
///
/// Matching is case-insensitive substring matching, evaluated in a fixed
/// order where the first rule that matches wins:
///
/// | Category | tags | product type | title |
/// |----------|------|--------------|-------|
/// | `SEATING` | `seating` | `chair` | `chair` |
/// | `DESKS` | `desk` | `desk` | `desk` |
/// | `STORAGE` | `storage` | `storage` | `cabinet` |
/// | `TABLES` | `table` | `table` | `table` |
/// | `LIGHTING` | `lighting` | `lighting` | `lamp` |
/// | `ACCESSORIES` | `accessory` | `accessory` | (none) |
///
/// Anything else is [`Category::Other`]. A "Chair Table Set" is therefore
/// seating, never tables.
#[must_use]
pub fn classify(tags: &str, product_type: &str, title: &str) -> Category {
    let tags = tags.to_lowercase();
    let kind = product_type.to_lowercase();
    let title = title.to_lowercase();

    let rule = |tag_kw: &str, type_kw: &str, title_kw: Option<&str>| {
        tags.contains(tag_kw)
            || kind.contains(type_kw)
            || title_kw.is_some_and(|kw| title.contains(kw))
    };

    if rule("seating", "chair", Some("chair")) {
        Category::Seating
    } else if rule("desk", "desk", Some("desk")) {
        Category::Desks
    } else if rule("storage", "storage", Some("cabinet")) {
        Category::Storage
    } else if rule("table", "table", Some("table")) {
        Category::Tables
    } else if rule("lighting", "lighting", Some("lamp")) {
        Category::Lighting
    } else if rule("accessory", "accessory", None) {
        Category::Accessories
    } else {
        Category::Other
    }
}
