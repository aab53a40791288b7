use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Product;

/// Low-stock alerts at or below this many units are raised as [`Severity::High`].
pub const LOW_STOCK_HIGH_SEVERITY_MAX: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LowStock,
    OutOfStock,
    Restock,
}

impl AlertType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::LowStock => "low_stock",
            AlertType::OutOfStock => "out_of_stock",
            AlertType::Restock => "restock",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "low_stock" => Some(AlertType::LowStock),
            "out_of_stock" => Some(AlertType::OutOfStock),
            "restock" => Some(AlertType::Restock),
            _ => None,
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency used for ordering and display only.
///
/// Variants are declared low to high so the derived `Ord` ranks `High` above
/// `Medium` above `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }

    /// Numeric rank persisted next to the label so the store can order by it.
    #[must_use]
    pub fn rank(self) -> i16 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity for a low-stock observation: `high` at or below five units,
/// `medium` otherwise.
#[must_use]
pub fn low_stock_severity(inventory: i64) -> Severity {
    if inventory <= LOW_STOCK_HIGH_SEVERITY_MAX {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// A persisted stock alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub product_id: String,
    pub product_title: String,
    pub sku: String,
    pub current_inventory: i64,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// The observation-derived part of an alert, before the store assigns an id
/// and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub alert_type: AlertType,
    pub product_id: String,
    pub product_title: String,
    pub sku: String,
    pub current_inventory: i64,
    pub message: String,
    pub severity: Severity,
}

impl NewAlert {
    #[must_use]
    pub fn out_of_stock(product: &Product) -> Self {
        Self {
            alert_type: AlertType::OutOfStock,
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            sku: product.sku.clone(),
            current_inventory: 0,
            message: format!("{} is out of stock", product.title),
            severity: Severity::High,
        }
    }

    #[must_use]
    pub fn low_stock(product: &Product) -> Self {
        Self {
            alert_type: AlertType::LowStock,
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            sku: product.sku.clone(),
            current_inventory: product.inventory,
            message: format!(
                "{} is running low ({} remaining)",
                product.title, product.inventory
            ),
            severity: low_stock_severity(product.inventory),
        }
    }
}
