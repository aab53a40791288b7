//! Response types for the catalog API's `GET /products` endpoint.
//!
//! The upstream is loose about scalar types: product ids arrive as numbers or
//! strings, prices as decimal strings or JSON numbers, and tags as a single
//! comma-separated string (some deployments send an array). The raw types here
//! accept every observed shape and leave interpretation to
//! [`normalize`](crate::normalize).

use serde::Deserialize;

/// Top-level response from `GET /products`.
#[derive(Debug, Deserialize)]
pub struct CatalogProductsResponse {
    #[serde(default)]
    pub products: Vec<CatalogProduct>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{n}"),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

/// A price as sent upstream, either `"129.00"` or `129.0`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

/// An inventory count as sent upstream: `7`, `7.0` or `"7"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(serde_json::Number),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    Joined(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub src: Option<String>,
}

/// A single product as returned by the catalog API.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    pub id: RawId,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub vendor: Option<String>,

    /// May be an empty string; treated as absent during normalization.
    #[serde(default)]
    pub product_type: Option<String>,

    #[serde(default)]
    pub tags: Option<RawTags>,

    /// `active`, `draft` or `archived`. Anything else becomes `active`.
    #[serde(default)]
    pub status: Option<String>,

    /// RFC 3339 timestamp string.
    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    /// Featured image. Falls back to the first of `images`.
    #[serde(default)]
    pub image: Option<RawImage>,

    #[serde(default)]
    pub images: Vec<RawImage>,

    /// Only the first variant is read.
    #[serde(default)]
    pub variants: Vec<CatalogVariant>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogVariant {
    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub price: Option<RawPrice>,

    #[serde(default)]
    pub compare_at_price: Option<RawPrice>,

    #[serde(default)]
    pub inventory_quantity: Option<RawQuantity>,
}
