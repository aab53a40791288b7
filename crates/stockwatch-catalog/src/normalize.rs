//! Normalization from raw catalog types to [`stockwatch_core::Product`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use stockwatch_core::{classify, Product, ProductStatus};

use crate::types::{CatalogProduct, RawPrice, RawQuantity, RawTags};

/// Normalizes a raw [`CatalogProduct`] into a canonical [`Product`].
///
/// Only the first variant is read. Missing or unparseable prices and
/// inventory counts become zero, and missing or unparseable timestamps fall
/// back to `fetched_at`. Negative inventory is kept as received.
#[must_use]
pub fn normalize_product(raw: CatalogProduct, fetched_at: DateTime<Utc>) -> Product {
    let id = raw.id.to_string();
    let title = raw.title.unwrap_or_default();
    let product_type = raw.product_type.filter(|s| !s.trim().is_empty());

    let raw_tags = match &raw.tags {
        Some(RawTags::Joined(joined)) => joined.clone(),
        Some(RawTags::List(list)) => list.join(", "),
        None => String::new(),
    };
    let category = classify(&raw_tags, product_type.as_deref().unwrap_or(""), &title);
    let tags = raw.tags.map(split_tags);

    let variant = raw.variants.into_iter().next().unwrap_or_default();
    let inventory = match variant.inventory_quantity.as_ref() {
        None => 0,
        Some(raw_quantity) => parse_quantity(raw_quantity).unwrap_or_else(|| {
            tracing::warn!(
                product_id = %id,
                raw = ?raw_quantity,
                "unparseable inventory quantity; treating as zero"
            );
            0
        }),
    };
    if inventory < 0 {
        tracing::warn!(
            product_id = %id,
            inventory,
            "catalog reported negative inventory; storing as received"
        );
    }

    let image_url = raw
        .image
        .and_then(|image| image.src)
        .or_else(|| raw.images.into_iter().next().and_then(|image| image.src))
        .filter(|src| !src.is_empty());

    let status = raw
        .status
        .as_deref()
        .and_then(ProductStatus::parse)
        .unwrap_or_default();

    Product {
        sku: variant.sku.unwrap_or_default(),
        price: variant
            .price
            .as_ref()
            .and_then(parse_price)
            .unwrap_or(Decimal::ZERO),
        compare_at_price: variant.compare_at_price.as_ref().and_then(parse_price),
        inventory,
        category,
        image_url,
        vendor: raw.vendor.filter(|s| !s.trim().is_empty()),
        product_type,
        tags,
        status,
        created_at: parse_timestamp(raw.created_at.as_deref()).unwrap_or(fetched_at),
        updated_at: parse_timestamp(raw.updated_at.as_deref()).unwrap_or(fetched_at),
        id,
        title,
    }
}

/// Parses a price from either wire shape. Empty and unparseable values yield
/// `None`.
pub(crate) fn parse_price(raw: &RawPrice) -> Option<Decimal> {
    let text = match raw {
        RawPrice::Number(n) => n.to_string(),
        RawPrice::Text(s) => s.trim().to_owned(),
    };
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Parses an inventory count. Whole-valued floats such as `5.0` are
/// accepted; fractions and non-numeric text are not.
pub(crate) fn parse_quantity(raw: &RawQuantity) -> Option<i64> {
    match raw {
        RawQuantity::Number(n) => n.as_i64().or_else(|| whole_number(n.as_f64()?)),
        RawQuantity::Text(s) => {
            let text = s.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| whole_number(text.parse::<f64>().ok()?))
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn whole_number(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

fn split_tags(raw: RawTags) -> Vec<String> {
    let parts: Vec<String> = match raw {
        RawTags::Joined(joined) => joined.split(',').map(str::to_owned).collect(),
        RawTags::List(list) => list,
    };
    parts
        .into_iter()
        .map(|tag| tag.trim().to_owned())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw?.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
