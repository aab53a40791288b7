pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
mod rate_limit;
pub mod types;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use normalize::normalize_product;
pub use types::{CatalogProduct, CatalogProductsResponse, CatalogVariant};
