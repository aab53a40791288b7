pub mod alerts;
pub mod app_config;
pub mod category;
pub mod config;
pub mod products;
pub mod stats;

pub use alerts::{
    low_stock_severity, Alert, AlertType, NewAlert, Severity, LOW_STOCK_HIGH_SEVERITY_MAX,
};
pub use app_config::{AppConfig, Environment};
pub use category::{classify, Category, UnknownCategory, CATEGORIES};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{merge_product, InventoryUpdate, Product, ProductStatus};
pub use stats::{
    category_stats, dashboard_stats, is_low_stock, is_out_of_stock, CategoryStats, DashboardStats,
    DEFAULT_LOW_STOCK_THRESHOLD,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
