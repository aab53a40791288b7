use std::sync::Arc;

use stockwatch_core::{
    category_stats, dashboard_stats, Category, CategoryStats, DashboardStats, CATEGORIES,
};
use stockwatch_db::ProductStore;

use crate::error::EngineError;

/// Read-only rollups over the product store. Each call takes one fresh
/// snapshot, so totals and breakdowns within a result always agree.
#[derive(Debug)]
pub struct StatsService<S> {
    store: Arc<S>,
}

impl<S> Clone for StatsService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ProductStore> StatsService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_category_stats(&self, category: Category) -> Result<CategoryStats, EngineError> {
        let products = self.store.list_products_by_category(category).await?;
        Ok(category_stats(category, &products))
    }

    /// One entry per taxonomy category, in taxonomy order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_all_category_stats(&self) -> Result<Vec<CategoryStats>, EngineError> {
        let products = self.store.list_products().await?;
        Ok(CATEGORIES
            .into_iter()
            .map(|category| category_stats(category, &products))
            .collect())
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats, EngineError> {
        let products = self.store.list_products().await?;
        Ok(dashboard_stats(&products))
    }
}
