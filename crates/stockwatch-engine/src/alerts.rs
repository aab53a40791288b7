//! Stock alert lifecycle.
//!
//! Per `(product_id, alert_type)` an alert moves `open -> resolved`. An open
//! alert is refreshed in place by later checks; once resolved it is terminal
//! and the next observation opens a new occurrence.

use std::sync::Arc;

use chrono::Utc;
use stockwatch_core::{Alert, AlertType, NewAlert, Product, DEFAULT_LOW_STOCK_THRESHOLD};
use stockwatch_db::{AlertStore, ProductStore};
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Debug)]
pub struct AlertService<S> {
    store: Arc<S>,
}

impl<S> Clone for AlertService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ProductStore + AlertStore> AlertService<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Opens or refreshes an alert for every out-of-stock and low-stock
    /// product. Returns every alert touched, out-of-stock first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read or written.
    pub async fn check_inventory_levels(&self) -> Result<Vec<Alert>, EngineError> {
        let out_of_stock = self.store.list_out_of_stock_products().await?;
        let low_stock = self
            .store
            .list_low_stock_products(DEFAULT_LOW_STOCK_THRESHOLD)
            .await?;

        let now = Utc::now();
        let candidates = out_of_stock
            .iter()
            .map(NewAlert::out_of_stock)
            .chain(low_stock.iter().map(NewAlert::low_stock));

        let mut touched = Vec::with_capacity(out_of_stock.len() + low_stock.len());
        let mut created = 0usize;
        for candidate in candidates {
            let upsert = self.store.upsert_open_alert(&candidate, now).await?;
            if upsert.created {
                created += 1;
                tracing::info!(
                    alert_id = %upsert.alert.id,
                    product_id = %upsert.alert.product_id,
                    alert_type = %upsert.alert.alert_type,
                    severity = %upsert.alert.severity,
                    "alert opened"
                );
            }
            touched.push(upsert.alert);
        }

        tracing::info!(
            alerts = touched.len(),
            created,
            refreshed = touched.len() - created,
            "inventory levels checked"
        );
        Ok(touched)
    }

    /// Marks an alert resolved. Resolving an already-resolved alert succeeds
    /// and leaves its `resolved_at` unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlertNotFound`] for an unknown id and
    /// [`EngineError::Store`] if the store cannot be written.
    pub async fn resolve_alert(&self, alert_id: Uuid) -> Result<Alert, EngineError> {
        let alert = self
            .store
            .resolve_alert(alert_id, Utc::now())
            .await?
            .ok_or(EngineError::AlertNotFound(alert_id))?;
        tracing::info!(alert_id = %alert.id, "alert resolved");
        Ok(alert)
    }

    /// Resolves alerts whose condition no longer holds for `product`:
    /// open low-stock alerts once inventory reaches the threshold, open
    /// out-of-stock alerts once inventory is positive. The two checks are
    /// independent. Returns how many alerts were resolved.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be written.
    pub async fn auto_resolve_alerts(&self, product: &Product) -> Result<u64, EngineError> {
        let now = Utc::now();
        let mut resolved = 0;

        if product.inventory >= DEFAULT_LOW_STOCK_THRESHOLD {
            resolved += self
                .store
                .resolve_open_alerts(&product.id, AlertType::LowStock, now)
                .await?;
        }
        if product.inventory > 0 {
            resolved += self
                .store
                .resolve_open_alerts(&product.id, AlertType::OutOfStock, now)
                .await?;
        }

        if resolved > 0 {
            tracing::info!(
                product_id = %product.id,
                inventory = product.inventory,
                resolved,
                "alerts auto-resolved"
            );
        }
        Ok(resolved)
    }

    /// Unresolved alerts, highest severity first, newest first within a
    /// severity.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the store cannot be read.
    pub async fn get_active_alerts(&self) -> Result<Vec<Alert>, EngineError> {
        Ok(self.store.list_open_alerts().await?)
    }

    /// # Errors
    ///
    /// Returns [`EngineError::AlertNotFound`] for an unknown id.
    pub async fn get_alert(&self, alert_id: Uuid) -> Result<Alert, EngineError> {
        self.store
            .get_alert(alert_id)
            .await?
            .ok_or(EngineError::AlertNotFound(alert_id))
    }
}
