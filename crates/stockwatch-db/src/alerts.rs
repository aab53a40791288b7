//! Database operations for `alerts`.

use chrono::{DateTime, Utc};
use stockwatch_core::{Alert, AlertType, NewAlert, Severity};
use uuid::Uuid;

use crate::store::{AlertStore, AlertUpsert, PgStore};
use crate::DbError;

/// A row from the `alerts` table. `severity_rank` exists for ordering only.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertRow {
    pub id: Uuid,
    pub alert_type: String,
    pub product_id: String,
    pub product_title: String,
    pub sku: String,
    pub current_inventory: i64,
    pub message: String,
    pub severity: String,
    pub created_at: DateTime<Utc>,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<AlertRow> for Alert {
    type Error = DbError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        let alert_type = AlertType::parse(&row.alert_type).ok_or_else(|| DbError::InvalidRow {
            table: "alerts",
            column: "alert_type",
            value: row.alert_type.clone(),
        })?;
        let severity = Severity::parse(&row.severity).ok_or_else(|| DbError::InvalidRow {
            table: "alerts",
            column: "severity",
            value: row.severity.clone(),
        })?;

        Ok(Alert {
            id: row.id,
            alert_type,
            product_id: row.product_id,
            product_title: row.product_title,
            sku: row.sku,
            current_inventory: row.current_inventory,
            message: row.message,
            severity,
            created_at: row.created_at,
            resolved: row.resolved,
            resolved_at: row.resolved_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AlertUpsertRow {
    #[sqlx(flatten)]
    alert: AlertRow,
    inserted: bool,
}

const ALERT_COLUMNS: &str = "id, alert_type, product_id, product_title, sku, current_inventory, \
     message, severity, created_at, resolved, resolved_at";

impl AlertStore for PgStore {
    async fn upsert_open_alert(
        &self,
        alert: &NewAlert,
        now: DateTime<Utc>,
    ) -> Result<AlertUpsert, DbError> {
        // `xmax = 0` only holds for a freshly inserted tuple; an updated one
        // carries the id of the updating transaction.
        let row = sqlx::query_as::<_, AlertUpsertRow>(&format!(
            "INSERT INTO alerts \
                 (id, alert_type, product_id, product_title, sku, current_inventory, \
                  message, severity, severity_rank, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (product_id, alert_type) WHERE NOT resolved DO UPDATE SET \
                 current_inventory = EXCLUDED.current_inventory, \
                 message           = EXCLUDED.message, \
                 severity          = EXCLUDED.severity, \
                 severity_rank     = EXCLUDED.severity_rank \
             RETURNING {ALERT_COLUMNS}, (xmax = 0) AS inserted"
        ))
        .bind(Uuid::new_v4())
        .bind(alert.alert_type.as_str())
        .bind(&alert.product_id)
        .bind(&alert.product_title)
        .bind(&alert.sku)
        .bind(alert.current_inventory)
        .bind(&alert.message)
        .bind(alert.severity.as_str())
        .bind(alert.severity.rank())
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(AlertUpsert {
            created: row.inserted,
            alert: Alert::try_from(row.alert)?,
        })
    }

    async fn get_alert(&self, id: Uuid) -> Result<Option<Alert>, DbError> {
        let row = sqlx::query_as::<_, AlertRow>(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(Alert::try_from).transpose()
    }

    async fn resolve_alert(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<Alert>, DbError> {
        let row = sqlx::query_as::<_, AlertRow>(&format!(
            "UPDATE alerts \
             SET resolved = TRUE, resolved_at = COALESCE(resolved_at, $2) \
             WHERE id = $1 \
             RETURNING {ALERT_COLUMNS}"
        ))
        .bind(id)
        .bind(now)
        .fetch_optional(self.pool())
        .await?;

        row.map(Alert::try_from).transpose()
    }

    async fn resolve_open_alerts(
        &self,
        product_id: &str,
        alert_type: AlertType,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            "UPDATE alerts \
             SET resolved = TRUE, resolved_at = $3 \
             WHERE product_id = $1 AND alert_type = $2 AND NOT resolved",
        )
        .bind(product_id)
        .bind(alert_type.as_str())
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_open_alerts(&self) -> Result<Vec<Alert>, DbError> {
        let rows = sqlx::query_as::<_, AlertRow>(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts \
             WHERE NOT resolved \
             ORDER BY severity_rank DESC, created_at DESC, id"
        ))
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(Alert::try_from).collect()
    }
}
