use std::fmt::Write as _;
use std::sync::Arc;

use stockwatch_core::Alert;
use stockwatch_db::{AlertStore, ProductStore};
use stockwatch_engine::AlertService;
use uuid::Uuid;

pub(crate) async fn run_check_alerts<S>(store: Arc<S>) -> anyhow::Result<()>
where
    S: ProductStore + AlertStore,
{
    let touched = AlertService::new(store).check_inventory_levels().await?;
    if touched.is_empty() {
        println!("all products are above the low-stock threshold");
        return Ok(());
    }
    println!("{} alerts open or refreshed", touched.len());
    print!("{}", render_alerts(&touched));
    Ok(())
}

pub(crate) async fn run_list_alerts<S>(store: Arc<S>) -> anyhow::Result<()>
where
    S: ProductStore + AlertStore,
{
    let alerts = AlertService::new(store).get_active_alerts().await?;
    if alerts.is_empty() {
        println!("no open alerts");
        return Ok(());
    }
    print!("{}", render_alerts(&alerts));
    Ok(())
}

pub(crate) async fn run_show_alert<S>(store: Arc<S>, alert_id: Uuid) -> anyhow::Result<()>
where
    S: ProductStore + AlertStore,
{
    let alert = AlertService::new(store).get_alert(alert_id).await?;
    print!("{}", render_alert_detail(&alert));
    Ok(())
}

pub(crate) async fn run_resolve_alert<S>(store: Arc<S>, alert_id: Uuid) -> anyhow::Result<()>
where
    S: ProductStore + AlertStore,
{
    let alert = AlertService::new(store).resolve_alert(alert_id).await?;
    println!("resolved alert {} ({})", alert.id, alert.message);
    Ok(())
}

pub(crate) fn render_alerts(alerts: &[Alert]) -> String {
    let mut out = format!(
        "{:<38}{:<14}{:<9}{:>10}  MESSAGE\n",
        "ID", "TYPE", "SEVERITY", "INVENTORY"
    );
    for a in alerts {
        let _ = writeln!(
            out,
            "{:<38}{:<14}{:<9}{:>10}  {}",
            a.id,
            a.alert_type.as_str(),
            a.severity.as_str(),
            a.current_inventory,
            a.message
        );
    }
    out
}

pub(crate) fn render_alert_detail(alert: &Alert) -> String {
    let status = match alert.resolved_at {
        Some(at) => format!("resolved at {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => "open".to_string(),
    };
    let mut out = String::new();
    let _ = writeln!(out, "Alert:     {}", alert.id);
    let _ = writeln!(out, "Type:      {}", alert.alert_type);
    let _ = writeln!(out, "Severity:  {}", alert.severity);
    let _ = writeln!(out, "Product:   {} ({})", alert.product_title, alert.product_id);
    let _ = writeln!(out, "SKU:       {}", alert.sku);
    let _ = writeln!(out, "Inventory: {}", alert.current_inventory);
    let _ = writeln!(out, "Message:   {}", alert.message);
    let _ = writeln!(
        out,
        "Opened:    {}",
        alert.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "Status:    {status}");
    out
}
