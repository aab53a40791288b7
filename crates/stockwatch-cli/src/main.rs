mod alerts;
mod inventory;
mod sync;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use stockwatch_core::{Category, DEFAULT_LOW_STOCK_THRESHOLD};
use stockwatch_db::PgStore;
use stockwatch_engine::DEFAULT_INVENTORY_UPDATES_LIMIT;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "stockwatch")]
#[command(about = "Inventory sync and stock alert operator tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the catalog, persist products, then refresh alerts
    Sync,
    /// Open or refresh alerts for every low-stock and out-of-stock product
    CheckAlerts,
    /// List stored products
    Products {
        /// Only show one category (e.g. SEATING)
        #[arg(long, conflicts_with = "grouped")]
        category: Option<Category>,
        /// Print one section per category
        #[arg(long)]
        grouped: bool,
    },
    /// List products with 0 < inventory < threshold
    LowStock {
        #[arg(long, default_value_t = DEFAULT_LOW_STOCK_THRESHOLD)]
        threshold: i64,
    },
    /// List products with zero inventory
    OutOfStock,
    /// Show dashboard totals and the per-category breakdown
    Stats {
        /// Only show one category
        #[arg(long)]
        category: Option<Category>,
    },
    /// Show the most recent inventory changes
    Updates {
        #[arg(long, default_value_t = DEFAULT_INVENTORY_UPDATES_LIMIT)]
        limit: i64,
    },
    /// Inspect and resolve stock alerts
    Alerts {
        #[command(subcommand)]
        command: AlertCommands,
    },
    /// Apply pending database migrations
    Migrate,
}

#[derive(Debug, Subcommand)]
enum AlertCommands {
    /// List open alerts, most severe first
    List,
    /// Show one alert, open or resolved
    Show { alert_id: Uuid },
    /// Mark an alert as resolved
    Resolve { alert_id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("no command given; run `stockwatch --help`");
        return Ok(());
    };

    let config = stockwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = stockwatch_db::PoolConfig::from_app_config(&config);
    let pool = stockwatch_db::connect_pool(&config.database_url, pool_config).await?;

    if matches!(command, Commands::Migrate) {
        let applied = stockwatch_db::run_migrations(&pool).await?;
        println!("migrations up to date ({applied} applied)");
        return Ok(());
    }

    let store = Arc::new(PgStore::new(pool));

    match command {
        Commands::Sync => sync::run_sync(&config, store).await?,
        Commands::CheckAlerts => alerts::run_check_alerts(store).await?,
        Commands::Products { category, grouped } => {
            inventory::run_products(store, category, grouped).await?;
        }
        Commands::LowStock { threshold } => inventory::run_low_stock(store, threshold).await?,
        Commands::OutOfStock => inventory::run_out_of_stock(store).await?,
        Commands::Stats { category } => inventory::run_stats(store, category).await?,
        Commands::Updates { limit } => inventory::run_updates(store, limit).await?,
        Commands::Alerts { command } => match command {
            AlertCommands::List => alerts::run_list_alerts(store).await?,
            AlertCommands::Show { alert_id } => alerts::run_show_alert(store, alert_id).await?,
            AlertCommands::Resolve { alert_id } => {
                alerts::run_resolve_alert(store, alert_id).await?;
            }
        },
        Commands::Migrate => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests;
