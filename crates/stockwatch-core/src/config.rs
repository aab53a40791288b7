use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it from a
/// `HashMap` without `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings count as unset so `.env` templates with blank values work.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_num = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("STOCKWATCH_ENV", "development"))?;

    let bind_addr = or_default("STOCKWATCH_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "STOCKWATCH_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;
    let log_level = or_default("STOCKWATCH_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("STOCKWATCH_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("STOCKWATCH_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_num("STOCKWATCH_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let catalog_api_url = optional("ECOMMERCE_API_URL");
    let catalog_api_key = optional("ECOMMERCE_API_KEY");
    let catalog_request_timeout_secs =
        parse_num("STOCKWATCH_CATALOG_REQUEST_TIMEOUT_SECS", "30")?;
    let catalog_user_agent = or_default(
        "STOCKWATCH_CATALOG_USER_AGENT",
        "stockwatch/0.1 (inventory-sync)",
    );
    let catalog_max_retries = parse_u32("STOCKWATCH_CATALOG_MAX_RETRIES", "3")?;
    let catalog_retry_backoff_base_secs =
        parse_num("STOCKWATCH_CATALOG_RETRY_BACKOFF_BASE_SECS", "5")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        catalog_api_url,
        catalog_api_key,
        catalog_request_timeout_secs,
        catalog_user_agent,
        catalog_max_retries,
        catalog_retry_backoff_base_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOCKWATCH_ENV".to_string(),
            reason: format!("expected development, test or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
