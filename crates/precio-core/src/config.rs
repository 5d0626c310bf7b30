use crate::app_config::AppConfig;
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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let project_id = require("FIRESTORE_PROJECT_ID")?;
    let database_id = or_default("FIRESTORE_DATABASE_ID", "(default)");
    let auth_token = lookup("FIRESTORE_AUTH_TOKEN").ok();
    let base_url = lookup("FIRESTORE_BASE_URL").ok();

    let collection = or_default("PRECIO_COLLECTION", "products");
    let request_timeout_secs = parse_u64("PRECIO_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("PRECIO_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("PRECIO_RETRY_BACKOFF_BASE_MS", "500")?;
    let log_level = or_default("PRECIO_LOG_LEVEL", "info");

    Ok(AppConfig {
        project_id,
        database_id,
        auth_token,
        base_url,
        collection,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        log_level,
    })
}
