use crate::app_config::{AppConfig, EndpointConfig, Environment};
use crate::locale::Locale;
use crate::ConfigError;

pub const DEFAULT_PRODUCTS_URL: &str = "https://6968854769178471522ab887.mockapi.io/productss";
pub const DEFAULT_SEED_PRODUCTS_URL: &str = "https://6968854769178471522ab887.mockapi.io/products";
pub const DEFAULT_ORDERS_URL: &str = "https://6969e5563a2b2151f8467c2f.mockapi.io/orders";
pub const DEFAULT_USERS_URL: &str = "https://6968854769178471522ab887.mockapi.io/users";
pub const DEFAULT_REVIEWS_URL: &str = "https://6969e4093a2b2151f8467813.mockapi.io/reviews";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default except the bookings and favorites endpoints,
/// which stay unset unless provided.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        validate_url(&raw).map_err(|reason| invalid(var, reason))
    };

    let optional_url = |var: &str| -> Result<Option<String>, ConfigError> {
        match lookup(var) {
            Ok(raw) if !raw.trim().is_empty() => validate_url(&raw)
                .map(Some)
                .map_err(|reason| invalid(var, reason)),
            _ => Ok(None),
        }
    };

    let env = parse_environment(&or_default("DIVAN_ENV", "development"))
        .map_err(|reason| invalid("DIVAN_ENV", reason))?;
    let log_level = or_default("DIVAN_LOG_LEVEL", "info");
    let locale = or_default("DIVAN_LOCALE", "kg")
        .parse::<Locale>()
        .map_err(|e| invalid("DIVAN_LOCALE", e.to_string()))?;
    let data_dir = PathBuf::from(or_default("DIVAN_DATA_DIR", "./.divan"));

    let endpoints = EndpointConfig {
        products: parse_url("DIVAN_PRODUCTS_URL", DEFAULT_PRODUCTS_URL)?,
        seed_products: parse_url("DIVAN_SEED_PRODUCTS_URL", DEFAULT_SEED_PRODUCTS_URL)?,
        orders: parse_url("DIVAN_ORDERS_URL", DEFAULT_ORDERS_URL)?,
        users: parse_url("DIVAN_USERS_URL", DEFAULT_USERS_URL)?,
        reviews: parse_url("DIVAN_REVIEWS_URL", DEFAULT_REVIEWS_URL)?,
        bookings: optional_url("DIVAN_BOOKINGS_URL")?,
        favorites: optional_url("DIVAN_FAVORITES_URL")?,
    };

    let request_timeout_secs = parse_u64("DIVAN_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DIVAN_USER_AGENT", "divan/0.1 (storefront-client)");
    let seed_delay_ms = parse_u64("DIVAN_SEED_DELAY_MS", "500")?;

    Ok(AppConfig {
        env,
        log_level,
        locale,
        data_dir,
        endpoints,
        request_timeout_secs,
        user_agent,
        seed_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, String> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(format!(
            "unknown environment \"{other}\" (expected development, test or production)"
        )),
    }
}

/// Trims trailing slashes and requires an http(s) scheme with a host.
fn validate_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| format!("\"{raw}\" is not an http(s) URL"))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(format!("\"{raw}\" has no host"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
