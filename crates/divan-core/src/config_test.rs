use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn assert_invalid(map: &HashMap<&str, &str>, expected: &str) {
    let result = build_app_config(lookup_from_map(map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected),
        "expected InvalidEnvVar({expected}), got: {result:?}"
    );
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(parse_environment("development"), Ok(Environment::Development));
    assert_eq!(parse_environment("test"), Ok(Environment::Test));
    assert_eq!(parse_environment("production"), Ok(Environment::Production));
}

#[test]
fn parse_environment_unknown_is_error() {
    assert!(parse_environment("staging").is_err());
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.locale, Locale::Kg);
    assert_eq!(cfg.data_dir.to_str(), Some("./.divan"));
    assert_eq!(cfg.endpoints.products, DEFAULT_PRODUCTS_URL);
    assert_eq!(cfg.endpoints.seed_products, DEFAULT_SEED_PRODUCTS_URL);
    assert_eq!(cfg.endpoints.orders, DEFAULT_ORDERS_URL);
    assert_eq!(cfg.endpoints.users, DEFAULT_USERS_URL);
    assert_eq!(cfg.endpoints.reviews, DEFAULT_REVIEWS_URL);
    assert!(cfg.endpoints.bookings.is_none());
    assert!(cfg.endpoints.favorites.is_none());
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "divan/0.1 (storefront-client)");
    assert_eq!(cfg.seed_delay_ms, 500);
}

#[test]
fn products_and_seed_endpoints_differ_by_default() {
    assert_ne!(DEFAULT_PRODUCTS_URL, DEFAULT_SEED_PRODUCTS_URL);
}

#[test]
fn overrides_are_applied() {
    let mut map = HashMap::new();
    map.insert("DIVAN_ENV", "production");
    map.insert("DIVAN_LOCALE", "RU");
    map.insert("DIVAN_DATA_DIR", "/var/lib/divan");
    map.insert("DIVAN_PRODUCTS_URL", "http://localhost:8080/products/");
    map.insert("DIVAN_BOOKINGS_URL", "https://api.example.com/bookings");
    map.insert("DIVAN_REQUEST_TIMEOUT_SECS", "5");
    map.insert("DIVAN_SEED_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.locale, Locale::Ru);
    assert_eq!(cfg.data_dir.to_str(), Some("/var/lib/divan"));
    assert_eq!(cfg.endpoints.products, "http://localhost:8080/products");
    assert_eq!(
        cfg.endpoints.bookings.as_deref(),
        Some("https://api.example.com/bookings")
    );
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.seed_delay_ms, 0);
}

#[test]
fn blank_optional_endpoint_stays_unset() {
    let mut map = HashMap::new();
    map.insert("DIVAN_FAVORITES_URL", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.endpoints.favorites.is_none());
}

#[test]
fn unknown_environment_is_invalid() {
    let mut map = HashMap::new();
    map.insert("DIVAN_ENV", "staging");
    assert_invalid(&map, "DIVAN_ENV");
}

#[test]
fn unknown_locale_is_invalid() {
    let mut map = HashMap::new();
    map.insert("DIVAN_LOCALE", "fr");
    assert_invalid(&map, "DIVAN_LOCALE");
}

#[test]
fn non_http_url_is_invalid() {
    let mut map = HashMap::new();
    map.insert("DIVAN_ORDERS_URL", "ftp://example.com/orders");
    assert_invalid(&map, "DIVAN_ORDERS_URL");
}

#[test]
fn url_without_host_is_invalid() {
    let mut map = HashMap::new();
    map.insert("DIVAN_FAVORITES_URL", "https://");
    assert_invalid(&map, "DIVAN_FAVORITES_URL");
}

#[test]
fn non_numeric_timeout_is_invalid() {
    let mut map = HashMap::new();
    map.insert("DIVAN_REQUEST_TIMEOUT_SECS", "not-a-number");
    assert_invalid(&map, "DIVAN_REQUEST_TIMEOUT_SECS");
}

#[test]
fn negative_seed_delay_is_invalid() {
    let mut map = HashMap::new();
    map.insert("DIVAN_SEED_DELAY_MS", "-1");
    assert_invalid(&map, "DIVAN_SEED_DELAY_MS");
}

#[test]
fn non_numeric_seed_delay_is_invalid() {
    let mut map = HashMap::new();
    map.insert("DIVAN_SEED_DELAY_MS", "soon");
    assert_invalid(&map, "DIVAN_SEED_DELAY_MS");
}
