use std::path::PathBuf;

use crate::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Base URL of each remote collection.
///
/// `bookings` and `favorites` have no default deployment; calls against an
/// unset endpoint fail before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub products: String,
    /// Collection the seeding command writes to. Differs from `products` on
    /// the reference deployment, which reads from `productss`.
    pub seed_products: String,
    pub orders: String,
    pub users: String,
    pub reviews: String,
    pub bookings: Option<String>,
    pub favorites: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub locale: Locale,
    pub data_dir: PathBuf,
    pub endpoints: EndpointConfig,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub seed_delay_ms: u64,
}
