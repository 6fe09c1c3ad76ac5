use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use divan_api::ApiClient;
use divan_core::{AppConfig, Locale, SessionUser};
use divan_store::{CartStore, FavoritesStore, FileStorage, SessionStore, Storage};
use rust_decimal::Decimal;

/// Everything a command handler needs, built once in `main`.
pub(crate) struct App {
    pub(crate) config: AppConfig,
    pub(crate) locale: Locale,
    pub(crate) api: ApiClient,
    storage: Arc<dyn Storage>,
}

impl App {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config`.
    pub(crate) fn new(config: AppConfig, locale: Option<Locale>) -> anyhow::Result<Self> {
        let api = ApiClient::from_config(&config).context("failed to build API client")?;
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(config.data_dir.clone()));
        Ok(Self {
            locale: locale.unwrap_or(config.locale),
            config,
            api,
            storage,
        })
    }

    pub(crate) fn favorites(&self) -> FavoritesStore {
        FavoritesStore::new(Arc::clone(&self.storage))
    }

    pub(crate) fn cart(&self) -> CartStore {
        CartStore::new(Arc::clone(&self.storage))
    }

    pub(crate) fn sessions(&self) -> SessionStore {
        SessionStore::new(Arc::clone(&self.storage))
    }

    /// The logged-in user, or an error telling the caller to log in.
    pub(crate) fn require_session(&self) -> anyhow::Result<SessionUser> {
        self.sessions()
            .current()?
            .ok_or_else(|| anyhow::anyhow!("not logged in; run `divan login` first"))
    }

    pub(crate) fn require_admin(&self) -> anyhow::Result<SessionUser> {
        let user = self.require_session()?;
        if !user.is_admin() {
            anyhow::bail!("this command needs an admin account");
        }
        Ok(user)
    }
}

pub(crate) fn fmt_price(price: Decimal) -> String {
    format!("{} сом", price.round_dp(2))
}

/// Format an optional timestamp for display, returning `"—"` when `None`.
pub(crate) fn fmt_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || "\u{2014}".to_string(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Shortens `text` to `max` characters, marking the cut with `...`.
pub(crate) fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
