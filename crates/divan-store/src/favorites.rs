//! Heart-toggle favorites kept in local storage.
//!
//! The whole list is read, changed, and written back on every toggle. Two
//! processes toggling at the same moment can lose one update; the last
//! write wins. Subscribers are told about every successful toggle made
//! through this store.

use std::sync::Arc;

use divan_core::{product_id_from_value, ProductId};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::storage::Storage;
use crate::StoreError;

pub const FAVORITES_KEY: &str = "favorites";

const EVENT_CAPACITY: usize = 16;

/// Sent after every toggle with the list as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesChanged {
    pub ids: Vec<ProductId>,
}

pub struct FavoritesStore {
    storage: Arc<dyn Storage>,
    events: broadcast::Sender<FavoritesChanged>,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { storage, events }
    }

    /// Current favorite ids in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only if storage itself fails. A corrupt payload
    /// reads as an empty list.
    pub fn ids(&self) -> Result<Vec<ProductId>, StoreError> {
        Ok(self
            .storage
            .read(FAVORITES_KEY)?
            .map(|raw| parse_favorites(&raw))
            .unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if storage cannot be read.
    pub fn is_favorite(&self, id: &ProductId) -> Result<bool, StoreError> {
        Ok(self.ids()?.contains(id))
    }

    /// Adds `id` if absent, removes it otherwise. Returns the new state.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MissingProductId`] for a blank id.
    /// - Any storage failure while reading or writing the list.
    pub fn toggle(&self, id: &ProductId) -> Result<bool, StoreError> {
        if id.is_blank() {
            return Err(StoreError::MissingProductId);
        }

        let mut ids = self.ids()?;
        let now_favorite = if let Some(pos) = ids.iter().position(|f| f == id) {
            ids.remove(pos);
            false
        } else {
            ids.push(id.clone());
            true
        };

        let raw = serde_json::to_string(&ids).map_err(|source| StoreError::Serialize {
            key: FAVORITES_KEY.to_string(),
            source,
        })?;
        self.storage.write(FAVORITES_KEY, &raw)?;
        tracing::debug!(product_id = %id, favorite = now_favorite, "favorites toggled");

        // No receivers is fine.
        let _ = self.events.send(FavoritesChanged { ids });
        Ok(now_favorite)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesChanged> {
        self.events.subscribe()
    }
}

/// Reads a stored favorites payload.
///
/// Entries may be strings, numbers, or objects carrying an id under one of
/// the legacy field names. Unrecognized entries are skipped and duplicates
/// collapse to their first occurrence.
#[must_use]
pub fn parse_favorites(raw: &str) -> Vec<ProductId> {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "favorites payload is not a list; ignoring");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "favorites payload is not valid JSON; ignoring");
            return Vec::new();
        }
    };

    let mut ids: Vec<ProductId> = Vec::with_capacity(entries.len());
    for entry in &entries {
        match product_id_from_value(entry) {
            Some(id) if !ids.contains(&id) => ids.push(id),
            Some(_) => {}
            None => tracing::debug!(?entry, "skipping unrecognized favorites entry"),
        }
    }
    ids
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
