//! Shopping cart kept in local storage.

use std::sync::Arc;

use divan_core::{cart_total, CartLine, Product, ProductId, ValidationError};
use rust_decimal::Decimal;
use tokio::sync::broadcast;

use crate::storage::Storage;
use crate::StoreError;

pub const CART_KEY: &str = "cart";

const EVENT_CAPACITY: usize = 16;

/// Sent after every mutation with the cart as written.
#[derive(Debug, Clone, PartialEq)]
pub struct CartChanged {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

pub struct CartStore {
    storage: Arc<dyn Storage>,
    events: broadcast::Sender<CartChanged>,
}

impl CartStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { storage, events }
    }

    /// Current lines in insertion order. A corrupt payload reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if storage cannot be read.
    pub fn lines(&self) -> Result<Vec<CartLine>, StoreError> {
        let Some(raw) = self.storage.read(CART_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<CartLine>>(&raw) {
            Ok(lines) => Ok(lines
                .into_iter()
                .filter(|l| l.product_id().is_some_and(|id| !id.is_blank()))
                .collect()),
            Err(e) => {
                tracing::warn!(error = %e, "cart payload is unreadable; starting empty");
                Ok(Vec::new())
            }
        }
    }

    /// Adds one unit of `product`.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_quantity`].
    pub fn add(&self, product: Product) -> Result<(), StoreError> {
        self.add_quantity(product, 1)
    }

    /// Adds `quantity` units, merging with an existing line for the same id.
    /// The stored product snapshot is the one added first.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MissingProductId`] if the product has no id.
    /// - [`StoreError::Validation`] if `quantity` is zero.
    pub fn add_quantity(&self, product: Product, quantity: u32) -> Result<(), StoreError> {
        let id = product_key(&product)?;
        if quantity == 0 {
            return Err(ValidationError::InvalidQuantity(0).into());
        }

        let mut lines = self.lines()?;
        match lines.iter_mut().find(|l| l.product_id() == Some(&id)) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => lines.push(CartLine::new(product, quantity)),
        }
        self.persist(lines)
    }

    /// Sets the quantity of a line. Anything below 1 removes the line; an
    /// unknown id is a no-op. Returns `false` when no line has `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failure.
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) -> Result<bool, StoreError> {
        if quantity < 1 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let mut lines = self.lines()?;
        let Some(line) = lines.iter_mut().find(|l| l.product_id() == Some(id)) else {
            return Ok(false);
        };
        line.quantity = quantity;
        self.persist(lines)?;
        Ok(true)
    }

    /// Returns `false` when no line has `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failure.
    pub fn remove(&self, id: &ProductId) -> Result<bool, StoreError> {
        let mut lines = self.lines()?;
        let before = lines.len();
        lines.retain(|l| l.product_id() != Some(id));
        if lines.len() == before {
            return Ok(false);
        }
        self.persist(lines)?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failure.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.persist(Vec::new())
    }

    /// `Σ price × quantity` over the current lines.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if storage cannot be read.
    pub fn total(&self) -> Result<Decimal, StoreError> {
        Ok(cart_total(&self.lines()?))
    }

    /// Units across all lines.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if storage cannot be read.
    pub fn item_count(&self) -> Result<u64, StoreError> {
        Ok(self.lines()?.iter().map(|l| u64::from(l.quantity)).sum())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.events.subscribe()
    }

    fn persist(&self, lines: Vec<CartLine>) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&lines).map_err(|source| StoreError::Serialize {
            key: CART_KEY.to_string(),
            source,
        })?;
        self.storage.write(CART_KEY, &raw)?;
        let total = cart_total(&lines);
        tracing::debug!(lines = lines.len(), %total, "cart updated");
        let _ = self.events.send(CartChanged { lines, total });
        Ok(())
    }
}

fn product_key(product: &Product) -> Result<ProductId, StoreError> {
    product
        .id
        .clone()
        .filter(|id| !id.is_blank())
        .ok_or(StoreError::MissingProductId)
}
