//! Client-local stores: favorites, cart, and the login session.
//!
//! Each store is an explicit object over a shared [`Storage`] and is handed
//! to whatever needs it. Favorites and cart publish change events on a
//! `tokio::sync::broadcast` channel.

pub mod cart;
pub mod error;
pub mod favorites;
pub mod session;
pub mod storage;

pub use cart::{CartChanged, CartStore, CART_KEY};
pub use error::StoreError;
pub use favorites::{parse_favorites, FavoritesChanged, FavoritesStore, FAVORITES_KEY};
pub use session::{SessionStore, TOKEN_KEY, USER_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage};
