//! Domain types and pure logic for the divan storefront client.
//!
//! Nothing here touches the network or the filesystem; the gateway lives in
//! `divan-api` and the local stores in `divan-store`.

pub mod app_config;
pub mod booking;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod favorite;
pub mod ids;
pub mod locale;
pub mod order;
pub mod product;
pub mod review;
mod serde_helpers;
pub mod user;
pub mod validation;

use thiserror::Error;

pub use app_config::{AppConfig, EndpointConfig, Environment};
pub use booking::{Booking, BookingDraft, BookingStatus, TIME_SLOTS};
pub use cart::{cart_total, CartLine};
pub use catalog::{CatalogFilters, CatalogView, Facet, Page, SortKey, PAGE_SIZE};
pub use config::{load_app_config, load_app_config_from_env};
pub use favorite::FavoriteRecord;
pub use ids::{product_id_from_fields, product_id_from_value, ProductId, RecordId, UserId};
pub use locale::Locale;
pub use order::{Order, OrderStatus};
pub use product::{Category, Product, ProductDraft};
pub use review::{average_rating, Author, Review, ReviewDraft, ReviewWithAuthor};
pub use user::{ProfileUpdate, SessionUser, User, UserRole};
pub use validation::ValidationError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
