//! HTTP client for the storefront's mock-CRUD backend.
//!
//! One base URL per collection, plain REST verbs, JSON bodies, no auth
//! headers. The backend does no filtering or paging of its own, so every
//! list call fetches the whole collection.

use std::time::Duration;

use divan_core::{AppConfig, Booking, EndpointConfig, FavoriteRecord, Order, Product, Review, User};
use reqwest::{Client, Url};

use crate::entity::Entity;
use crate::error::ApiError;
use crate::resource::Resource;

pub const DEFAULT_USER_AGENT: &str = "divan/0.1 (storefront-client)";

/// HTTP-level settings shared by every collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ClientSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct Endpoints {
    products: Url,
    seed_products: Url,
    orders: Url,
    users: Url,
    reviews: Url,
    bookings: Option<Url>,
    favorites: Option<Url>,
}

/// Gateway to every remote collection.
///
/// Use [`ApiClient::new`] with configured endpoints, or
/// [`ApiClient::with_base_url`] to serve every collection from one host
/// (a wiremock server in tests).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    endpoints: Endpoints,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`ApiError::InvalidBaseUrl`] if an endpoint does not parse.
    pub fn new(endpoints: &EndpointConfig, settings: &ClientSettings) -> Result<Self, ApiError> {
        let optional = |raw: Option<&String>| raw.map(String::as_str).map(parse_base).transpose();
        let endpoints = Endpoints {
            products: parse_base(&endpoints.products)?,
            seed_products: parse_base(&endpoints.seed_products)?,
            orders: parse_base(&endpoints.orders)?,
            users: parse_base(&endpoints.users)?,
            reviews: parse_base(&endpoints.reviews)?,
            bookings: optional(endpoints.bookings.as_ref())?,
            favorites: optional(endpoints.favorites.as_ref())?,
        };
        Ok(Self {
            http: build_http(settings)?,
            endpoints,
        })
    }

    /// Builds a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(&config.endpoints, &ClientSettings::from_config(config))
    }

    /// Serves every collection from `{base_url}/{collection}`; the seeding
    /// target is `{base_url}/seed-products`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn with_base_url(base_url: &str, settings: &ClientSettings) -> Result<Self, ApiError> {
        let base = base_url.trim_end_matches('/');
        let at = |path: &str| format!("{base}/{path}");
        let endpoints = EndpointConfig {
            products: at(Entity::Products.as_str()),
            seed_products: at("seed-products"),
            orders: at(Entity::Orders.as_str()),
            users: at(Entity::Users.as_str()),
            reviews: at(Entity::Reviews.as_str()),
            bookings: Some(at(Entity::Bookings.as_str())),
            favorites: Some(at(Entity::Favorites.as_str())),
        };
        Self::new(&endpoints, settings)
    }

    #[must_use]
    pub fn products(&self) -> Resource<Product> {
        self.resource(Entity::Products, Some(&self.endpoints.products))
    }

    /// Product collection written by the seeding command.
    #[must_use]
    pub fn seed_products_resource(&self) -> Resource<Product> {
        self.resource(Entity::Products, Some(&self.endpoints.seed_products))
    }

    #[must_use]
    pub fn orders(&self) -> Resource<Order> {
        self.resource(Entity::Orders, Some(&self.endpoints.orders))
    }

    #[must_use]
    pub fn users(&self) -> Resource<User> {
        self.resource(Entity::Users, Some(&self.endpoints.users))
    }

    #[must_use]
    pub fn reviews(&self) -> Resource<Review> {
        self.resource(Entity::Reviews, Some(&self.endpoints.reviews))
    }

    #[must_use]
    pub fn bookings(&self) -> Resource<Booking> {
        self.resource(Entity::Bookings, self.endpoints.bookings.as_ref())
    }

    #[must_use]
    pub fn favorites(&self) -> Resource<FavoriteRecord> {
        self.resource(Entity::Favorites, self.endpoints.favorites.as_ref())
    }

    fn resource<T>(&self, entity: Entity, base: Option<&Url>) -> Resource<T> {
        Resource::new(self.http.clone(), entity, base.cloned())
    }
}

fn build_http(settings: &ClientSettings) -> Result<Client, ApiError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(settings.user_agent.as_str())
        .build()?)
}

fn parse_base(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim().trim_end_matches('/')).map_err(|e| ApiError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl {
            url: raw.to_owned(),
            reason: "URL cannot carry a path".to_owned(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_base_url_lays_out_collections() {
        let client = ApiClient::with_base_url("http://127.0.0.1:9/", &ClientSettings::default())
            .expect("client construction should not fail");
        assert_eq!(
            client.endpoints.products.as_str(),
            "http://127.0.0.1:9/products"
        );
        assert_eq!(
            client.endpoints.seed_products.as_str(),
            "http://127.0.0.1:9/seed-products"
        );
        assert!(client.endpoints.bookings.is_some());
    }

    #[test]
    fn unset_optional_endpoints_stay_unset() {
        let endpoints = EndpointConfig {
            products: "https://a.example/productss".to_owned(),
            seed_products: "https://a.example/products".to_owned(),
            orders: "https://b.example/orders".to_owned(),
            users: "https://a.example/users".to_owned(),
            reviews: "https://c.example/reviews".to_owned(),
            bookings: None,
            favorites: None,
        };
        let client = ApiClient::new(&endpoints, &ClientSettings::default()).unwrap();
        assert!(client.endpoints.bookings.is_none());
        assert!(client.endpoints.favorites.is_none());
        assert_ne!(client.endpoints.products, client.endpoints.seed_products);
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let err = ApiClient::with_base_url("not a url", &ClientSettings::default()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    }
}
