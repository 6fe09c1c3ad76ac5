//! Remote data gateway for the divan storefront.
//!
//! [`ApiClient`] hands out a typed [`Resource`] per collection for plain
//! CRUD, and implements the multi-request flows the storefront and admin
//! screens need on top of them.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod client;
pub mod entity;
pub mod error;
pub mod orders;
pub mod profile;
pub mod resource;
pub mod reviews;

pub use admin::{DashboardStats, SeedReport};
pub use auth::{LoginSession, DEMO_TOKEN};
pub use catalog::ProductDetail;
pub use client::{ApiClient, ClientSettings};
pub use entity::Entity;
pub use error::ApiError;
pub use profile::ProfileOverview;
pub use resource::Resource;
pub use reviews::ReviewSubmission;
