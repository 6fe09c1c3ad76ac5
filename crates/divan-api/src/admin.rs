//! Back-office operations: product editing, the dashboard, and catalog seeding.

use std::time::Duration;

use chrono::Utc;
use divan_core::order::newest_first;
use divan_core::{Locale, Order, Product, ProductDraft, ProductId, User};
use rust_decimal::Decimal;

use crate::client::ApiClient;
use crate::error::ApiError;

pub const DASHBOARD_LATEST_ORDERS: usize = 3;
pub const DASHBOARD_USERS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub product_count: usize,
    pub order_count: usize,
    pub user_count: usize,
    /// Sum of every order's total, whatever its status.
    pub revenue: Decimal,
    pub latest_orders: Vec<Order>,
    pub users: Vec<User>,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(products: &[Product], orders: Vec<Order>, users: Vec<User>) -> Self {
        let revenue = orders
            .iter()
            .map(|o| o.total)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let order_count = orders.len();
        let user_count = users.len();
        let mut latest_orders = newest_first(orders);
        latest_orders.truncate(DASHBOARD_LATEST_ORDERS);
        let mut users = users;
        users.truncate(DASHBOARD_USERS);
        Self {
            product_count: products.len(),
            order_count,
            user_count,
            revenue,
            latest_orders,
            users,
        }
    }
}

/// Tally from [`ApiClient::seed_products`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub failed: usize,
}

impl ApiClient {
    /// Creates a product, or replaces an existing one when `id` is given.
    ///
    /// On edit the stored `createdAt`, `stock`, and any unmodelled fields are
    /// kept; on create `createdAt` is stamped now.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] for a missing title or non-positive price.
    /// - Any fetch, create, or update failure.
    pub async fn save_product(
        &self,
        id: Option<&ProductId>,
        draft: ProductDraft,
    ) -> Result<Product, ApiError> {
        let products = self.products();
        match id {
            Some(id) => {
                let existing = products.get_by_id(id).await?;
                let created_at = existing.created_at.unwrap_or_else(Utc::now);
                let mut product = draft.into_product(created_at)?;
                product.id = Some(id.clone());
                product.stock = existing.stock;
                product.extra = existing.extra;
                let saved = products.update(id, &product).await?;
                tracing::info!(product_id = %id, "product updated");
                Ok(saved)
            }
            None => {
                let product = draft.into_product(Utc::now())?;
                let saved = products.create(&product).await?;
                tracing::info!(product_id = ?saved.id, "product created");
                Ok(saved)
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] if the delete fails.
    pub async fn delete_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let removed = self.products().remove(id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(removed)
    }

    /// Fetches products, orders, and users concurrently and summarizes them.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] among the three fetches.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let (products_res, orders_res, users_res) = (self.products(), self.orders(), self.users());
        let (products, orders, users) = tokio::try_join!(
            products_res.get_all(),
            orders_res.get_all(),
            users_res.get_all(),
        )?;
        Ok(DashboardStats::compute(&products, orders, users))
    }

    /// POSTs each product to the seeding collection one at a time, pausing
    /// `delay` between requests. Failures are counted and logged, never fatal.
    pub async fn seed_products(&self, products: &[Product], delay: Duration) -> SeedReport {
        let target = self.seed_products_resource();
        let total = products.len();
        let mut report = SeedReport::default();
        tracing::info!(total, "seeding products");

        for (i, product) in products.iter().enumerate() {
            let position = i + 1;
            match target.create(product).await {
                Ok(created) => {
                    report.created += 1;
                    tracing::info!(position, total, title = created.title(Locale::Ru), "product seeded");
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        position,
                        total,
                        title = product.title(Locale::Ru),
                        error = %e,
                        "product seed failed"
                    );
                }
            }
            if position < total && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        tracing::info!(created = report.created, failed = report.failed, "seeding finished");
        report
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    #[test]
    fn dashboard_sums_revenue_and_keeps_latest_three() {
        let orders: Vec<Order> = serde_json::from_value(json!([
            { "id": "1", "userId": "u", "total": 100.5, "createdAt": "2025-01-01T00:00:00Z" },
            { "id": "2", "userId": "u", "total": 20, "createdAt": "2025-03-01T00:00:00Z" },
            { "id": "3", "userId": "u", "total": 0.25, "createdAt": "2025-02-01T00:00:00Z" },
            { "id": "4", "userId": "u", "createdAt": "2025-04-01T00:00:00Z" }
        ]))
        .unwrap();
        let users: Vec<User> =
            serde_json::from_value(json!([{ "id": "a" }, { "id": "b" }, { "id": "c" }])).unwrap();

        let stats = DashboardStats::compute(&[], orders, users);
        assert_eq!(stats.order_count, 4);
        assert_eq!(stats.user_count, 3);
        assert_eq!(stats.revenue, Decimal::from_str("120.75").unwrap());
        let latest: Vec<String> = stats
            .latest_orders
            .iter()
            .filter_map(|o| o.id.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(latest, ["4", "2", "3"]);
        assert_eq!(stats.users.len(), 2);
    }
}
