use chrono::Utc;
use divan_core::order::newest_first;
use divan_core::{CartLine, Order, OrderStatus, RecordId, UserId, ValidationError};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the order list cannot be fetched.
    pub async fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, ApiError> {
        let orders = self.orders().get_all().await?;
        Ok(newest_first(
            orders.into_iter().filter(|o| o.belongs_to(user_id)).collect(),
        ))
    }

    /// Submits the cart as a new pending order.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] if `lines` is empty.
    /// - Any failure creating the order.
    pub async fn place_order(
        &self,
        user_id: &UserId,
        lines: Vec<CartLine>,
    ) -> Result<Order, ApiError> {
        if lines.is_empty() {
            return Err(ValidationError::MissingField("items").into());
        }
        let order = Order::from_cart(user_id.clone(), lines, Utc::now());
        let order = self.orders().create(&order).await?;
        tracing::info!(
            user_id = %user_id,
            order_id = ?order.id,
            total = %order.total,
            "order placed"
        );
        Ok(order)
    }

    /// Changes an order's status with a full-record PUT; every other field is
    /// written back as fetched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the order cannot be fetched or updated.
    pub async fn set_order_status(
        &self,
        order_id: &RecordId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let orders = self.orders();
        let mut order = orders.get_by_id(order_id).await?;
        let previous = order.status;
        order.status = status;
        let order = orders.update(order_id, &order).await?;
        tracing::info!(order_id = %order_id, from = %previous, to = %status, "order status changed");
        Ok(order)
    }
}
