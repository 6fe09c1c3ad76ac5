use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cart::{cart_total, CartLine};
use crate::ids::{RecordId, UserId};
use crate::serde_helpers::{lenient_decimal, lenient_record_id, lenient_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status \"{0}\"")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == lowered)
            .ok_or(UnknownOrderStatus(lowered))
    }
}

/// A submitted cart. The backend only accepts whole-record writes, so
/// unmodelled fields ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Blank when the record has none; such an order belongs to nobody.
    #[serde(default, deserialize_with = "lenient_record_id")]
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Builds a pending order from cart lines, totalling them exactly.
    #[must_use]
    pub fn from_cart(user_id: UserId, lines: Vec<CartLine>, now: DateTime<Utc>) -> Self {
        let total = cart_total(&lines);
        Self {
            id: None,
            user_id,
            items: lines,
            total,
            status: OrderStatus::Pending,
            created_at: Some(now),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn belongs_to(&self, user_id: &UserId) -> bool {
        !self.user_id.is_blank() && &self.user_id == user_id
    }
}

/// Orders sorted newest first; undated orders sink to the end.
#[must_use]
pub fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::product::Product;

    fn order_at(id: &str, day: u32) -> Order {
        Order {
            id: Some(RecordId::from(id)),
            created_at: Some(Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()),
            ..Order::from_cart(RecordId::from("u1"), Vec::new(), Utc::now())
        }
    }

    #[test]
    fn from_cart_totals_lines_and_starts_pending() {
        let product: Product =
            serde_json::from_value(json!({ "id": "p1", "price": 19.99 })).unwrap();
        let order = Order::from_cart(
            RecordId::from("u1"),
            vec![CartLine::new(product, 3)],
            Utc::now(),
        );
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, "59.97".parse::<Decimal>().unwrap());
    }

    #[test]
    fn deserializes_numeric_user_id_and_keeps_extra_fields() {
        let order: Order = serde_json::from_value(json!({
            "id": "5",
            "userId": 42,
            "items": [],
            "total": 100,
            "status": "processing",
            "address": "Bishkek"
        }))
        .unwrap();
        assert!(order.belongs_to(&RecordId::from("42")));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.extra["address"], json!("Bishkek"));
    }

    #[test]
    fn newest_first_orders_by_timestamp_descending() {
        let mut undated = order_at("0", 1);
        undated.created_at = None;
        let sorted = newest_first(vec![order_at("1", 2), undated, order_at("2", 9)]);
        let ids: Vec<_> = sorted
            .iter()
            .map(|o| o.id.as_ref().unwrap().as_str().to_owned())
            .collect();
        assert_eq!(ids, ["2", "1", "0"]);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Cancelled".parse::<OrderStatus>().unwrap(),
            OrderStatus::Cancelled
        );
        assert!("shipped".parse::<OrderStatus>().is_err());
    }
}
