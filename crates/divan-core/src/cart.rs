use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::ProductId;
use crate::product::Product;

/// One product in the cart together with the requested quantity.
///
/// Serialized flat (product fields plus `quantity`) so a line reads the same
/// in local storage and inside a submitted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            product,
            quantity: quantity.max(1),
        }
    }

    #[must_use]
    pub fn product_id(&self) -> Option<&ProductId> {
        self.product.id.as_ref()
    }

    /// `price × quantity` in exact decimal arithmetic, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product
            .price
            .saturating_mul(Decimal::from(self.quantity))
    }
}

// `quantity` is pulled out before the product sees the map, otherwise it
// would land in `Product::extra` and serialize twice.
impl<'de> Deserialize<'de> for CartLine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let quantity = match fields.remove("quantity") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
        .and_then(|q| u32::try_from(q).ok())
        .unwrap_or(1);
        let product =
            serde_json::from_value(Value::Object(fields)).map_err(de::Error::custom)?;
        Ok(Self::new(product, quantity))
    }
}

/// Sum of every line's subtotal, saturating like [`CartLine::subtotal`].
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(CartLine::subtotal)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
