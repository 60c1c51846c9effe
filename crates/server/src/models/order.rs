//! Order and order item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use atelier_core::{ArtworkId, OrderId, OrderItemId, OrderStatus};

/// A guest-checkout order.
///
/// `total_amount` is the sum of item `price * quantity` frozen at creation
/// time; it is never recomputed from current artwork prices.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order, referencing an artwork with its price frozen.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub artwork_id: ArtworkId,
    pub price: Decimal,
    pub quantity: i32,
}

impl OrderItem {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use atelier_core::{ArtworkId, OrderId, OrderItemId};
    use std::str::FromStr;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            artwork_id: ArtworkId::new(1),
            price: Decimal::from_str("450.50").unwrap(),
            quantity: 2,
        };
        assert_eq!(item.line_total(), Decimal::from_str("901.00").unwrap());
    }
}
