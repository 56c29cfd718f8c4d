//! Value objects for the order domain.

use common::OrderId;
use serde::{Deserialize, Serialize};

/// A line item in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Storage-assigned row id; `None` until the order is persisted.
    pub id: Option<i64>,

    /// The owning order, set when the item is appended.
    pub order_id: Option<OrderId>,

    /// Stock-keeping unit.
    pub sku: String,

    /// Quantity ordered.
    pub quantity: i32,

    /// Price per unit.
    pub price: f64,
}

impl Item {
    /// Creates a new, not yet appended, line item.
    pub fn new(sku: impl Into<String>, quantity: i32, price: f64) -> Self {
        Self {
            id: None,
            order_id: None,
            sku: sku.into(),
            quantity,
            price,
        }
    }

    /// Returns `price * quantity` for this line.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}
