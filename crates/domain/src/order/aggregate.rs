//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{OrderId, UserId};

use crate::error::DomainError;
use crate::validation::{is_non_negative_price, is_positive_quantity};

use super::{Item, OrderStatus};

/// Order aggregate root.
///
/// Owns an ordered list of line items and a total derived from them. Items
/// enter only through [`Order::add_item`], which validates before appending,
/// so every order built in-process carries valid items.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    status: OrderStatus,
    items: Vec<Item>,
    total: f64,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Creates an empty pending order for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: OrderId::new(),
            user_id,
            status: OrderStatus::Pending,
            items: Vec::new(),
            total: 0.0,
            created_at: Utc::now(),
        }
    }

    /// Rebuilds an order from persisted state.
    ///
    /// The stored total is kept as-is; persisted rows are trusted.
    pub fn restore(
        id: OrderId,
        user_id: UserId,
        status: OrderStatus,
        items: Vec<Item>,
        total: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            status,
            items,
            total,
            created_at,
        }
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// Command methods
impl Order {
    /// Validates and appends an item, then recomputes the total.
    ///
    /// On error the order is left untouched.
    pub fn add_item(&mut self, mut item: Item) -> Result<(), DomainError> {
        if item.sku.is_empty() {
            return Err(DomainError::InvalidItem("item SKU is required"));
        }

        if !is_positive_quantity(item.quantity) {
            return Err(DomainError::InvalidItem("item quantity must be positive"));
        }

        if !is_non_negative_price(item.price) {
            return Err(DomainError::InvalidItem("item price cannot be negative"));
        }

        item.order_id = Some(self.id);
        self.items.push(item);
        self.recalculate_total();
        Ok(())
    }

    /// Checks order-level rules: an owning user and at least one item.
    ///
    /// Item fields are checked by `add_item` and are not re-checked here.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.user_id.is_nil() {
            return Err(DomainError::InvalidOrder("user_id is required"));
        }

        if self.items.is_empty() {
            return Err(DomainError::InvalidOrder(
                "order must have at least one item",
            ));
        }

        Ok(())
    }

    /// Writes storage-assigned ids back onto the items, in insertion order.
    pub fn assign_item_ids(&mut self, ids: impl IntoIterator<Item = i64>) {
        for (item, id) in self.items.iter_mut().zip(ids) {
            item.id = Some(id);
        }
    }

    // Full recomputation in insertion order rather than an incremental update.
    fn recalculate_total(&mut self) {
        self.total = self.items.iter().map(Item::line_total).sum();
    }
}
