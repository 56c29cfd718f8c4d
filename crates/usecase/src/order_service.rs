//! Order lifecycle service.

use std::time::Duration;

use common::{OrderId, UserId};
use domain::{Item, Order};

use crate::deadline::{DEFAULT_OPERATION_DEADLINE, observe_failure, within};
use crate::error::AppError;
use crate::ports::OrderRepository;

/// Orchestrates order creation and lookup.
pub struct OrderService<R: OrderRepository> {
    repo: R,
    deadline: Duration,
}

impl<R: OrderRepository> OrderService<R> {
    /// Creates a service with the default operation deadline.
    pub fn new(repo: R) -> Self {
        Self::with_deadline(repo, DEFAULT_OPERATION_DEADLINE)
    }

    /// Creates a service with a custom operation deadline.
    pub fn with_deadline(repo: R, deadline: Duration) -> Self {
        Self { repo, deadline }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Builds an order from `items`, validates it, and stores it.
    ///
    /// The first invalid item aborts the operation; nothing is stored.
    #[tracing::instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn create_order(&self, user_id: UserId, items: Vec<Item>) -> Result<Order, AppError> {
        let mut order = Order::new(user_id);
        for item in items {
            order
                .add_item(item)
                .map_err(|e| observe_failure("create_order", e.into()))?;
        }

        order
            .validate()
            .map_err(|e| observe_failure("create_order", e.into()))?;

        within(self.deadline, "create_order", self.repo.save(&mut order))
            .await
            .map_err(|e| observe_failure("create_order", e))?;

        metrics::counter!("orders_created_total").increment(1);
        metrics::histogram!("order_total_value").record(order.total());
        tracing::info!(order_id = %order.id(), total = order.total(), "order created");
        Ok(order)
    }

    /// Loads an order with its items.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, AppError> {
        within(self.deadline, "get_order", self.repo.find_by_id(id))
            .await
            .map_err(|e| observe_failure("get_order", e))
    }
}
