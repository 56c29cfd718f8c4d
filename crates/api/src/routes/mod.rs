//! HTTP route handlers and the state they share.

pub mod health;
pub mod metrics;
pub mod orders;
pub mod users;

use std::sync::Arc;

use usecase::{HealthCheck, OrderRepository, OrderService, UserRepository, UserService};

/// Shared application state accessible from all handlers.
pub struct AppState<U: UserRepository, O: OrderRepository> {
    pub user_service: UserService<U>,
    pub order_service: OrderService<O>,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl<U: UserRepository, O: OrderRepository> AppState<U, O> {
    pub fn new(user_service: UserService<U>, order_service: OrderService<O>) -> Self {
        Self {
            user_service,
            order_service,
            health_checks: Vec::new(),
        }
    }

    /// Registers a dependency probed by `/healthz`.
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
