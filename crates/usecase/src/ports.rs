//! Repository capability traits.
//!
//! These interfaces are owned by the application layer; persistence
//! adapters implement them.

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Order, RepositoryError, User};

/// Persistence operations for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// Implementations may populate server-assigned fields on `user`.
    /// Returns `Conflict` when the email is already taken.
    async fn save(&self, user: &mut User) -> Result<(), RepositoryError>;

    /// Loads a user, returning `NotFound` when it does not exist.
    async fn find_by_id(&self, id: UserId) -> Result<User, RepositoryError>;

    /// Overwrites an existing user.
    ///
    /// Returns `NotFound` when no row was affected.
    async fn update(&self, user: &User) -> Result<(), RepositoryError>;
}

/// Persistence operations for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stores an order together with its items, atomically.
    ///
    /// Storage-assigned item ids are written back onto `order`.
    async fn save(&self, order: &mut Order) -> Result<(), RepositoryError>;

    /// Loads an order with its items in insertion order.
    async fn find_by_id(&self, id: OrderId) -> Result<Order, RepositoryError>;
}

/// A dependency that can report whether it is ready to serve traffic.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Name reported in readiness details.
    fn name(&self) -> &'static str;

    /// Returns `Err` with a human-readable reason when not ready.
    async fn check(&self) -> Result<(), String>;
}
