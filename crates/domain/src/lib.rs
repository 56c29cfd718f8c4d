//! Domain layer for the order service.
//!
//! This crate holds the pure business model:
//! - Validation predicates over primitive fields
//! - The User entity and its validation rules
//! - The Order aggregate with its line items and derived total
//! - Error sentinels shared with the persistence collaborators

pub mod error;
pub mod order;
pub mod user;
pub mod validation;

pub use common::{OrderId, UserId};
pub use error::{DomainError, RepositoryError};
pub use order::{Item, Order, OrderStatus};
pub use user::User;
