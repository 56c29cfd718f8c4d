//! Application layer for the order service.
//!
//! This crate provides:
//! - Repository capability traits the services depend on
//! - The four-kind application error taxonomy and its translation rules
//! - User and order lifecycle services with a per-operation deadline

pub mod deadline;
pub mod error;
pub mod order_service;
pub mod ports;
pub mod user_service;

pub use deadline::DEFAULT_OPERATION_DEADLINE;
pub use error::AppError;
pub use order_service::OrderService;
pub use ports::{HealthCheck, OrderRepository, UserRepository};
pub use user_service::UserService;
