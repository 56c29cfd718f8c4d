//! Persistence collaborators for the order service.
//!
//! - [`memory`]: in-memory repositories with fault injection, for tests and
//!   local runs without a database
//! - [`postgres`]: sqlx-backed repositories, health check and migrations

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::StorageError;
pub use memory::{
    FaultInjector, InMemoryHealthCheck, InMemoryOrderRepository, InMemoryUserRepository,
    InjectedFailure,
};
pub use postgres::{
    PostgresHealthCheck, PostgresOrderRepository, PostgresUserRepository, connect, run_migrations,
};
pub use sqlx::PgPool;
