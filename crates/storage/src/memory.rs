//! In-memory repository implementations.
//!
//! These provide the same contracts as the PostgreSQL repositories and add
//! fault injection so callers can exercise error and timeout paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Order, RepositoryError, User};
use tokio::sync::RwLock;
use usecase::{HealthCheck, OrderRepository, UserRepository};

/// A failure the next repository call should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    NotFound,
    Conflict,
    Backend,
}

impl InjectedFailure {
    fn into_error(self) -> RepositoryError {
        match self {
            InjectedFailure::NotFound => RepositoryError::NotFound,
            InjectedFailure::Conflict => RepositoryError::Conflict,
            InjectedFailure::Backend => RepositoryError::backend("injected backend failure"),
        }
    }
}

#[derive(Debug, Default)]
struct FaultState {
    fail_next: Option<InjectedFailure>,
    latency: Option<Duration>,
}

/// Shared switchboard for injecting failures and latency.
#[derive(Debug, Clone, Default)]
pub struct FaultInjector {
    state: Arc<Mutex<FaultState>>,
}

impl FaultInjector {
    /// Makes the next repository call fail with `failure`.
    pub fn fail_next(&self, failure: InjectedFailure) {
        self.state.lock().unwrap().fail_next = Some(failure);
    }

    /// Delays every subsequent call by `latency` (`None` to clear).
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.state.lock().unwrap().latency = latency;
    }

    async fn before_call(&self) -> Result<(), RepositoryError> {
        let (latency, failure) = {
            let mut state = self.state.lock().unwrap();
            (state.latency, state.fail_next.take())
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match failure {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

/// In-memory user repository.
///
/// Enforces email uniqueness the way the database's unique index does.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    faults: FaultInjector,
}

impl InMemoryUserRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fault injector for this repository.
    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    /// Returns the number of stored users.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &mut User) -> Result<(), RepositoryError> {
        self.faults.before_call().await?;

        let mut users = self.users.write().await;
        if users.values().any(|u| u.email() == user.email()) {
            return Err(RepositoryError::Conflict);
        }
        if users.contains_key(&user.id()) {
            return Err(RepositoryError::Conflict);
        }

        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, RepositoryError> {
        self.faults.before_call().await?;

        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        self.faults.before_call().await?;

        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.id() != user.id() && u.email() == user.email())
        {
            return Err(RepositoryError::Conflict);
        }

        match users.get_mut(&user.id()) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

/// In-memory order repository.
///
/// Item ids are handed out from a counter, mirroring a serial column.
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    next_item_id: Arc<AtomicI64>,
    faults: FaultInjector,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self {
            orders: Arc::default(),
            next_item_id: Arc::new(AtomicI64::new(1)),
            faults: FaultInjector::default(),
        }
    }
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fault injector for this repository.
    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &mut Order) -> Result<(), RepositoryError> {
        self.faults.before_call().await?;

        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id()) {
            return Err(RepositoryError::Conflict);
        }

        let first = self
            .next_item_id
            .fetch_add(order.item_count() as i64, Ordering::SeqCst);
        order.assign_item_ids(first..);
        orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Order, RepositoryError> {
        self.faults.before_call().await?;

        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

/// Health check for in-memory storage; ready unless told otherwise.
#[derive(Debug, Clone)]
pub struct InMemoryHealthCheck {
    ready: Arc<AtomicBool>,
}

impl Default for InMemoryHealthCheck {
    fn default() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl InMemoryHealthCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the reported readiness.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }
}

#[async_trait]
impl HealthCheck for InMemoryHealthCheck {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn check(&self) -> Result<(), String> {
        if self.ready.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err("storage marked unavailable".to_string())
        }
    }
}
