//! PostgreSQL-backed repositories.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use domain::{Item, Order, OrderStatus, RepositoryError, User};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use usecase::{HealthCheck, OrderRepository, UserRepository};
use uuid::Uuid;

use crate::error::{StorageError, to_repository_error};

/// Opens a connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    avatar_url: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::restore(
            UserId::from_uuid(row.id),
            row.name,
            row.email,
            row.avatar_url,
            row.created_at,
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    status: String,
    total: f64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i64,
    order_id: Uuid,
    sku: String,
    qty: i32,
    price: f64,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: Some(row.id),
            order_id: Some(OrderId::from_uuid(row.order_id)),
            sku: row.sku,
            quantity: row.qty,
            price: row.price,
        }
    }
}

/// PostgreSQL user repository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: &mut User) -> Result<(), RepositoryError> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email, avatar_url, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, avatar_url, created_at
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.name())
        .bind(user.email())
        .bind(user.avatar_url())
        .bind(user.created_at())
        .fetch_one(&self.pool)
        .await
        .map_err(to_repository_error)?;

        // Pick up values as stored (e.g. timestamp precision).
        *user = row.into();
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            "SELECT id, name, email, avatar_url, created_at FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(to_repository_error)?;

        Ok(row.into())
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET name = $2, email = $3, avatar_url = $4 WHERE id = $1")
                .bind(user.id().as_uuid())
                .bind(user.name())
                .bind(user.email())
                .bind(user.avatar_url())
                .execute(&self.pool)
                .await
                .map_err(to_repository_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL order repository.
///
/// Orders and their items are written in a single transaction.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn save(&self, order: &mut Order) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(to_repository_error)?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, status, total, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id().as_uuid())
        .bind(order.user_id().as_uuid())
        .bind(order.status().as_str())
        .bind(order.total())
        .bind(order.created_at())
        .execute(&mut *tx)
        .await
        .map_err(to_repository_error)?;

        let mut item_ids = Vec::with_capacity(order.item_count());
        for item in order.items() {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO items (order_id, sku, qty, price)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(order.id().as_uuid())
            .bind(&item.sku)
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await
            .map_err(to_repository_error)?;
            item_ids.push(id);
        }

        tx.commit().await.map_err(to_repository_error)?;

        order.assign_item_ids(item_ids);
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let row: OrderRow = sqlx::query_as(
            "SELECT id, user_id, status, total, created_at FROM orders WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(to_repository_error)?;

        let items: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, order_id, sku, qty, price FROM items WHERE order_id = $1 ORDER BY id ASC",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(to_repository_error)?;

        let status: OrderStatus = row.status.parse().map_err(RepositoryError::backend)?;

        Ok(Order::restore(
            OrderId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            status,
            items.into_iter().map(Item::from).collect(),
            row.total,
            row.created_at,
        ))
    }
}

/// Readiness probe that round-trips a trivial query.
#[derive(Clone)]
pub struct PostgresHealthCheck {
    pool: PgPool,
}

impl PostgresHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PostgresHealthCheck {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn check(&self) -> Result<(), String> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
