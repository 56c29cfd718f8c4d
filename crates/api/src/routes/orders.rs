//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use domain::{DomainError, Item, Order, OrderStatus};
use serde::{Deserialize, Serialize};
use usecase::{AppError, OrderRepository, UserRepository};

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<ItemRequest>,
}

#[derive(Deserialize)]
pub struct ItemRequest {
    pub sku: String,
    pub qty: i32,
    pub price: f64,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<ItemResponse>,
    pub status: OrderStatus,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ItemResponse {
    pub id: Option<i64>,
    pub order_id: Option<OrderId>,
    pub sku: String,
    pub qty: i32,
    pub price: f64,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            order_id: item.order_id,
            sku: item.sku.clone(),
            qty: item.quantity,
            price: item.price,
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id(),
            user_id: order.user_id(),
            items: order.items().iter().map(ItemResponse::from).collect(),
            status: order.status(),
            total: order.total(),
            created_at: order.created_at(),
        }
    }
}

// -- Handlers --

/// POST /orders — place an order for a user.
#[tracing::instrument(skip(state, payload))]
pub async fn create<U: UserRepository + 'static, O: OrderRepository + 'static>(
    State(state): State<Arc<AppState<U, O>>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::invalid_request(e.body_text()))?;

    let user_id = parse_body_user_id(&req.user_id).map_err(ApiError::order)?;
    let items = req
        .items
        .into_iter()
        .map(|item| Item::new(item.sku, item.qty, item.price))
        .collect();

    let order = state
        .order_service
        .create_order(user_id, items)
        .await
        .map_err(ApiError::order)?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get<U: UserRepository + 'static, O: OrderRepository + 'static>(
    State(state): State<Arc<AppState<U, O>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id: OrderId = id
        .parse()
        .map_err(|e| ApiError::invalid_id(format!("Invalid ID format: {e}")))?;

    let order = state
        .order_service
        .get_order(order_id)
        .await
        .map_err(ApiError::order)?;

    Ok(Json(order.into()))
}

/// A missing or unparseable owner is an input problem, not a routing one.
fn parse_body_user_id(raw: &str) -> Result<UserId, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::InvalidOrder("user_id is required").into());
    }
    raw.parse()
        .map_err(|_| DomainError::InvalidOrder("user_id is not a valid id").into())
}
