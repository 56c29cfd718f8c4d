//! User endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::UserId;
use domain::User;
use serde::{Deserialize, Serialize};
use usecase::{OrderRepository, UserRepository};

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdateAvatarRequest {
    pub avatar_url: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            avatar_url: user.avatar_url().to_string(),
            created_at: user.created_at(),
        }
    }
}

// -- Handlers --

/// POST /users — register a new user.
#[tracing::instrument(skip(state, payload))]
pub async fn create<U: UserRepository + 'static, O: OrderRepository + 'static>(
    State(state): State<Arc<AppState<U, O>>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::invalid_request(e.body_text()))?;

    let user = state
        .user_service
        .create_user(&req.name, &req.email)
        .await
        .map_err(ApiError::user)?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/{id}
#[tracing::instrument(skip(state))]
pub async fn get<U: UserRepository + 'static, O: OrderRepository + 'static>(
    State(state): State<Arc<AppState<U, O>>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = parse_user_id(&id)?;
    let user = state
        .user_service
        .get_user(user_id)
        .await
        .map_err(ApiError::user)?;

    Ok(Json(user.into()))
}

/// PUT /users/{id}/avatar — set the user's avatar reference.
#[tracing::instrument(skip(state, payload))]
pub async fn update_avatar<U: UserRepository + 'static, O: OrderRepository + 'static>(
    State(state): State<Arc<AppState<U, O>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAvatarRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = parse_user_id(&id)?;
    let Json(req) = payload.map_err(|e| ApiError::invalid_request(e.body_text()))?;

    let user = state
        .user_service
        .update_avatar(user_id, &req.avatar_url)
        .await
        .map_err(ApiError::user)?;

    Ok(Json(user.into()))
}

fn parse_user_id(id: &str) -> Result<UserId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::invalid_id(format!("Invalid ID format: {e}")))
}
