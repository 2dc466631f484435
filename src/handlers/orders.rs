use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::api::{ApiResponse, ApiResult};
use crate::app::AppState;
use crate::database::models::Order;
use crate::database::orders::OrderRepository;
use crate::middleware::AuthUser;
use crate::validation::{self, order};

/// GET /orders
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<Order>> {
    let repo = OrderRepository::new(state.pool.clone());
    Ok(ApiResponse::list(repo.list(auth_user.id).await?))
}

/// POST /orders - the referenced customer must already belong to the caller.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Order> {
    let input = order::validate_order_create(&body)?;
    let repo = OrderRepository::new(state.pool.clone());
    Ok(ApiResponse::created(repo.create(auth_user.id, &input).await?))
}

/// PUT /orders/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Order> {
    let id = validation::parse_path_id(&id)?;
    let patch = order::validate_order_update(&body)?;
    let repo = OrderRepository::new(state.pool.clone());
    Ok(ApiResponse::success(
        repo.update(id, auth_user.id, &patch).await?,
    ))
}

/// DELETE /orders/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = validation::parse_path_id(&id)?;
    let repo = OrderRepository::new(state.pool.clone());
    repo.delete(id, auth_user.id).await?;
    Ok(ApiResponse::deleted())
}
