use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::api::{ApiResponse, ApiResult};
use crate::app::AppState;
use crate::database::customers::CustomerRepository;
use crate::database::models::Customer;
use crate::middleware::AuthUser;
use crate::validation::{self, customer};

/// GET /customers
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<Customer>> {
    let repo = CustomerRepository::new(state.pool.clone());
    Ok(ApiResponse::list(repo.list(auth_user.id).await?))
}

/// POST /customers
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Customer> {
    let input = customer::validate_customer_create(&body)?;
    let repo = CustomerRepository::new(state.pool.clone());
    Ok(ApiResponse::created(repo.create(auth_user.id, &input).await?))
}

/// PUT /customers/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Customer> {
    let id = validation::parse_path_id(&id)?;
    let patch = customer::validate_customer_update(&body)?;
    let repo = CustomerRepository::new(state.pool.clone());
    Ok(ApiResponse::success(
        repo.update(id, auth_user.id, &patch).await?,
    ))
}

/// DELETE /customers/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = validation::parse_path_id(&id)?;
    let repo = CustomerRepository::new(state.pool.clone());
    repo.delete(id, auth_user.id).await?;
    Ok(ApiResponse::deleted())
}
