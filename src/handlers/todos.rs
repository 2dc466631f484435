use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::api::{ApiResponse, ApiResult};
use crate::app::AppState;
use crate::database::models::Todo;
use crate::database::todos::TodoRepository;
use crate::middleware::AuthUser;
use crate::validation::{self, todo};

/// GET /todos - the caller's rows only, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<Todo>> {
    let repo = TodoRepository::new(state.pool.clone());
    Ok(ApiResponse::list(repo.list(auth_user.id).await?))
}

/// POST /todos - owner comes from the verified identity, never the body.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<Todo> {
    let input = todo::validate_todo_create(&body)?;
    let repo = TodoRepository::new(state.pool.clone());
    Ok(ApiResponse::created(repo.create(auth_user.id, &input).await?))
}

/// PUT /todos/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Todo> {
    let id = validation::parse_path_id(&id)?;
    let patch = todo::validate_todo_update(&body)?;
    let repo = TodoRepository::new(state.pool.clone());
    Ok(ApiResponse::success(
        repo.update(id, auth_user.id, &patch).await?,
    ))
}

/// DELETE /todos/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = validation::parse_path_id(&id)?;
    let repo = TodoRepository::new(state.pool.clone());
    repo.delete(id, auth_user.id).await?;
    Ok(ApiResponse::deleted())
}
