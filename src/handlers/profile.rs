use axum::{extract::State, Extension, Json};
use serde_json::Value;

use crate::api::{ApiResponse, ApiResult};
use crate::app::AppState;
use crate::auth::password;
use crate::config;
use crate::database::models::UserProfile;
use crate::database::users::UserRepository;
use crate::middleware::AuthUser;
use crate::validation::identity;

/// GET /me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<UserProfile> {
    let repo = UserRepository::new(state.pool.clone());
    Ok(ApiResponse::success(repo.profile(auth_user.id).await?))
}

/// PUT /me - allow-listed profile patch. A new password is hashed off the
/// request executor before it goes anywhere near storage.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> ApiResult<UserProfile> {
    let patch = identity::validate_profile_update(&body)?;

    let password_hash = match &patch.password {
        Some(password) => {
            let cost = config::config().security.bcrypt_cost;
            Some(password::hash_password_async(password.clone(), cost).await?)
        }
        None => None,
    };

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .update_profile(auth_user.id, &patch, password_hash.as_deref())
        .await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /me - account removal; owned resources cascade at the store.
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Value> {
    let repo = UserRepository::new(state.pool.clone());
    repo.delete(auth_user.id).await?;
    Ok(ApiResponse::deleted())
}
