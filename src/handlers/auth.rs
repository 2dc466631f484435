use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::api::{ApiResponse, ApiResult};
use crate::app::AppState;
use crate::auth::{self, password};
use crate::config;
use crate::database::models::UserProfile;
use crate::database::users::UserRepository;
use crate::error::ApiError;
use crate::validation::identity;

/// POST /signup - register a new identity.
pub async fn signup(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Value> {
    let input = identity::validate_signup(&body)?;

    let cost = config::config().security.bcrypt_cost;
    let password_hash = password::hash_password_async(input.password.clone(), cost).await?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo.create(&input, &password_hash).await?;

    let token = auth::issue_token(user.id, &user.email)?;
    Ok(ApiResponse::created(json!({ "user": user, "token": token })))
}

/// POST /login - verify credentials and hand out a session token.
pub async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<Value> {
    let input = identity::validate_login(&body)?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo.find_by_email(&input.email).await?;

    // Unknown email, deactivated account, and wrong password all get the
    // same answer; nothing here says which one it was.
    let Some(user) = user else {
        return Err(ApiError::authentication("Invalid email or password"));
    };
    if !user.is_active {
        return Err(ApiError::authentication("Invalid email or password"));
    }
    if !password::verify_password_async(input.password, user.password_hash.clone()).await {
        return Err(ApiError::authentication("Invalid email or password"));
    }

    let token = auth::issue_token(user.id, &user.email)?;
    Ok(ApiResponse::success(json!({
        "token": token,
        "user": UserProfile::from(user),
    })))
}
