use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, customers, orders, profile, todos};
use crate::middleware::require_auth;

/// Process-wide dependencies, injected into every handler. The pool is the
/// only handle to the store; components receive it at construction.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        // Bearer-protected resource routes
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(profile::me)
                .put(profile::update_me)
                .delete(profile::delete_me),
        )
        .route("/todos", get(todos::list).post(todos::create))
        .route("/todos/:id", put(todos::update).delete(todos::delete))
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/:id",
            put(customers::update).delete(customers::delete),
        )
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/:id", put(orders::update).delete(orders::delete))
        .route_layer(axum::middleware::from_fn(require_auth))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "status": "success",
        "data": {
            "name": "ownership-api",
            "version": version,
            "endpoints": {
                "signup": "POST /signup (public)",
                "login": "POST /login (public)",
                "profile": "GET|PUT|DELETE /me (bearer)",
                "todos": "GET|POST /todos, PUT|DELETE /todos/:id (bearer)",
                "customers": "GET|POST /customers, PUT|DELETE /customers/:id (bearer)",
                "orders": "GET|POST /orders, PUT|DELETE /orders/:id (bearer)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "database unavailable",
                })),
            )
        }
    }
}
