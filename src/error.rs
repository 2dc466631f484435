// Application error taxonomy and its HTTP rendering
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use sqlx::error::DatabaseError as _;
use std::collections::HashMap;

/// Postgres class-23 codes the storage layer discriminates on.
pub const PG_UNIQUE_VIOLATION: &str = "23505";
pub const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Application error with a stable client-facing taxonomy.
///
/// Variants carry no transport concerns; the `IntoResponse` impl below is the
/// only place they are mapped to wire statuses. The `Storage` and `Internal`
/// variants hold the real cause for logging but never expose it to clients.
#[derive(Debug)]
pub enum ApiError {
    // 400: one message per violated constraint, all collected
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    // 401: credentials or token invalid/expired
    Authentication(String),

    // 409: unique email constraint lost a race or was simply taken
    DuplicateEmail(String),

    // 400: referenced parent row does not exist (or is not the caller's)
    ReferenceNotFound(String),

    // 404: deliberately ambiguous between "absent" and "not yours"
    NotFoundOrForbidden(String),

    // 404: single-row lookup found nothing
    NotFound(String),

    // 500: storage failure, detail is logged server-side only
    Storage(String),

    // 500: programming fault, detail is logged server-side only
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::DuplicateEmail(_) => StatusCode::CONFLICT,
            ApiError::ReferenceNotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFoundOrForbidden(_) => StatusCode::NOT_FOUND,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message. Operational variants describe themselves;
    /// `Storage`/`Internal` always render a generic message.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. } => message,
            ApiError::Authentication(msg) => msg,
            ApiError::DuplicateEmail(msg) => msg,
            ApiError::ReferenceNotFound(msg) => msg,
            ApiError::NotFoundOrForbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Storage(_) | ApiError::Internal(_) => {
                "An unexpected error occurred while processing your request"
            }
        }
    }

    /// Whether this is an anticipated, user-facing failure. Non-operational
    /// errors get their detail logged and a generic body.
    pub fn is_operational(&self) -> bool {
        !matches!(self, ApiError::Storage(_) | ApiError::Internal(_))
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation {
                message,
                field_errors,
            } => json!({
                "status": "error",
                "message": message,
                "errors": field_errors,
            }),
            _ => json!({
                "status": "error",
                "message": self.message(),
            }),
        }
    }
}

impl ApiError {
    pub fn validation(
        message: impl Into<String>,
        field_errors: HashMap<String, String>,
    ) -> Self {
        ApiError::Validation {
            message: message.into(),
            field_errors,
        }
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, problem: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), problem.into());
        ApiError::validation("Validation failed", field_errors)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        ApiError::Authentication(message.into())
    }

    pub fn duplicate_email(message: impl Into<String>) -> Self {
        ApiError::DuplicateEmail(message.into())
    }

    pub fn reference_not_found(message: impl Into<String>) -> Self {
        ApiError::ReferenceNotFound(message.into())
    }

    pub fn not_found_or_forbidden(message: impl Into<String>) -> Self {
        ApiError::NotFoundOrForbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

/// Map a Postgres error code to its taxonomy variant, if it is one of the
/// codes the service discriminates on.
pub fn classify_pg_code(code: &str) -> Option<ApiError> {
    match code {
        PG_UNIQUE_VIOLATION => Some(ApiError::duplicate_email("Email already registered")),
        PG_FOREIGN_KEY_VIOLATION => Some(ApiError::reference_not_found(
            "Referenced record does not exist",
        )),
        _ => None,
    }
}

// Storage signal translation. Raw driver text stays server-side.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found"),
            sqlx::Error::Database(db) => {
                if let Some(api_err) = db.code().as_deref().and_then(classify_pg_code) {
                    return api_err;
                }
                tracing::error!("database error: {}", db.message());
                ApiError::storage(db.message().to_string())
            }
            _ => {
                tracing::error!("storage error: {}", err);
                ApiError::storage(err.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Storage(detail) | ApiError::Internal(detail) => write!(f, "{}", detail),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

// Single point translating error kind to wire status and envelope
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if !self.is_operational() {
            tracing::error!("request failed: {}", self);
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::invalid_field("title", "required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::authentication("bad token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::duplicate_email("taken").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::reference_not_found("no customer").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found_or_forbidden("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::storage("pool exhausted").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn opaque_variants_hide_detail() {
        let err = ApiError::storage("connection refused on 10.0.0.3:5432");
        assert!(!err.message().contains("10.0.0.3"));
        let body = err.to_json();
        assert_eq!(body["status"], "error");
        assert!(!body["message"].as_str().unwrap().contains("5432"));
    }

    #[test]
    fn validation_body_carries_every_field() {
        let mut fields = HashMap::new();
        fields.insert("email".to_string(), "Invalid email format".to_string());
        fields.insert("password".to_string(), "Too short".to_string());
        let body = ApiError::validation("Validation failed", fields).to_json();
        assert_eq!(body["status"], "error");
        assert_eq!(body["errors"]["email"], "Invalid email format");
        assert_eq!(body["errors"]["password"], "Too short");
    }

    #[test]
    fn pg_codes_classify() {
        assert!(matches!(
            classify_pg_code(PG_UNIQUE_VIOLATION),
            Some(ApiError::DuplicateEmail(_))
        ));
        assert!(matches!(
            classify_pg_code(PG_FOREIGN_KEY_VIOLATION),
            Some(ApiError::ReferenceNotFound(_))
        ));
        assert!(classify_pg_code("40001").is_none());
    }

    #[test]
    fn row_not_found_translates_to_not_found() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
