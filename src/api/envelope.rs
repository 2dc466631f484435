use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Success wrapper producing the `{"status": "success", "data": ...}`
/// envelope. Error rendering lives on `ApiError`; no handler writes a wire
/// body by hand.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: T,
    status_code: StatusCode,
    /// Collection size, included for list responses.
    results: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with data.
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: StatusCode::OK,
            results: None,
        }
    }

    /// 201 Created with data.
    pub fn created(data: T) -> Self {
        Self {
            data,
            status_code: StatusCode::CREATED,
            results: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// 200 OK with a collection and its size.
    pub fn list(items: Vec<T>) -> Self {
        let results = items.len();
        Self {
            data: items,
            status_code: StatusCode::OK,
            results: Some(results),
        }
    }
}

impl ApiResponse<Value> {
    /// 200 OK with `"data": null`, for deletes.
    pub fn deleted() -> Self {
        Self::success(Value::Null)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return crate::error::ApiError::internal(e.to_string()).into_response();
            }
        };

        let mut envelope = json!({
            "status": "success",
            "data": data,
        });
        if let Some(results) = self.results {
            envelope["results"] = json!(results);
        }

        (self.status_code, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let resp = ApiResponse::success(json!({"id": 1}));
        assert_eq!(resp.status_code, StatusCode::OK);
        assert!(resp.results.is_none());
    }

    #[test]
    fn list_reports_result_count() {
        let resp = ApiResponse::list(vec![json!(1), json!(2), json!(3)]);
        assert_eq!(resp.results, Some(3));
    }

    #[test]
    fn deleted_carries_null_data() {
        let resp = ApiResponse::deleted();
        assert!(resp.data.is_null());
    }
}
