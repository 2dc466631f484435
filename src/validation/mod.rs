//! Declarative request validation.
//!
//! Each operation has a `validate_*` function that takes the raw JSON body
//! and returns a normalized input value, or a validation error carrying every
//! violated constraint at once. Validation never touches storage.

pub mod customer;
pub mod identity;
pub mod order;
pub mod todo;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;

/// Collects one message per violated field. All checks run to completion so
/// callers see every problem in a single response.
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_error(self) -> ApiError {
        ApiError::validation("Validation failed", self.0)
    }
}

/// Request bodies must be JSON objects before field checks make sense.
pub(crate) fn body_object(body: &Value) -> Result<&Map<String, Value>, ApiError> {
    body.as_object()
        .ok_or_else(|| ApiError::invalid_field("body", "Request body must be a JSON object"))
}

/// Reject any field that is not in the operation's allow-list. Owner and id
/// fields are never listed, so identity tampering dies here.
pub(crate) fn reject_unknown_fields(
    map: &Map<String, Value>,
    allowed: &[&str],
    errors: &mut FieldErrors,
) {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            errors.add(key, "Unknown field");
        }
    }
}

/// Present-and-valid string, trimmed. Absence is an error.
pub(crate) fn required_string(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match map.get(field) {
        None => {
            errors.add(field, format!("{} is required", field));
            None
        }
        Some(value) => non_empty_string(value, field, errors),
    }
}

/// Trimmed string if present; `None` without error when absent.
pub(crate) fn optional_string(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    map.get(field)
        .and_then(|value| non_empty_string(value, field, errors))
}

fn non_empty_string(value: &Value, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                errors.add(field, format!("{} must not be empty", field));
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => {
            errors.add(field, format!("{} must be a string", field));
            None
        }
    }
}

pub(crate) fn check_max_len(value: &str, field: &str, max: usize, errors: &mut FieldErrors) {
    if value.chars().count() > max {
        errors.add(field, format!("{} cannot exceed {} characters", field, max));
    }
}

/// Whole number within `min..=max`. `required` controls whether absence is a
/// violation. Floats are rejected rather than truncated.
pub(crate) fn int_field(
    map: &Map<String, Value>,
    field: &str,
    required: bool,
    min: i64,
    max: i64,
    errors: &mut FieldErrors,
) -> Option<i64> {
    let value = match map.get(field) {
        None => {
            if required {
                errors.add(field, format!("{} is required", field));
            }
            return None;
        }
        Some(v) => v,
    };

    let n = match value.as_i64() {
        Some(n) => n,
        None => {
            errors.add(field, format!("{} must be a whole number", field));
            return None;
        }
    };

    if n < min || n > max {
        errors.add(field, format!("{} must be between {} and {}", field, min, max));
        return None;
    }
    Some(n)
}

pub(crate) fn optional_bool(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<bool> {
    match map.get(field) {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            errors.add(field, format!("{} must be a boolean", field));
            None
        }
    }
}

/// Strictly positive decimal from a JSON number.
pub(crate) fn positive_decimal(
    map: &Map<String, Value>,
    field: &str,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<Decimal> {
    let value = match map.get(field) {
        None => {
            if required {
                errors.add(field, format!("{} is required", field));
            }
            return None;
        }
        Some(v) => v,
    };

    let parsed = value
        .as_f64()
        .and_then(Decimal::from_f64_retain)
        .or_else(|| value.as_i64().map(Decimal::from));

    match parsed {
        Some(d) if d > Decimal::ZERO => Some(d),
        Some(_) => {
            errors.add(field, format!("{} must be a positive number", field));
            None
        }
        None => {
            errors.add(field, format!("{} must be a number", field));
            None
        }
    }
}

pub(crate) fn uuid_field(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<Uuid> {
    let raw = match map.get(field) {
        None => {
            errors.add(field, format!("{} is required", field));
            return None;
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            errors.add(field, format!("{} must be a string", field));
            return None;
        }
    };

    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, format!("{} must be a valid UUID", field));
            None
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        _ => false,
    }
}

/// Path identifiers are validated here, not by a storage lookup. A malformed
/// id is a validation failure, never a 404.
pub fn parse_path_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_field("id", "id must be a valid UUID"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn collects_every_violation() {
        let mut errors = FieldErrors::new();
        errors.add("name", "name is required");
        errors.add("email", "email is required");
        let err = errors.into_error();
        let body = err.to_json();
        assert!(body["errors"]["name"].is_string());
        assert!(body["errors"]["email"].is_string());
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("title", "title is required");
        errors.add("title", "title must be a string");
        let body = errors.into_error().to_json();
        assert_eq!(body["errors"]["title"], "title is required");
    }

    #[test]
    fn unknown_fields_are_rejected_by_name() {
        let map = obj(json!({"title": "x", "user_id": "someone-else"}));
        let mut errors = FieldErrors::new();
        reject_unknown_fields(&map, &["title"], &mut errors);
        let body = errors.into_error().to_json();
        assert_eq!(body["errors"]["user_id"], "Unknown field");
    }

    #[test]
    fn required_string_trims_and_rejects_empty() {
        let map = obj(json!({"name": "  Ann  ", "location": "   "}));
        let mut errors = FieldErrors::new();
        assert_eq!(
            required_string(&map, "name", &mut errors).as_deref(),
            Some("Ann")
        );
        assert!(required_string(&map, "location", &mut errors).is_none());
        assert!(required_string(&map, "missing", &mut errors).is_none());
        assert!(!errors.is_empty());
    }

    #[test]
    fn int_field_bounds_and_types() {
        let map = obj(json!({"age": 17, "count": "three", "frac": 1.5}));
        let mut errors = FieldErrors::new();
        assert_eq!(int_field(&map, "age", true, 1, 120, &mut errors), Some(17));
        assert!(int_field(&map, "count", true, 0, 10, &mut errors).is_none());
        assert!(int_field(&map, "frac", true, 0, 10, &mut errors).is_none());
        assert!(int_field(&map, "absent", false, 0, 10, &mut errors).is_none());
        let body = errors.into_error().to_json();
        assert!(body["errors"].get("age").is_none());
        assert!(body["errors"].get("absent").is_none());
        assert!(body["errors"]["count"].is_string());
        assert!(body["errors"]["frac"].is_string());
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ann@x.com"));
        assert!(is_valid_email("a.b+tag@sub.example.org"));
        assert!(!is_valid_email("annx.com"));
        assert!(!is_valid_email("ann@"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("ann@xcom"));
        assert!(!is_valid_email("ann@x.com "));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn positive_decimal_rejects_zero_and_negative() {
        let map = obj(json!({"price": 19.99, "free": 0, "neg": -2, "word": "cheap"}));
        let mut errors = FieldErrors::new();
        assert!(positive_decimal(&map, "price", true, &mut errors).is_some());
        assert!(positive_decimal(&map, "free", true, &mut errors).is_none());
        assert!(positive_decimal(&map, "neg", true, &mut errors).is_none());
        assert!(positive_decimal(&map, "word", true, &mut errors).is_none());
    }

    #[test]
    fn path_id_must_be_uuid() {
        assert!(parse_path_id("b9c7f0d2-3d0e-4e5f-9a17-7a3c0a6f1d11").is_ok());
        let err = parse_path_id("42").unwrap_err();
        let body = err.to_json();
        assert_eq!(body["errors"]["id"], "id must be a valid UUID");
    }
}
