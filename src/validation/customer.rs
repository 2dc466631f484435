use serde_json::Value;

use super::{
    body_object, check_max_len, is_valid_email, optional_string, reject_unknown_fields,
    required_string, FieldErrors,
};
use crate::error::ApiError;

const CUSTOMER_FIELDS: &[&str] = &["full_name", "email", "phone"];

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

pub fn validate_customer_create(body: &Value) -> Result<NewCustomer, ApiError> {
    let map = body_object(body)?;
    let mut errors = FieldErrors::new();
    reject_unknown_fields(map, CUSTOMER_FIELDS, &mut errors);

    let full_name = required_string(map, "full_name", &mut errors);
    if let Some(full_name) = &full_name {
        check_max_len(full_name, "full_name", 100, &mut errors);
    }

    let email = required_string(map, "email", &mut errors).map(|e| e.to_lowercase());
    if let Some(email) = &email {
        if !is_valid_email(email) {
            errors.add("email", "email must be a valid email address");
        }
    }

    let phone = required_string(map, "phone", &mut errors);
    if let Some(phone) = &phone {
        check_phone(phone, &mut errors);
    }

    if !errors.is_empty() {
        return Err(errors.into_error());
    }

    match (full_name, email, phone) {
        (Some(full_name), Some(email), Some(phone)) => Ok(NewCustomer {
            full_name,
            email,
            phone,
        }),
        _ => Err(ApiError::internal("customer validation invariant broken")),
    }
}

pub fn validate_customer_update(body: &Value) -> Result<CustomerPatch, ApiError> {
    let map = body_object(body)?;
    let mut errors = FieldErrors::new();
    reject_unknown_fields(map, CUSTOMER_FIELDS, &mut errors);

    let full_name = optional_string(map, "full_name", &mut errors);
    if let Some(full_name) = &full_name {
        check_max_len(full_name, "full_name", 100, &mut errors);
    }

    let email = optional_string(map, "email", &mut errors).map(|e| e.to_lowercase());
    if let Some(email) = &email {
        if !is_valid_email(email) {
            errors.add("email", "email must be a valid email address");
        }
    }

    let phone = optional_string(map, "phone", &mut errors);
    if let Some(phone) = &phone {
        check_phone(phone, &mut errors);
    }

    if !errors.is_empty() {
        return Err(errors.into_error());
    }

    let patch = CustomerPatch {
        full_name,
        email,
        phone,
    };
    if patch.is_empty() {
        return Err(ApiError::validation(
            "At least one field is required for update",
            Default::default(),
        ));
    }
    Ok(patch)
}

fn check_phone(phone: &str, errors: &mut FieldErrors) {
    let len = phone.chars().count();
    if !(7..=20).contains(&len) {
        errors.add("phone", "phone must be between 7 and 20 characters");
        return;
    }
    let valid = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    if !valid {
        errors.add("phone", "phone may only contain digits, spaces, and + - ( )");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_happy_path() {
        let customer = validate_customer_create(&json!({
            "full_name": "Ann Smith",
            "email": "Ann@Shop.example",
            "phone": "+351 912 345 678"
        }))
        .unwrap();
        assert_eq!(customer.email, "ann@shop.example");
    }

    #[test]
    fn create_collects_all_violations() {
        let err = validate_customer_create(&json!({"phone": "abc"})).unwrap_err();
        let body = err.to_json();
        assert!(body["errors"]["full_name"].is_string());
        assert!(body["errors"]["email"].is_string());
        assert!(body["errors"]["phone"].is_string());
    }

    #[test]
    fn phone_shape_is_checked() {
        let err = validate_customer_create(&json!({
            "full_name": "Ann",
            "email": "ann@x.com",
            "phone": "call-me-maybe"
        }))
        .unwrap_err();
        assert!(err.to_json()["errors"]["phone"].is_string());
    }

    #[test]
    fn update_rejects_owner_field_and_empty_patch() {
        let err = validate_customer_update(&json!({"user_id": "x"})).unwrap_err();
        assert_eq!(err.to_json()["errors"]["user_id"], "Unknown field");
        assert!(validate_customer_update(&json!({})).is_err());
    }
}
