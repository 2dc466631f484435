use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use super::{
    body_object, check_max_len, int_field, optional_string, positive_decimal,
    reject_unknown_fields, required_string, uuid_field, FieldErrors,
};
use crate::error::ApiError;

const ORDER_CREATE_FIELDS: &[&str] = &["product_name", "quantity", "price", "customer_id"];
// The customer reference is fixed at creation, like the owner reference.
const ORDER_UPDATE_FIELDS: &[&str] = &["product_name", "quantity", "price"];

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub customer_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none() && self.quantity.is_none() && self.price.is_none()
    }
}

pub fn validate_order_create(body: &Value) -> Result<NewOrder, ApiError> {
    let map = body_object(body)?;
    let mut errors = FieldErrors::new();
    reject_unknown_fields(map, ORDER_CREATE_FIELDS, &mut errors);

    let product_name = required_string(map, "product_name", &mut errors);
    if let Some(product_name) = &product_name {
        check_max_len(product_name, "product_name", 200, &mut errors);
    }

    let quantity = int_field(map, "quantity", true, 1, i32::MAX as i64, &mut errors);
    let price = positive_decimal(map, "price", true, &mut errors);
    let customer_id = uuid_field(map, "customer_id", &mut errors);

    if !errors.is_empty() {
        return Err(errors.into_error());
    }

    match (product_name, quantity, price, customer_id) {
        (Some(product_name), Some(quantity), Some(price), Some(customer_id)) => Ok(NewOrder {
            product_name,
            quantity: quantity as i32,
            price,
            customer_id,
        }),
        _ => Err(ApiError::internal("order validation invariant broken")),
    }
}

pub fn validate_order_update(body: &Value) -> Result<OrderPatch, ApiError> {
    let map = body_object(body)?;
    let mut errors = FieldErrors::new();
    reject_unknown_fields(map, ORDER_UPDATE_FIELDS, &mut errors);

    let product_name = optional_string(map, "product_name", &mut errors);
    if let Some(product_name) = &product_name {
        check_max_len(product_name, "product_name", 200, &mut errors);
    }

    let quantity =
        int_field(map, "quantity", false, 1, i32::MAX as i64, &mut errors).map(|n| n as i32);
    let price = positive_decimal(map, "price", false, &mut errors);

    if !errors.is_empty() {
        return Err(errors.into_error());
    }

    let patch = OrderPatch {
        product_name,
        quantity,
        price,
    };
    if patch.is_empty() {
        return Err(ApiError::validation(
            "At least one field is required for update",
            Default::default(),
        ));
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_happy_path() {
        let order = validate_order_create(&json!({
            "product_name": "Espresso machine",
            "quantity": 2,
            "price": 349.99,
            "customer_id": "b9c7f0d2-3d0e-4e5f-9a17-7a3c0a6f1d11"
        }))
        .unwrap();
        assert_eq!(order.quantity, 2);
        assert!(order.price > Decimal::ZERO);
    }

    #[test]
    fn create_collects_all_violations() {
        let err = validate_order_create(&json!({
            "quantity": 0,
            "price": -1,
            "customer_id": "nope"
        }))
        .unwrap_err();
        let body = err.to_json();
        assert!(body["errors"]["product_name"].is_string());
        assert!(body["errors"]["quantity"].is_string());
        assert!(body["errors"]["price"].is_string());
        assert_eq!(body["errors"]["customer_id"], "customer_id must be a valid UUID");
    }

    #[test]
    fn update_cannot_repoint_customer() {
        let err = validate_order_update(&json!({
            "customer_id": "b9c7f0d2-3d0e-4e5f-9a17-7a3c0a6f1d11"
        }))
        .unwrap_err();
        assert_eq!(err.to_json()["errors"]["customer_id"], "Unknown field");
    }

    #[test]
    fn update_needs_at_least_one_field() {
        assert!(validate_order_update(&json!({})).is_err());
        let patch = validate_order_update(&json!({"quantity": 3})).unwrap();
        assert_eq!(patch.quantity, Some(3));
    }
}
