use serde_json::Value;

use super::{
    body_object, check_max_len, optional_bool, optional_string, reject_unknown_fields,
    required_string, FieldErrors,
};
use crate::error::ApiError;

const TODO_FIELDS: &[&str] = &["title", "completed"];

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
}

/// Allow-listed patch; the owner reference is not an accepted field.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

pub fn validate_todo_create(body: &Value) -> Result<NewTodo, ApiError> {
    let map = body_object(body)?;
    let mut errors = FieldErrors::new();
    reject_unknown_fields(map, TODO_FIELDS, &mut errors);

    let title = required_string(map, "title", &mut errors);
    if let Some(title) = &title {
        check_max_len(title, "title", 200, &mut errors);
    }
    let completed = optional_bool(map, "completed", &mut errors);

    if !errors.is_empty() {
        return Err(errors.into_error());
    }

    match title {
        Some(title) => Ok(NewTodo {
            title,
            completed: completed.unwrap_or(false),
        }),
        None => Err(ApiError::internal("todo validation invariant broken")),
    }
}

pub fn validate_todo_update(body: &Value) -> Result<TodoPatch, ApiError> {
    let map = body_object(body)?;
    let mut errors = FieldErrors::new();
    reject_unknown_fields(map, TODO_FIELDS, &mut errors);

    let title = optional_string(map, "title", &mut errors);
    if let Some(title) = &title {
        check_max_len(title, "title", 200, &mut errors);
    }
    let completed = optional_bool(map, "completed", &mut errors);

    if !errors.is_empty() {
        return Err(errors.into_error());
    }

    let patch = TodoPatch { title, completed };
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
    fn create_defaults_completed_to_false() {
        let todo = validate_todo_create(&json!({"title": "  buy milk  "})).unwrap();
        assert_eq!(todo.title, "buy milk");
        assert!(!todo.completed);
    }

    #[test]
    fn create_rejects_owner_field() {
        let err = validate_todo_create(&json!({
            "title": "buy milk",
            "user_id": "22222222-2222-2222-2222-222222222222"
        }))
        .unwrap_err();
        assert_eq!(err.to_json()["errors"]["user_id"], "Unknown field");
    }

    #[test]
    fn create_requires_non_empty_title() {
        let err = validate_todo_create(&json!({"title": "   "})).unwrap_err();
        assert!(err.to_json()["errors"]["title"].is_string());
    }

    #[test]
    fn update_types_are_checked() {
        let err = validate_todo_update(&json!({"completed": "yes"})).unwrap_err();
        assert_eq!(err.to_json()["errors"]["completed"], "completed must be a boolean");
    }

    #[test]
    fn update_needs_at_least_one_field() {
        assert!(validate_todo_update(&json!({})).is_err());
        let patch = validate_todo_update(&json!({"completed": true})).unwrap();
        assert_eq!(patch.completed, Some(true));
        assert!(patch.title.is_none());
    }
}
