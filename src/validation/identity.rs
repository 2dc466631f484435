use serde_json::Value;

use super::{
    body_object, check_max_len, int_field, is_valid_email, optional_string, reject_unknown_fields,
    required_string, FieldErrors,
};
use crate::auth::password::MIN_PASSWORD_LENGTH;
use crate::error::ApiError;

pub const VALID_ROLES: &[&str] = &["user", "admin"];

const SIGNUP_FIELDS: &[&str] = &["name", "email", "password", "age", "location", "role"];

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Profile patch. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub role: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.age.is_none()
            && self.location.is_none()
            && self.role.is_none()
    }
}

pub fn validate_signup(body: &Value) -> Result<SignupInput, ApiError> {
    let map = body_object(body)?;
    let mut errors = FieldErrors::new();
    reject_unknown_fields(map, SIGNUP_FIELDS, &mut errors);

    let name = required_string(map, "name", &mut errors);
    if let Some(name) = &name {
        check_max_len(name, "name", 100, &mut errors);
    }

    let email = required_string(map, "email", &mut errors).map(|e| e.to_lowercase());
    if let Some(email) = &email {
        if !is_valid_email(email) {
            errors.add("email", "email must be a valid email address");
        }
    }

    let password = required_string(map, "password", &mut errors);
    if let Some(password) = &password {
        if password.len() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("password must be at least {} characters", MIN_PASSWORD_LENGTH),
            );
        }
    }

    let age = int_field(map, "age", false, 1, 120, &mut errors).map(|n| n as i32);

    let location = optional_string(map, "location", &mut errors);
    if let Some(location) = &location {
        check_max_len(location, "location", 100, &mut errors);
    }

    let role = validate_role(optional_string(map, "role", &mut errors), &mut errors)
        .unwrap_or_else(|| "user".to_string());

    if !errors.is_empty() {
        return Err(errors.into_error());
    }

    // All three are Some once errors is empty
    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => Ok(SignupInput {
            name,
            email,
            password,
            age,
            location,
            role,
        }),
        _ => Err(ApiError::internal("signup validation invariant broken")),
    }
}

pub fn validate_login(body: &Value) -> Result<LoginInput, ApiError> {
    let map = body_object(body)?;
    let mut errors = FieldErrors::new();
    reject_unknown_fields(map, &["email", "password"], &mut errors);

    let email = required_string(map, "email", &mut errors).map(|e| e.to_lowercase());
    let password = required_string(map, "password", &mut errors);

    if !errors.is_empty() {
        return Err(errors.into_error());
    }

    match (email, password) {
        (Some(email), Some(password)) => Ok(LoginInput { email, password }),
        _ => Err(ApiError::internal("login validation invariant broken")),
    }
}

pub fn validate_profile_update(body: &Value) -> Result<ProfilePatch, ApiError> {
    let map = body_object(body)?;
    let mut errors = FieldErrors::new();
    reject_unknown_fields(map, SIGNUP_FIELDS, &mut errors);

    let name = optional_string(map, "name", &mut errors);
    if let Some(name) = &name {
        check_max_len(name, "name", 100, &mut errors);
    }

    let email = optional_string(map, "email", &mut errors).map(|e| e.to_lowercase());
    if let Some(email) = &email {
        if !is_valid_email(email) {
            errors.add("email", "email must be a valid email address");
        }
    }

    let password = optional_string(map, "password", &mut errors);
    if let Some(password) = &password {
        if password.len() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("password must be at least {} characters", MIN_PASSWORD_LENGTH),
            );
        }
    }

    let age = int_field(map, "age", false, 1, 120, &mut errors).map(|n| n as i32);

    let location = optional_string(map, "location", &mut errors);
    if let Some(location) = &location {
        check_max_len(location, "location", 100, &mut errors);
    }

    let role = validate_role(optional_string(map, "role", &mut errors), &mut errors);

    if !errors.is_empty() {
        return Err(errors.into_error());
    }

    let patch = ProfilePatch {
        name,
        email,
        password,
        age,
        location,
        role,
    };

    if patch.is_empty() {
        return Err(ApiError::validation(
            "At least one field is required for update",
            Default::default(),
        ));
    }

    Ok(patch)
}

fn validate_role(role: Option<String>, errors: &mut FieldErrors) -> Option<String> {
    match role {
        Some(role) if VALID_ROLES.contains(&role.as_str()) => Some(role),
        Some(_) => {
            errors.add(
                "role",
                format!("role must be one of: {}", VALID_ROLES.join(", ")),
            );
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn signup_happy_path_normalizes() {
        let input = validate_signup(&json!({
            "name": "  Ann  ",
            "email": "Ann@X.com",
            "password": "Secret123!",
            "age": 30,
            "location": "Lisbon"
        }))
        .unwrap();
        assert_eq!(input.name, "Ann");
        assert_eq!(input.email, "ann@x.com");
        assert_eq!(input.age, Some(30));
        assert_eq!(input.role, "user");
    }

    #[test]
    fn signup_collects_all_violations_at_once() {
        let err = validate_signup(&json!({
            "email": "not-an-email",
            "password": "short",
            "age": 300
        }))
        .unwrap_err();
        let body = err.to_json();
        assert!(body["errors"]["name"].is_string());
        assert!(body["errors"]["email"].is_string());
        assert!(body["errors"]["password"].is_string());
        assert!(body["errors"]["age"].is_string());
    }

    #[test]
    fn signup_rejects_owner_like_fields() {
        let err = validate_signup(&json!({
            "name": "Ann",
            "email": "ann@x.com",
            "password": "Secret123!",
            "id": "11111111-1111-1111-1111-111111111111",
            "is_active": false
        }))
        .unwrap_err();
        let body = err.to_json();
        assert_eq!(body["errors"]["id"], "Unknown field");
        assert_eq!(body["errors"]["is_active"], "Unknown field");
    }

    #[test]
    fn signup_role_membership() {
        let err = validate_signup(&json!({
            "name": "Ann",
            "email": "ann@x.com",
            "password": "Secret123!",
            "role": "superuser"
        }))
        .unwrap_err();
        assert!(err.to_json()["errors"]["role"]
            .as_str()
            .unwrap()
            .contains("user, admin"));

        let ok = validate_signup(&json!({
            "name": "Ann",
            "email": "ann@x.com",
            "password": "Secret123!",
            "role": "admin"
        }))
        .unwrap();
        assert_eq!(ok.role, "admin");
    }

    #[test]
    fn login_requires_both_fields() {
        let err = validate_login(&json!({})).unwrap_err();
        let body = err.to_json();
        assert!(body["errors"]["email"].is_string());
        assert!(body["errors"]["password"].is_string());
    }

    #[test]
    fn profile_update_needs_at_least_one_field() {
        let err = validate_profile_update(&json!({})).unwrap_err();
        assert!(err
            .to_json()["message"]
            .as_str()
            .unwrap()
            .contains("At least one field"));

        let patch = validate_profile_update(&json!({"location": "Porto"})).unwrap();
        assert_eq!(patch.location.as_deref(), Some("Porto"));
        assert!(patch.name.is_none());
    }

    #[test]
    fn body_must_be_an_object() {
        assert!(validate_signup(&json!("just a string")).is_err());
        assert!(validate_login(&json!(42)).is_err());
    }
}
