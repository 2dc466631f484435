use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Full identity row. Deliberately not `Serialize`: the password hash must
/// never leave the process. Only the login path reads this type.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Safe-field projection of an identity, the only user shape that crosses
/// the response boundary.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
            location: user.location,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Column list matching `UserProfile`, for RETURNING clauses.
pub const USER_PROFILE_COLUMNS: &str =
    "id, name, email, age, location, role, created_at, updated_at";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_never_carries_the_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            age: Some(30),
            location: None,
            role: "user".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let profile = UserProfile::from(user);
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["email"], json!("ann@x.com"));
        assert!(value.get("password_hash").is_none());
        assert!(value.get("is_active").is_none());
    }
}
