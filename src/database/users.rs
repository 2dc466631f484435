use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::database::models::user::{User, UserProfile, USER_PROFILE_COLUMNS};
use crate::error::ApiError;
use crate::validation::identity::{ProfilePatch, SignupInput};

/// Identity storage. Unlike the owned-resource repositories, rows here are
/// keyed by the identity itself.
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new identity. The unique index on email is the arbiter of
    /// duplicate-registration races; a lost race surfaces as the conflict
    /// error via translation.
    pub async fn create(
        &self,
        input: &SignupInput,
        password_hash: &str,
    ) -> Result<UserProfile, ApiError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, age, location, role) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_PROFILE_COLUMNS
        );
        let user = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(&input.name)
            .bind(&input.email)
            .bind(password_hash)
            .bind(input.age)
            .bind(&input.location)
            .bind(&input.role)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    /// Full row including the password hash; only the login path calls this.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, age, location, role, is_active, \
             created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_PROFILE_COLUMNS);
        sqlx::query_as::<_, UserProfile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    /// Apply an allow-listed profile patch. The password arrives pre-hashed;
    /// this layer never sees plaintext.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        patch: &ProfilePatch,
        password_hash: Option<&str>,
    ) -> Result<UserProfile, ApiError> {
        let mut qb = QueryBuilder::new("UPDATE users SET updated_at = now()");
        if let Some(name) = &patch.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(email) = &patch.email {
            qb.push(", email = ").push_bind(email);
        }
        if let Some(hash) = password_hash {
            qb.push(", password_hash = ").push_bind(hash);
        }
        if let Some(age) = patch.age {
            qb.push(", age = ").push_bind(age);
        }
        if let Some(location) = &patch.location {
            qb.push(", location = ").push_bind(location);
        }
        if let Some(role) = &patch.role {
            qb.push(", role = ").push_bind(role);
        }
        qb.push(" WHERE id = ").push_bind(user_id);
        qb.push(format!(" RETURNING {}", USER_PROFILE_COLUMNS));

        qb.build_query_as::<UserProfile>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    /// Account removal. Owned rows go with it through the cascading foreign
    /// keys; no per-table cleanup happens here.
    pub async fn delete(&self, user_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("User not found"));
        }
        Ok(())
    }
}
