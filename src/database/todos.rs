use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::database::models::Todo;
use crate::error::ApiError;
use crate::validation::todo::{NewTodo, TodoPatch};

const TODO_COLUMNS: &str = "id, user_id, title, completed, created_at";

/// Ownership-scoped todo storage. Every statement binds the caller's
/// identity; there is no way to address another identity's rows.
pub struct TodoRepository {
    pool: PgPool,
}

impl TodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The owner column comes from the verified identity, never the payload.
    pub async fn create(&self, owner_id: Uuid, input: &NewTodo) -> Result<Todo, ApiError> {
        let sql = format!(
            "INSERT INTO todos (user_id, title, completed) VALUES ($1, $2, $3) RETURNING {}",
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(owner_id)
            .bind(&input.title)
            .bind(input.completed)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Todo>, ApiError> {
        let sql = format!(
            "SELECT {} FROM todos WHERE user_id = $1 ORDER BY created_at DESC",
            TODO_COLUMNS
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    /// Single atomic statement filtering on `(id AND owner)`. A row that is
    /// absent and a row that belongs to someone else both come back as zero
    /// rows, and the caller cannot tell which it was.
    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &TodoPatch,
    ) -> Result<Todo, ApiError> {
        let mut qb = QueryBuilder::new("UPDATE todos SET ");
        let mut first = true;
        if let Some(title) = &patch.title {
            qb.push("title = ").push_bind(title);
            first = false;
        }
        if let Some(completed) = patch.completed {
            if !first {
                qb.push(", ");
            }
            qb.push("completed = ").push_bind(completed);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND user_id = ").push_bind(owner_id);
        qb.push(format!(" RETURNING {}", TODO_COLUMNS));

        qb.build_query_as::<Todo>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found_or_forbidden("Todo not found"))
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found_or_forbidden("Todo not found"));
        }
        Ok(())
    }
}
