use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::database::models::Customer;
use crate::error::ApiError;
use crate::validation::customer::{CustomerPatch, NewCustomer};

const CUSTOMER_COLUMNS: &str = "id, user_id, full_name, email, phone, created_at";

pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        input: &NewCustomer,
    ) -> Result<Customer, ApiError> {
        let sql = format!(
            "INSERT INTO customers (user_id, full_name, email, phone) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            CUSTOMER_COLUMNS
        );
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(owner_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .fetch_one(&self.pool)
            .await?;
        Ok(customer)
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Customer>, ApiError> {
        let sql = format!(
            "SELECT {} FROM customers WHERE user_id = $1 ORDER BY created_at DESC",
            CUSTOMER_COLUMNS
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(customers)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &CustomerPatch,
    ) -> Result<Customer, ApiError> {
        let mut qb = QueryBuilder::new("UPDATE customers SET ");
        let mut first = true;
        if let Some(full_name) = &patch.full_name {
            qb.push("full_name = ").push_bind(full_name);
            first = false;
        }
        if let Some(email) = &patch.email {
            if !first {
                qb.push(", ");
            }
            qb.push("email = ").push_bind(email);
            first = false;
        }
        if let Some(phone) = &patch.phone {
            if !first {
                qb.push(", ");
            }
            qb.push("phone = ").push_bind(phone);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND user_id = ").push_bind(owner_id);
        qb.push(format!(" RETURNING {}", CUSTOMER_COLUMNS));

        qb.build_query_as::<Customer>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found_or_forbidden("Customer not found"))
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found_or_forbidden("Customer not found"));
        }
        Ok(())
    }
}
