use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::database::models::Order;
use crate::error::ApiError;
use crate::validation::order::{NewOrder, OrderPatch};

const ORDER_COLUMNS: &str = "id, user_id, customer_id, product_name, quantity, price, created_at";

pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order after checking the referenced customer exists and
    /// belongs to the caller. The check and the insert are separate
    /// statements, so the customer can vanish in between; if it does, the
    /// store's foreign-key rejection translates to the same error and stays
    /// authoritative.
    pub async fn create(&self, owner_id: Uuid, input: &NewOrder) -> Result<Order, ApiError> {
        let parent =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM customers WHERE id = $1 AND user_id = $2")
                .bind(input.customer_id)
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await?;
        if parent.is_none() {
            return Err(ApiError::reference_not_found("Customer not found"));
        }

        let sql = format!(
            "INSERT INTO orders (user_id, customer_id, product_name, quantity, price) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(owner_id)
            .bind(input.customer_id)
            .bind(&input.product_name)
            .bind(input.quantity)
            .bind(input.price)
            .fetch_one(&self.pool)
            .await?;
        Ok(order)
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Order>, ApiError> {
        let sql = format!(
            "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &OrderPatch,
    ) -> Result<Order, ApiError> {
        let mut qb = QueryBuilder::new("UPDATE orders SET ");
        let mut first = true;
        if let Some(product_name) = &patch.product_name {
            qb.push("product_name = ").push_bind(product_name);
            first = false;
        }
        if let Some(quantity) = patch.quantity {
            if !first {
                qb.push(", ");
            }
            qb.push("quantity = ").push_bind(quantity);
            first = false;
        }
        if let Some(price) = patch.price {
            if !first {
                qb.push(", ");
            }
            qb.push("price = ").push_bind(price);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND user_id = ").push_bind(owner_id);
        qb.push(format!(" RETURNING {}", ORDER_COLUMNS));

        qb.build_query_as::<Order>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found_or_forbidden("Order not found"))
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found_or_forbidden("Order not found"));
        }
        Ok(())
    }
}
