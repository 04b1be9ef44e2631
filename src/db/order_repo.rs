// src/db/order_repo.rs

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::OrderStore,
    models::order::{NewOrderItem, Order, OrderDetail, OrderItem, OrderStatus},
};

const ORDER_COLUMNS: &str = "id, customer_id, status, total_amount, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, quantity, unit_price";

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca os itens de vários pedidos numa query só e monta os OrderDetail
    async fn with_items<'e, E>(&self, executor: E, orders: Vec<Order>) -> Result<Vec<OrderDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY product_name ASC"
        ))
        .bind(&ids)
        .fetch_all(executor)
        .await?;

        let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|header| {
                let items = by_order.remove(&header.id).unwrap_or_default();
                OrderDetail { header, items }
            })
            .collect())
    }

    async fn detail(&self, order: Option<Order>) -> Result<Option<OrderDetail>, AppError> {
        match order {
            Some(order) => Ok(self.with_items(&self.pool, vec![order]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn create(
        &self,
        customer_id: Uuid,
        items: &[NewOrderItem],
        total: Decimal,
    ) -> Result<OrderDetail, AppError> {
        // Cabeçalho + itens na mesma transação
        let mut tx = self.pool.begin().await?;

        let header = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (customer_id, total_amount) VALUES ($1, $2) RETURNING {ORDER_COLUMNS}"
        ))
        .bind(customer_id)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, OrderItem>(&format!(
                r#"
                INSERT INTO order_items (order_id, product_id, product_name, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(header.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(row);
        }

        tx.commit().await?;
        Ok(OrderDetail { header, items: saved })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderDetail>, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        self.detail(order).await
    }

    async fn list_all(&self) -> Result<Vec<OrderDetail>, AppError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        self.with_items(&self.pool, orders).await
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<OrderDetail>, AppError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        self.with_items(&self.pool, orders).await
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<OrderDetail>, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        self.detail(order).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
