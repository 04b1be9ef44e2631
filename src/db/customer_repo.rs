// src/db/customer_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::CustomerStore,
    models::{
        auth::NewUser,
        customer::{CustomerDetail, NewCustomer, UpdateCustomerPayload},
    },
};

// Cliente sempre sai "achatado" com o e-mail e o papel do usuário
const DETAIL_SELECT: &str = r#"
    SELECT c.id, c.user_id, c.name, c.address, u.email, u.role, c.created_at, c.updated_at
    FROM customers c
    JOIN users u ON u.id = c.user_id
"#;

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_detail<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<CustomerDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let detail = sqlx::query_as::<_, CustomerDetail>(&format!("{DETAIL_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(detail)
    }
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    async fn create_with_user(&self, user: &NewUser, customer: &NewCustomer) -> Result<CustomerDetail, AppError> {
        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // 1. Cria Usuário (Passando a transação)
        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, None))?; // Se falhar aqui, o tx sofre rollback ao sair do escopo (drop)

        // 2. Cria o Cliente ligado ao usuário
        let customer_id: Uuid = sqlx::query_scalar(
            "INSERT INTO customers (user_id, name, address) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user_id)
        .bind(&customer.name)
        .bind(&customer.address)
        .fetch_one(&mut *tx)
        .await?;

        let detail = self
            .fetch_detail(&mut *tx, customer_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Cliente recém-criado não encontrado"))?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---
        Ok(detail)
    }

    async fn list(&self) -> Result<Vec<CustomerDetail>, AppError> {
        let customers = sqlx::query_as::<_, CustomerDetail>(&format!("{DETAIL_SELECT} ORDER BY c.name ASC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(customers)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerDetail>, AppError> {
        self.fetch_detail(&self.pool, id).await
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<CustomerDetail>, AppError> {
        let detail = sqlx::query_as::<_, CustomerDetail>(&format!("{DETAIL_SELECT} WHERE c.user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(detail)
    }

    async fn update(&self, id: Uuid, changes: &UpdateCustomerPayload) -> Result<Option<CustomerDetail>, AppError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE customers SET name = $2, address = $3, updated_at = now()
            WHERE id = $1
            RETURNING user_id
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.address)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            return Ok(None);
        };

        if let Some(email) = &changes.email {
            sqlx::query("UPDATE users SET email = $2, updated_at = now() WHERE id = $1")
                .bind(user_id)
                .bind(email)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_unique_violation(e, None))?;
        }

        let detail = self.fetch_detail(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        // O CASCADE em customers/orders cuida do resto
        let result = sqlx::query("DELETE FROM users WHERE id = (SELECT user_id FROM customers WHERE id = $1)")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

