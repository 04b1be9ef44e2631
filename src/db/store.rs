// src/db/store.rs
//
// Contratos de persistência. Os serviços falam com estes traits; em produção
// quem responde são os repositórios Postgres, nos testes o `memory::MemoryStore`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{NewUser, User},
        catalog::{Product, ProductDraft},
        customer::{CustomerDetail, NewCustomer, UpdateCustomerPayload},
        order::{NewOrderItem, OrderDetail, OrderStatus},
    },
};
use rust_decimal::Decimal;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError>;
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Product>, AppError>;
    async fn insert(&self, draft: &ProductDraft) -> Result<Product, AppError>;
    async fn update(&self, id: Uuid, draft: &ProductDraft) -> Result<Option<Product>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
    /// (id, external_id) de todo produto que veio do ERP.
    async fn list_external_ids(&self) -> Result<Vec<(Uuid, String)>, AppError>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Cria usuário + cliente atomicamente.
    async fn create_with_user(&self, user: &NewUser, customer: &NewCustomer) -> Result<CustomerDetail, AppError>;
    async fn list(&self) -> Result<Vec<CustomerDetail>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerDetail>, AppError>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<CustomerDetail>, AppError>;
    async fn update(&self, id: Uuid, changes: &UpdateCustomerPayload) -> Result<Option<CustomerDetail>, AppError>;
    /// Apaga cliente, usuário e pedidos.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create(
        &self,
        customer_id: Uuid,
        items: &[NewOrderItem],
        total: Decimal,
    ) -> Result<OrderDetail, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderDetail>, AppError>;
    async fn list_all(&self) -> Result<Vec<OrderDetail>, AppError>;
    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<OrderDetail>, AppError>;
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<OrderDetail>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
