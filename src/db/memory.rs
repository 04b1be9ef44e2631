// src/db/memory.rs
//
// Implementação em memória dos stores, só para testes. Reproduz as regras que o
// Postgres garante (UNIQUE de e-mail e external_id, CASCADE, SET NULL).

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerStore, OrderStore, ProductStore, UserStore},
    models::{
        auth::{NewUser, User},
        catalog::{Product, ProductDraft},
        customer::{CustomerDetail, NewCustomer, UpdateCustomerPayload},
        order::{NewOrderItem, Order, OrderDetail, OrderItem, OrderStatus},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    customers: Vec<(Uuid, Uuid, NewCustomer, chrono::DateTime<Utc>)>,
    products: Vec<Product>,
    orders: Vec<OrderDetail>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn detail(tables: &Tables, customer_id: Uuid) -> Option<CustomerDetail> {
        let (id, user_id, data, created_at) = tables.customers.iter().find(|c| c.0 == customer_id)?;
        let user = tables.users.iter().find(|u| u.id == *user_id)?;
        Some(CustomerDetail {
            id: *id,
            user_id: *user_id,
            name: data.name.clone(),
            address: data.address.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: *created_at,
            updated_at: *created_at,
        })
    }

    fn external_id_taken(tables: &Tables, external_id: Option<&str>, except: Option<Uuid>) -> bool {
        match external_id {
            Some(ext) => tables
                .products
                .iter()
                .any(|p| p.external_id.as_deref() == Some(ext) && Some(p.id) != except),
            None => false,
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Product>, AppError> {
        let mut products = self.tables.lock().unwrap().products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Product>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .iter()
            .find(|p| p.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn insert(&self, draft: &ProductDraft) -> Result<Product, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if Self::external_id_taken(&tables, draft.external_id.as_deref(), None) {
            return Err(AppError::ExternalIdAlreadyExists(draft.external_id.clone().unwrap_or_default()));
        }
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            stock: draft.stock,
            external_id: draft.external_id.clone(),
            image_url: draft.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: Uuid, draft: &ProductDraft) -> Result<Option<Product>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if Self::external_id_taken(&tables, draft.external_id.as_deref(), Some(id)) {
            return Err(AppError::ExternalIdAlreadyExists(draft.external_id.clone().unwrap_or_default()));
        }
        let Some(product) = tables.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.name = draft.name.clone();
        product.description = draft.description.clone();
        product.price = draft.price;
        product.stock = draft.stock;
        product.external_id = draft.external_id.clone();
        product.image_url = draft.image_url.clone();
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        let removed = tables.products.len() < before;
        if removed {
            // ON DELETE SET NULL
            for order in tables.orders.iter_mut() {
                for item in order.items.iter_mut().filter(|i| i.product_id == Some(id)) {
                    item.product_id = None;
                }
            }
        }
        Ok(removed)
    }

    async fn list_external_ids(&self) -> Result<Vec<(Uuid, String)>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .iter()
            .filter_map(|p| p.external_id.clone().map(|ext| (p.id, ext)))
            .collect())
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn create_with_user(&self, user: &NewUser, customer: &NewCustomer) -> Result<CustomerDetail, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        let now = Utc::now();
        let user_id = Uuid::new_v4();
        tables.users.push(User {
            id: user_id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: now,
            updated_at: now,
        });
        let customer_id = Uuid::new_v4();
        tables.customers.push((customer_id, user_id, customer.clone(), now));
        Ok(Self::detail(&tables, customer_id).expect("cliente recém-inserido"))
    }

    async fn list(&self) -> Result<Vec<CustomerDetail>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut all: Vec<CustomerDetail> = tables
            .customers
            .iter()
            .filter_map(|c| Self::detail(&tables, c.0))
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerDetail>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(Self::detail(&tables, id))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<CustomerDetail>, AppError> {
        let tables = self.tables.lock().unwrap();
        let id = tables.customers.iter().find(|c| c.1 == user_id).map(|c| c.0);
        Ok(id.and_then(|id| Self::detail(&tables, id)))
    }

    async fn update(&self, id: Uuid, changes: &UpdateCustomerPayload) -> Result<Option<CustomerDetail>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(user_id) = tables.customers.iter().find(|c| c.0 == id).map(|c| c.1) else {
            return Ok(None);
        };
        if let Some(email) = &changes.email {
            if tables.users.iter().any(|u| &u.email == email && u.id != user_id) {
                return Err(AppError::EmailAlreadyExists);
            }
            if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
                user.email = email.clone();
            }
        }
        if let Some(c) = tables.customers.iter_mut().find(|c| c.0 == id) {
            c.2.name = changes.name.clone();
            c.2.address = changes.address.clone();
        }
        Ok(Self::detail(&tables, id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(user_id) = tables.customers.iter().find(|c| c.0 == id).map(|c| c.1) else {
            return Ok(false);
        };
        tables.customers.retain(|c| c.0 != id);
        tables.users.retain(|u| u.id != user_id);
        tables.orders.retain(|o| o.header.customer_id != id);
        Ok(true)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create(
        &self,
        customer_id: Uuid,
        items: &[NewOrderItem],
        total: Decimal,
    ) -> Result<OrderDetail, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let detail = OrderDetail {
            header: Order {
                id: order_id,
                customer_id,
                status: OrderStatus::Pending,
                total_amount: total,
                created_at: now,
                updated_at: now,
            },
            items: items
                .iter()
                .map(|i| OrderItem {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: Some(i.product_id),
                    product_name: i.product_name.clone(),
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                })
                .collect(),
        };
        tables.orders.push(detail.clone());
        Ok(detail)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderDetail>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.orders.iter().find(|o| o.header.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<OrderDetail>, AppError> {
        Ok(self.tables.lock().unwrap().orders.clone())
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<OrderDetail>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.header.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<OrderDetail>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(order) = tables.orders.iter_mut().find(|o| o.header.id == id) else {
            return Ok(None);
        };
        order.header.status = status;
        order.header.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.orders.len();
        tables.orders.retain(|o| o.header.id != id);
        Ok(tables.orders.len() < before)
    }
}
