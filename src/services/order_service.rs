// src/services/order_service.rs

use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{CustomerStore, OrderStore, ProductStore},
    grpc::{
        proto::{OrderItem as ErpOrderItem, OrderRequest, OrderResponse},
        OrderClient,
    },
    models::{
        auth::User,
        customer::CustomerDetail,
        order::{order_total, CreateOrderPayload, NewOrderItem, OrderDetail, OrderStatus},
    },
};

const ERP_CURRENCY: &str = "EUR";

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    products: Arc<dyn ProductStore>,
    customers: Arc<dyn CustomerStore>,
    erp_orders: OrderClient,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        products: Arc<dyn ProductStore>,
        customers: Arc<dyn CustomerStore>,
        erp_orders: OrderClient,
    ) -> Self {
        Self { orders, products, customers, erp_orders }
    }

    /// Cria o pedido congelando nome e preço de cada produto no momento da compra.
    pub async fn create(&self, customer_id: Uuid, payload: CreateOrderPayload) -> Result<OrderDetail, AppError> {
        payload.validate()?;

        self.customers
            .find_by_id(customer_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        let mut items = Vec::with_capacity(payload.items.len());
        for item in &payload.items {
            let product = self
                .products
                .find_by_id(item.product_id)
                .await?
                .ok_or(AppError::NotFound("Produto"))?;
            items.push(NewOrderItem {
                product_id: product.id,
                product_name: product.name,
                quantity: item.quantity,
                unit_price: product.price,
            });
        }

        let total = order_total(&items);
        let order = self.orders.create(customer_id, &items, total).await?;
        tracing::info!("🧾 Pedido {} criado para o cliente {} (total {})", order.header.id, customer_id, total);
        Ok(order)
    }

    pub async fn create_mine(&self, user: &User, payload: CreateOrderPayload) -> Result<OrderDetail, AppError> {
        let customer = self.customer_of(user).await?;
        self.create(customer.id, payload).await
    }

    pub async fn list_all(&self) -> Result<Vec<OrderDetail>, AppError> {
        self.orders.list_all().await
    }

    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<OrderDetail>, AppError> {
        self.customers
            .find_by_id(customer_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;
        self.orders.list_by_customer(customer_id).await
    }

    pub async fn list_mine(&self, user: &User) -> Result<Vec<OrderDetail>, AppError> {
        let customer = self.customer_of(user).await?;
        self.orders.list_by_customer(customer.id).await
    }

    // Dono ou admin. Para os demais o pedido "não existe".
    pub async fn get(&self, id: Uuid, user: &User) -> Result<OrderDetail, AppError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;

        if user.is_admin() {
            return Ok(order);
        }
        match self.customers.find_by_user_id(user.id).await? {
            Some(customer) if customer.id == order.header.customer_id => Ok(order),
            _ => Err(AppError::NotFound("Pedido")),
        }
    }

    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<OrderDetail, AppError> {
        let current = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;

        let from = current.header.status;
        if !from.can_transition_to(status) {
            return Err(AppError::InvalidStatusTransition {
                from: from.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }
        if from == status {
            return Ok(current);
        }

        let updated = self
            .orders
            .update_status(id, status)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;
        tracing::info!("Pedido {}: {} -> {}", id, from.as_str(), status.as_str());
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.orders.delete(id).await? {
            return Err(AppError::NotFound("Pedido"));
        }
        Ok(())
    }

    /// Envia um pedido local para o ERP e devolve a resposta de lá.
    pub async fn forward_to_erp(&self, id: Uuid) -> Result<OrderResponse, AppError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;

        let response = self.erp_orders.create_order(erp_order_request(&order)).await?;
        tracing::info!("Pedido {} enviado ao ERP como {}", id, response.order_id);
        Ok(response)
    }

    pub async fn erp_orders(&self) -> Result<Vec<OrderResponse>, AppError> {
        Ok(self.erp_orders.get_all_orders().await?)
    }

    pub async fn erp_order(&self, erp_order_id: &str) -> Result<OrderResponse, AppError> {
        Ok(self.erp_orders.get_order_by_id(erp_order_id).await?)
    }

    pub async fn change_erp_order_status(
        &self,
        erp_order_id: &str,
        status: OrderStatus,
    ) -> Result<OrderResponse, AppError> {
        Ok(self
            .erp_orders
            .change_order_status(erp_order_id, status.as_str())
            .await?)
    }

    async fn customer_of(&self, user: &User) -> Result<CustomerDetail, AppError> {
        self.customers
            .find_by_user_id(user.id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }
}

// Pedido local -> mensagem do ERP. Itens numerados a partir de 1.
fn erp_order_request(order: &OrderDetail) -> OrderRequest {
    let items = order
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| ErpOrderItem {
            item_id: idx as i32 + 1,
            product_uuid: item.product_id.map(|id| id.to_string()).unwrap_or_default(),
            quantity: item.quantity,
            item_amount: item.unit_price.to_f64().unwrap_or_default(),
            currency: ERP_CURRENCY.to_string(),
        })
        .collect();

    OrderRequest {
        customer_id: order.header.customer_id.to_string(),
        order_date: order.header.created_at.format("%Y-%m-%d").to_string(),
        order_amount: order.header.total_amount.to_f64().unwrap_or_default(),
        currency: ERP_CURRENCY.to_string(),
        items,
    }
}
