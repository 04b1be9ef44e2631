// src/grpc/order_client.rs

use tonic::transport::Channel;

use crate::grpc::{
    proto::{Empty, OrderIdRequest, OrderList, OrderRequest, OrderResponse, OrderStatusRequest},
    method_path, unary,
};

#[derive(Clone)]
pub struct OrderClient {
    channel: Channel,
    service: String,
}

impl OrderClient {
    pub fn new(channel: Channel, service: &str) -> Self {
        Self { channel, service: service.to_string() }
    }

    pub async fn create_order(&self, request: OrderRequest) -> Result<OrderResponse, tonic::Status> {
        tracing::debug!("[gRPC] CreateOrder para o cliente {}", request.customer_id);
        unary(self.channel.clone(), method_path(&self.service, "CreateOrder"), request)
            .await
            .inspect_err(|status| tracing::warn!("[gRPC] CreateOrder falhou: {}", status))
    }

    pub async fn get_order_by_id(&self, order_id: &str) -> Result<OrderResponse, tonic::Status> {
        let request = OrderIdRequest { order_id: order_id.to_string() };
        unary(self.channel.clone(), method_path(&self.service, "GetOrderById"), request)
            .await
            .inspect_err(|status| tracing::warn!("[gRPC] GetOrderById falhou: {}", status))
    }

    pub async fn change_order_status(
        &self,
        order_id: &str,
        new_status: &str,
    ) -> Result<OrderResponse, tonic::Status> {
        let request = OrderStatusRequest {
            order_id: order_id.to_string(),
            new_status: new_status.to_string(),
        };
        unary(self.channel.clone(), method_path(&self.service, "ChangeOrderStatus"), request)
            .await
            .inspect_err(|status| tracing::warn!("[gRPC] ChangeOrderStatus falhou: {}", status))
    }

    pub async fn get_all_orders(&self) -> Result<Vec<OrderResponse>, tonic::Status> {
        let list: OrderList = unary(self.channel.clone(), method_path(&self.service, "GetAllOrders"), Empty {})
            .await
            .inspect_err(|status| tracing::warn!("[gRPC] GetAllOrders falhou: {}", status))?;
        Ok(list.orders)
    }
}
