// src/grpc/stock_client.rs

use tonic::transport::Channel;

use crate::grpc::{
    proto::{StockRequest, StockResponse},
    method_path, unary,
};

#[derive(Clone)]
pub struct StockClient {
    channel: Channel,
    service: String,
}

impl StockClient {
    pub fn new(channel: Channel, service: &str) -> Self {
        Self { channel, service: service.to_string() }
    }

    pub async fn get_stock(&self, item_id: &str) -> Result<i32, tonic::Status> {
        tracing::debug!("[gRPC] GetStock para {}", item_id);
        let request = StockRequest { item_id: item_id.to_string() };
        let response: StockResponse = unary(self.channel.clone(), method_path(&self.service, "GetStock"), request)
            .await
            .inspect_err(|status| tracing::warn!("[gRPC] GetStock falhou: {}", status))?;
        Ok(response.quantity)
    }
}
