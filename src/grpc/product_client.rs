// src/grpc/product_client.rs

use tonic::transport::Channel;

use crate::grpc::{
    proto::{Empty, ProductIdRequest, ProductList, ProductResponse},
    method_path, unary,
};

#[derive(Clone)]
pub struct ProductClient {
    channel: Channel,
    service: String,
}

impl ProductClient {
    pub fn new(channel: Channel, service: &str) -> Self {
        Self { channel, service: service.to_string() }
    }

    pub async fn get_all_products(&self) -> Result<Vec<ProductResponse>, tonic::Status> {
        let list: ProductList = unary(self.channel.clone(), method_path(&self.service, "GetAllProducts"), Empty {})
            .await
            .inspect_err(|status| tracing::warn!("[gRPC] GetAllProducts falhou: {}", status))?;
        Ok(list.products)
    }

    pub async fn get_product_by_id(&self, id: &str) -> Result<ProductResponse, tonic::Status> {
        let request = ProductIdRequest { id: id.to_string() };
        unary(self.channel.clone(), method_path(&self.service, "GetProductById"), request)
            .await
            .inspect_err(|status| tracing::warn!("[gRPC] GetProductById falhou: {}", status))
    }
}
