// src/services/product_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductStore,
    grpc::{proto::ProductResponse, ProductClient, StockClient},
    models::catalog::{ErpStock, Product, ProductDraft},
};

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStore>,
    stock_client: StockClient,
    erp_products: ProductClient,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>, stock_client: StockClient, erp_products: ProductClient) -> Self {
        Self { products, stock_client, erp_products }
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        self.products.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn create(&self, draft: ProductDraft) -> Result<Product, AppError> {
        let product = self.products.insert(&draft).await?;
        tracing::info!("Produto criado: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn update(&self, id: Uuid, draft: ProductDraft) -> Result<Product, AppError> {
        self.products
            .update(id, &draft)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.products.delete(id).await? {
            return Err(AppError::NotFound("Produto"));
        }
        tracing::info!("Produto removido: {}", id);
        Ok(())
    }

    // Estoque ao vivo no ERP. Só faz sentido para produtos que vieram de lá.
    pub async fn stock_from_erp(&self, id: Uuid) -> Result<ErpStock, AppError> {
        let product = self.get(id).await?;
        let external_id = product
            .external_id
            .ok_or(AppError::NotFound("Produto do ERP"))?;

        let quantity = self.stock_client.get_stock(&external_id).await?;
        Ok(ErpStock { product_id: product.id, external_id, quantity })
    }

    // Catálogo do ERP como está lá, sem passar pela tabela local
    pub async fn erp_catalog(&self) -> Result<Vec<ProductResponse>, AppError> {
        Ok(self.erp_products.get_all_products().await?)
    }

    pub async fn erp_product(&self, external_id: &str) -> Result<ProductResponse, AppError> {
        Ok(self.erp_products.get_product_by_id(external_id).await?)
    }
}
