// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Produto (linha da tabela 'products') ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Caneca de cerâmica")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "19.99")]
    pub price: Decimal,
    #[schema(example = 42)]
    pub stock: i32,
    // Chave do produto no ERP. NULL = produto criado localmente.
    #[schema(example = "ERP-1001")]
    pub external_id: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Campos graváveis de um produto. Serve tanto para o CRUD quanto para a importação.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub external_id: Option<String>,
    pub image_url: Option<String>,
}

/// Maior preço que cabe em `NUMERIC(12, 2)`.
pub const MAX_PRICE: Decimal = Decimal::from_parts(
    (999_999_999_999u64 & 0xFFFF_FFFF) as u32,
    (999_999_999_999u64 >> 32) as u32,
    0,
    false,
    2,
);

/// Preço gravável: não negativo, no máximo 2 casas decimais e até `MAX_PRICE`.
pub fn price_fits_column(price: &Decimal) -> bool {
    !price.is_sign_negative() && price.normalize().scale() <= 2 && *price <= MAX_PRICE
}

fn validate_price(val: &Decimal) -> Result<(), ValidationError> {
    if price_fits_column(val) {
        return Ok(());
    }
    let mut err = ValidationError::new("range");
    err.message = Some(
        "O preço deve ser positivo, com no máximo 2 casas decimais e até 9999999999.99.".into(),
    );
    Err(err)
}

// Payload de criação/edição (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_price"))]
    #[schema(example = "19.99")]
    pub price: Decimal,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    #[serde(default)]
    pub stock: i32,

    #[validate(length(min = 1, message = "O ID externo não pode ser vazio."))]
    pub external_id: Option<String>,

    pub image_url: Option<String>,
}

impl From<ProductPayload> for ProductDraft {
    fn from(p: ProductPayload) -> Self {
        Self {
            name: p.name,
            description: p.description,
            price: p.price,
            stock: p.stock,
            external_id: p.external_id,
            image_url: p.image_url,
        }
    }
}

// Resposta da consulta de estoque ao vivo no ERP
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErpStock {
    pub product_id: Uuid,
    pub external_id: String,
    pub quantity: i32,
}
