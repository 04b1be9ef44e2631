// src/handlers/erp.rs
//
// Consultas diretas ao ERP via gRPC, sem passar pelas tabelas locais.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    grpc::proto::{OrderResponse, ProductResponse},
    models::order::StatusQuery,
};

#[utoipa::path(
    get,
    path = "/erp/admin/products",
    tag = "ERP",
    responses(
        (status = 200, description = "Catálogo do ERP", body = Vec<ProductResponse>),
        (status = 502, description = "ERP indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_erp_products(State(app_state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    Ok(Json(app_state.product_service.erp_catalog().await?))
}

#[utoipa::path(
    get,
    path = "/erp/admin/products/{id}",
    tag = "ERP",
    params(("id" = String, Path, description = "ID do produto no ERP")),
    responses(
        (status = 200, description = "Produto do ERP", body = ProductResponse),
        (status = 502, description = "ERP indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_erp_product(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    Ok(Json(app_state.product_service.erp_product(&id).await?))
}

#[utoipa::path(
    get,
    path = "/erp/admin/orders",
    tag = "ERP",
    responses(
        (status = 200, description = "Pedidos registrados no ERP", body = Vec<OrderResponse>),
        (status = 502, description = "ERP indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_erp_orders(State(app_state): State<AppState>) -> Result<Json<Vec<OrderResponse>>, AppError> {
    Ok(Json(app_state.order_service.erp_orders().await?))
}

#[utoipa::path(
    get,
    path = "/erp/admin/orders/{id}",
    tag = "ERP",
    params(("id" = String, Path, description = "ID do pedido no ERP")),
    responses(
        (status = 200, description = "Pedido do ERP", body = OrderResponse),
        (status = 502, description = "ERP indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_erp_order(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    Ok(Json(app_state.order_service.erp_order(&id).await?))
}

#[utoipa::path(
    put,
    path = "/erp/admin/orders/{id}/status",
    tag = "ERP",
    params(
        ("id" = String, Path, description = "ID do pedido no ERP"),
        StatusQuery
    ),
    responses(
        (status = 200, description = "Status alterado no ERP", body = OrderResponse),
        (status = 502, description = "ERP indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_erp_order_status(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<OrderResponse>, AppError> {
    Ok(Json(
        app_state
            .order_service
            .change_erp_order_status(&id, query.status)
            .await?,
    ))
}
