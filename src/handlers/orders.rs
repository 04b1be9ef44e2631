// src/handlers/orders.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    grpc::proto::OrderResponse,
    middleware::auth::AuthenticatedUser,
    models::order::{CreateOrderPayload, OrderDetail, StatusQuery},
};

// --- Pedidos do próprio cliente ---

#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedidos do usuário logado", body = Vec<OrderDetail>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_orders(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<OrderDetail>>, AppError> {
    Ok(Json(app_state.order_service.list_mine(&user).await?))
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado", body = OrderDetail),
        (status = 400, description = "Pedido sem itens ou quantidade inválida"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_my_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.create_mine(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetail>, AppError> {
    Ok(Json(app_state.order_service.get(id, &user).await?))
}

// --- Administração ---

#[utoipa::path(
    get,
    path = "/orders/customer/{customer_id}",
    tag = "Orders",
    params(("customer_id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Pedidos do cliente", body = Vec<OrderDetail>),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_customer_orders(
    State(app_state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<Vec<OrderDetail>>, AppError> {
    Ok(Json(app_state.order_service.list_for_customer(customer_id).await?))
}

#[utoipa::path(
    post,
    path = "/orders/customer/{customer_id}",
    tag = "Orders",
    request_body = CreateOrderPayload,
    params(("customer_id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 201, description = "Pedido criado", body = OrderDetail),
        (status = 404, description = "Cliente ou produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer_order(
    State(app_state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.create(customer_id, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/orders/admin",
    tag = "Orders",
    responses(
        (status = 200, description = "Todos os pedidos", body = Vec<OrderDetail>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_all_orders(State(app_state): State<AppState>) -> Result<Json<Vec<OrderDetail>>, AppError> {
    Ok(Json(app_state.order_service.list_all().await?))
}

#[utoipa::path(
    put,
    path = "/orders/admin/{id}/status",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "ID do pedido"),
        StatusQuery
    ),
    responses(
        (status = 200, description = "Status alterado", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Transição de status não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<OrderDetail>, AppError> {
    Ok(Json(app_state.order_service.update_status(id, query.status).await?))
}

#[utoipa::path(
    delete,
    path = "/orders/admin/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 204, description = "Pedido removido"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.order_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/orders/admin/{id}/erp",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido registrado no ERP", body = OrderResponse),
        (status = 404, description = "Pedido não encontrado"),
        (status = 502, description = "ERP indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn forward_order_to_erp(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    Ok(Json(app_state.order_service.forward_to_erp(id).await?))
}
