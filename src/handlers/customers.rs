// src/handlers/customers.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::customer::{CreateCustomerPayload, CustomerDetail, UpdateCustomerPayload},
};

#[utoipa::path(
    get,
    path = "/customers/me",
    tag = "Customers",
    responses(
        (status = 200, description = "Perfil do usuário logado", body = CustomerDetail),
        (status = 404, description = "Usuário sem perfil de cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<CustomerDetail>, AppError> {
    Ok(Json(app_state.customer_service.me(&user).await?))
}

#[utoipa::path(
    get,
    path = "/customers/admin",
    tag = "Customers",
    responses(
        (status = 200, description = "Todos os clientes", body = Vec<CustomerDetail>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_customers(State(app_state): State<AppState>) -> Result<Json<Vec<CustomerDetail>>, AppError> {
    Ok(Json(app_state.customer_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/customers/admin/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = CustomerDetail),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerDetail>, AppError> {
    Ok(Json(app_state.customer_service.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/customers/admin",
    tag = "Customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = CustomerDetail),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state.customer_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

#[utoipa::path(
    put,
    path = "/customers/admin/{id}",
    tag = "Customers",
    request_body = UpdateCustomerPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = CustomerDetail),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<Json<CustomerDetail>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.customer_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/customers/admin/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente, usuário e pedidos removidos"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.customer_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
