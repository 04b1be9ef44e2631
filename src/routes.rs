// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::{admin_guard, auth_guard},
};

pub fn router(app_state: AppState) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/products", get(handlers::products::list_products))
        .route("/products/{id}", get(handlers::products::get_product));

    // Qualquer usuário logado
    let user_routes = Router::new()
        .route("/products/{id}/stock", get(handlers::products::erp_stock))
        .route("/customers/me", get(handlers::customers::get_me))
        .route(
            "/orders",
            get(handlers::orders::list_my_orders).post(handlers::orders::create_my_order),
        )
        .route("/orders/{id}", get(handlers::orders::get_order))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Somente ADMIN
    let admin_routes = Router::new()
        .route("/products/admin", post(handlers::products::create_product))
        .route(
            "/products/admin/{id}",
            put(handlers::products::update_product).delete(handlers::products::delete_product),
        )
        .route(
            "/customers/admin",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/customers/admin/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route(
            "/orders/customer/{customer_id}",
            get(handlers::orders::list_customer_orders).post(handlers::orders::create_customer_order),
        )
        .route("/orders/admin", get(handlers::orders::list_all_orders))
        .route("/orders/admin/{id}", axum::routing::delete(handlers::orders::delete_order))
        .route("/orders/admin/{id}/status", put(handlers::orders::update_order_status))
        .route("/orders/admin/{id}/erp", post(handlers::orders::forward_order_to_erp))
        .route("/import/admin/start", post(handlers::import::start_import))
        .route("/import/admin/stop", post(handlers::import::stop_import))
        .route("/import/admin/run-now", post(handlers::import::run_import_now))
        .route("/import/admin/status", get(handlers::import::import_status))
        .route("/erp/admin/products", get(handlers::erp::list_erp_products))
        .route("/erp/admin/products/{id}", get(handlers::erp::get_erp_product))
        .route("/erp/admin/orders", get(handlers::erp::list_erp_orders))
        .route("/erp/admin/orders/{id}", get(handlers::erp::get_erp_order))
        .route("/erp/admin/orders/{id}/status", put(handlers::erp::change_erp_order_status))
        // A última camada roda primeiro: auth_guard -> admin_guard -> handler.
        // route_layer: rota inexistente continua 404/405, não 401
        .route_layer(axum_middleware::from_fn(admin_guard))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .with_state(app_state)
}
