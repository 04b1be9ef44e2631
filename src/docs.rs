// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::grpc;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::erp_stock,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Customers ---
        handlers::customers::get_me,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Orders ---
        handlers::orders::list_my_orders,
        handlers::orders::create_my_order,
        handlers::orders::get_order,
        handlers::orders::list_customer_orders,
        handlers::orders::create_customer_order,
        handlers::orders::list_all_orders,
        handlers::orders::update_order_status,
        handlers::orders::delete_order,
        handlers::orders::forward_order_to_erp,

        // --- Import ---
        handlers::import::start_import,
        handlers::import::stop_import,
        handlers::import::run_import_now,
        handlers::import::import_status,

        // --- ERP ---
        handlers::erp::list_erp_products,
        handlers::erp::get_erp_product,
        handlers::erp::list_erp_orders,
        handlers::erp::get_erp_order,
        handlers::erp::change_erp_order_status,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::RegisterResponse,
            models::auth::LoginResponse,

            // --- Catalog ---
            models::catalog::Product,
            models::catalog::ProductPayload,
            models::catalog::ErpStock,

            // --- Customers ---
            models::customer::CustomerDetail,
            models::customer::CreateCustomerPayload,
            models::customer::UpdateCustomerPayload,

            // --- Orders ---
            models::order::OrderStatus,
            models::order::Order,
            models::order::OrderItem,
            models::order::OrderDetail,
            models::order::OrderItemPayload,
            models::order::CreateOrderPayload,

            // --- Import ---
            models::import::ErpRemote,
            models::import::StartImportPayload,
            models::import::SyncTrigger,
            models::import::SyncReport,
            models::import::LastRun,
            models::import::ImportStatus,
            models::import::MessageResponse,

            // --- ERP (gRPC) ---
            grpc::proto::ProductResponse,
            grpc::proto::OrderItem,
            grpc::proto::OrderResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Products", description = "Catálogo de Produtos"),
        (name = "Customers", description = "Gestão de Clientes"),
        (name = "Orders", description = "Pedidos e Status"),
        (name = "Import", description = "Importação Agendada do Catálogo do ERP"),
        (name = "ERP", description = "Consultas Diretas ao ERP (gRPC)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
