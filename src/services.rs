pub mod auth;
pub mod customer_service;
pub mod erp_sync;
pub mod order_service;
pub mod product_service;
