pub mod auth;
pub mod customers;
pub mod erp;
pub mod import;
pub mod orders;
pub mod products;
