pub mod store;
pub use store::{CustomerStore, OrderStore, ProductStore, UserStore};
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;

#[cfg(test)]
pub mod memory;
