// src/services/customer_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CustomerStore,
    models::{
        auth::{Role, User},
        customer::{CreateCustomerPayload, CustomerDetail, NewCustomer, UpdateCustomerPayload},
    },
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerStore>,
    auth_service: AuthService,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerStore>, auth_service: AuthService) -> Self {
        Self { customers, auth_service }
    }

    pub async fn list(&self) -> Result<Vec<CustomerDetail>, AppError> {
        self.customers.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<CustomerDetail, AppError> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    // Perfil do usuário logado
    pub async fn me(&self, user: &User) -> Result<CustomerDetail, AppError> {
        self.customers
            .find_by_user_id(user.id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    pub async fn create(&self, payload: CreateCustomerPayload) -> Result<CustomerDetail, AppError> {
        let customer = NewCustomer { name: payload.name, address: payload.address };
        let role = payload.role.unwrap_or(Role::Customer);
        self.auth_service
            .create_account(customer, &payload.email, &payload.password, role)
            .await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateCustomerPayload) -> Result<CustomerDetail, AppError> {
        self.customers
            .update(id, &payload)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    // Remove o cliente, o usuário e os pedidos (CASCADE)
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.customers.delete(id).await? {
            return Err(AppError::NotFound("Cliente"));
        }
        tracing::info!("Cliente removido: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory::MemoryStore, UserStore};

    fn setup() -> (Arc<MemoryStore>, CustomerService) {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone(), store.clone(), "segredo".to_string(), 24, 4);
        (store.clone(), CustomerService::new(store, auth))
    }

    fn payload(email: &str, role: Option<Role>) -> CreateCustomerPayload {
        CreateCustomerPayload {
            name: "João".to_string(),
            email: email.to_string(),
            password: "senha123".to_string(),
            address: None,
            role,
        }
    }

    #[tokio::test]
    async fn create_defaults_to_customer_role() {
        let (_, service) = setup();
        let customer = service.create(payload("joao@example.com", None)).await.unwrap();
        assert_eq!(customer.role, Role::Customer);

        let admin = service.create(payload("chefe@example.com", Some(Role::Admin))).await.unwrap();
        assert_eq!(admin.role, Role::Admin);

        let err = service.create(payload("joao@example.com", None)).await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn update_changes_profile_and_email() {
        let (store, service) = setup();
        let customer = service.create(payload("joao@example.com", None)).await.unwrap();

        let changes = UpdateCustomerPayload {
            name: "João Silva".to_string(),
            address: Some("Av. Brasil, 100".to_string()),
            email: Some("joao.silva@example.com".to_string()),
        };
        let updated = service.update(customer.id, changes.clone()).await.unwrap();
        assert_eq!(updated.name, "João Silva");
        assert_eq!(updated.email, "joao.silva@example.com");
        assert!(store.find_by_email("joao@example.com").await.unwrap().is_none());

        let user = store.find_by_email("joao.silva@example.com").await.unwrap().unwrap();
        assert_eq!(service.me(&user).await.unwrap().id, customer.id);

        assert!(matches!(service.update(Uuid::new_v4(), changes).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_login_too() {
        let (store, service) = setup();
        let customer = service.create(payload("joao@example.com", None)).await.unwrap();

        service.delete(customer.id).await.unwrap();
        assert!(matches!(service.get(customer.id).await, Err(AppError::NotFound(_))));
        assert!(store.find_by_email("joao@example.com").await.unwrap().is_none());
        assert!(matches!(service.delete(customer.id).await, Err(AppError::NotFound(_))));
    }
}
