// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::{CustomerStore, UserStore},
    models::{
        auth::{Claims, LoginResponse, NewUser, RegisterResponse, RegisterUserPayload, Role, User},
        customer::{CustomerDetail, NewCustomer},
    },
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    customers: Arc<dyn CustomerStore>,
    jwt_secret: String,
    token_ttl: chrono::Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        customers: Arc<dyn CustomerStore>,
        jwt_secret: String,
        token_ttl_hours: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            customers,
            jwt_secret,
            token_ttl: chrono::Duration::hours(token_ttl_hours),
            bcrypt_cost,
        }
    }

    pub async fn register(&self, payload: RegisterUserPayload) -> Result<RegisterResponse, AppError> {
        let customer = self
            .create_account(
                NewCustomer { name: payload.name, address: payload.address },
                &payload.email,
                &payload.password,
                Role::Customer,
            )
            .await?;

        let user = self
            .users
            .find_by_id(customer.user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Usuário recém-criado não encontrado"))?;
        let token = self.create_token(&user)?;

        Ok(RegisterResponse { role: customer.role, customer, token })
    }

    /// Cria usuário + cliente na mesma transação. Usado no registro, pelo admin e no bootstrap.
    pub async fn create_account(
        &self,
        customer: NewCustomer,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<CustomerDetail, AppError> {
        // Checagem antecipada; a constraint UNIQUE cobre a corrida
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = self.hash_password(password).await?;
        let new_user = NewUser {
            email: email.to_string(),
            password_hash,
            role,
        };
        self.customers.create_with_user(&new_user, &customer).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        Ok(LoginResponse {
            token: self.create_token(&user)?,
            role: user.role,
            email: user.email,
        })
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_claims(token)?;

        // Token de usuário removido também é inválido
        self.users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        Ok(token_data.claims)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Garante a conta de administrador configurada no ambiente. Retorna `true` se criou.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Ok(false);
        }
        self.create_account(
            NewCustomer { name: "Administrador".to_string(), address: None },
            email,
            password,
            Role::Admin,
        )
        .await?;
        tracing::info!("👤 Conta de administrador criada: {}", email);
        Ok(true)
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }
}
