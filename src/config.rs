// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CustomerRepository, CustomerStore, OrderRepository, OrderStore, ProductRepository, ProductStore,
        UserRepository, UserStore,
    },
    grpc::{ErpClients, ErpServices},
    models::import::ErpRemote,
    services::{
        auth::AuthService,
        customer_service::CustomerService,
        erp_sync::{ErpSyncJob, ImportScheduler},
        order_service::OrderService,
        product_service::ProductService,
    },
};

// Tudo que vem do ambiente (.env opcional)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub admin_credentials: Option<(String, String)>,
    pub erp_remote: Option<ErpRemote>,
    pub erp_sync_cron: Option<String>,
    pub erp_archive_dir: Option<PathBuf>,
    pub erp_http_timeout: Duration,
    pub erp_grpc_url: String,
    pub erp_grpc_services: ErpServices,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let admin_credentials = match (optional("ADMIN_EMAIL"), optional("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        };
        let erp_remote = match (
            optional("ERP_REMOTE_URL"),
            optional("ERP_REMOTE_USERNAME"),
            optional("ERP_REMOTE_PASSWORD"),
        ) {
            (Some(endpoint), Some(username), Some(password)) => Some(ErpRemote { endpoint, username, password }),
            _ => None,
        };
        let defaults = ErpServices::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            jwt_expiration_hours: parse_or("JWT_EXPIRATION_HOURS", 24)?,
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            admin_credentials,
            erp_remote,
            erp_sync_cron: optional("ERP_SYNC_CRON"),
            erp_archive_dir: optional("ERP_ARCHIVE_DIR").map(PathBuf::from),
            erp_http_timeout: Duration::from_secs(parse_or("ERP_HTTP_TIMEOUT_SECS", 30)?),
            erp_grpc_url: optional("ERP_GRPC_URL").unwrap_or_else(|| "http://localhost:9090".to_string()),
            erp_grpc_services: ErpServices {
                stock: optional("ERP_GRPC_STOCK_SERVICE").unwrap_or(defaults.stock),
                product: optional("ERP_GRPC_PRODUCT_SERVICE").unwrap_or(defaults.product),
                order: optional("ERP_GRPC_ORDER_SERVICE").unwrap_or(defaults.order),
            },
        })
    }

    pub async fn connect_db(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;
        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

// Variável vazia conta como ausente
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{key} inválida: '{raw}'")),
        None => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub customer_service: CustomerService,
    pub order_service: OrderService,
    pub import_scheduler: Arc<ImportScheduler>,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: &Config) -> anyhow::Result<Self> {
        Self::assemble(
            Arc::new(UserRepository::new(db_pool.clone())),
            Arc::new(ProductRepository::new(db_pool.clone())),
            Arc::new(CustomerRepository::new(db_pool.clone())),
            Arc::new(OrderRepository::new(db_pool)),
            config,
        )
    }

    // --- Monta o gráfico de dependências ---
    fn assemble(
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        customers: Arc<dyn CustomerStore>,
        orders: Arc<dyn OrderStore>,
        config: &Config,
    ) -> anyhow::Result<Self> {
        let erp = ErpClients::connect_lazy(&config.erp_grpc_url, config.erp_http_timeout, &config.erp_grpc_services)
            .context("ERP_GRPC_URL inválida")?;

        let auth_service = AuthService::new(
            users,
            customers.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
            config.bcrypt_cost,
        );
        let product_service = ProductService::new(products.clone(), erp.stock, erp.products);
        let customer_service = CustomerService::new(customers.clone(), auth_service.clone());
        let order_service = OrderService::new(orders, products.clone(), customers, erp.orders);

        let job = ErpSyncJob::new(products, config.erp_http_timeout, config.erp_archive_dir.clone())
            .context("Falha ao criar o cliente HTTP do ERP")?;
        let import_scheduler = Arc::new(ImportScheduler::new(Arc::new(job)));

        Ok(Self {
            auth_service,
            product_service,
            customer_service,
            order_service,
            import_scheduler,
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            db_max_connections: 1,
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: "segredo-de-teste".to_string(),
            jwt_expiration_hours: 1,
            bcrypt_cost: 4,
            admin_credentials: None,
            erp_remote: None,
            erp_sync_cron: None,
            erp_archive_dir: None,
            erp_http_timeout: Duration::from_secs(1),
            erp_grpc_url: "http://127.0.0.1:1".to_string(),
            erp_grpc_services: ErpServices::default(),
        }
    }
}

#[cfg(test)]
impl AppState {
    pub fn in_memory(config: &Config) -> (Arc<crate::db::memory::MemoryStore>, Self) {
        let store = Arc::new(crate::db::memory::MemoryStore::new());
        let state = Self::assemble(store.clone(), store.clone(), store.clone(), store.clone(), config)
            .expect("estado de teste");
        (store, state)
    }
}
