//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod docs;
mod grpc;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

use crate::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; sem ele, "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let db_pool = config.connect_db().await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app_state = AppState::new(db_pool, &config)?;

    if let Some((email, password)) = &config.admin_credentials {
        app_state.auth_service.ensure_admin(email, password).await?;
    }

    // Agendamento padrão da importação do ERP
    match (&config.erp_sync_cron, &config.erp_remote) {
        (Some(period), Some(remote)) => {
            app_state.import_scheduler.start(remote.clone(), period).await?;
        }
        (Some(_), None) => {
            tracing::warn!("ERP_SYNC_CRON definido sem ERP_REMOTE_URL/USERNAME/PASSWORD; agendamento ignorado");
        }
        _ => {}
    }

    let app = routes::router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
