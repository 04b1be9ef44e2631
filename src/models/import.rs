// src/models/import.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Credenciais e endereço do feed de produtos do ERP
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ErpRemote {
    #[validate(url(message = "O endpoint deve ser uma URL válida."))]
    #[schema(example = "https://erp.example.com/export/products.json")]
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

// POST /import/admin/start
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StartImportPayload {
    #[serde(flatten)]
    #[validate(nested)]
    pub remote: ErpRemote,
    // Expressão cron (com segundos, estilo Spring): "0 */15 * * * *"
    #[validate(length(min = 1, message = "O período é obrigatório."))]
    #[schema(example = "0 */15 * * * *")]
    pub period: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncTrigger {
    Manual,
    Scheduled,
}

// Resultado de uma execução bem-sucedida
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub received: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LastRun {
    pub finished_at: DateTime<Utc>,
    pub trigger: SyncTrigger,
    pub report: Option<SyncReport>,
    pub error: Option<String>,
}

// GET /import/admin/status
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportStatus {
    pub scheduled: bool,
    pub schedule: Option<String>,
    pub running: bool,
    pub last_run: Option<LastRun>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
