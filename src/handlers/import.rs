// src/handlers/import.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::import::{ErpRemote, ImportStatus, MessageResponse, StartImportPayload, SyncReport},
};

#[utoipa::path(
    post,
    path = "/import/admin/start",
    tag = "Import",
    request_body = StartImportPayload,
    responses(
        (status = 200, description = "Importação agendada", body = MessageResponse),
        (status = 400, description = "Expressão cron ou endpoint inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn start_import(
    State(app_state): State<AppState>,
    Json(payload): Json<StartImportPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    let expression = app_state
        .import_scheduler
        .start(payload.remote, &payload.period)
        .await?;
    Ok(Json(MessageResponse {
        message: format!("Agendado com período: {expression}"),
    }))
}

#[utoipa::path(
    post,
    path = "/import/admin/stop",
    tag = "Import",
    responses(
        (status = 200, description = "Agendamento removido", body = MessageResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn stop_import(State(app_state): State<AppState>) -> Json<MessageResponse> {
    let message = if app_state.import_scheduler.stop().await {
        "Parado"
    } else {
        "Nenhum agendamento ativo"
    };
    Json(MessageResponse { message: message.to_string() })
}

#[utoipa::path(
    post,
    path = "/import/admin/run-now",
    tag = "Import",
    request_body = ErpRemote,
    responses(
        (status = 200, description = "Importação executada", body = SyncReport),
        (status = 409, description = "Já existe uma importação em andamento"),
        (status = 502, description = "Falha no download ou feed inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn run_import_now(
    State(app_state): State<AppState>,
    Json(remote): Json<ErpRemote>,
) -> Result<Json<SyncReport>, AppError> {
    remote.validate()?;

    Ok(Json(app_state.import_scheduler.run_now(&remote).await?))
}

#[utoipa::path(
    get,
    path = "/import/admin/status",
    tag = "Import",
    responses(
        (status = 200, description = "Situação do agendamento e da última execução", body = ImportStatus)
    ),
    security(("api_jwt" = []))
)]
pub async fn import_status(State(app_state): State<AppState>) -> Json<ImportStatus> {
    Json(app_state.import_scheduler.status().await)
}
