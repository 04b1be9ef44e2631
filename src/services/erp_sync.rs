// src/services/erp_sync.rs
//
// Importação do catálogo do ERP: baixa o feed JSON, interpreta e reconcilia
// com a tabela de produtos. Pode rodar sob demanda ou agendada por cron.

use std::{
    collections::HashSet,
    path::PathBuf,
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use axum::http::StatusCode;
use chrono::Utc;
use cron::Schedule;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};

use crate::{
    common::error::AppError,
    db::ProductStore,
    models::{
        catalog::{price_fits_column, ProductDraft},
        import::{ErpRemote, ImportStatus, LastRun, SyncReport, SyncTrigger},
    },
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Falha no download do feed do ERP: {0}")]
    Download(String),

    #[error("Feed do ERP inválido: {0}")]
    Parse(String),

    #[error("Preço inválido para o produto {external_id}: '{raw}'")]
    PriceFormat { external_id: String, raw: String },

    #[error("Expressão de agendamento inválida '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("Já existe uma importação em andamento")]
    ImportInProgress,

    #[error("Falha ao arquivar o feed: {0}")]
    Archive(#[from] std::io::Error),

    #[error("Falha ao gravar o catálogo: {0}")]
    Store(Box<AppError>),
}

impl From<AppError> for SyncError {
    fn from(e: AppError) -> Self {
        SyncError::Store(Box::new(e))
    }
}

impl SyncError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SyncError::Download(_) | SyncError::Parse(_) | SyncError::PriceFormat { .. } => {
                StatusCode::BAD_GATEWAY
            }
            SyncError::InvalidSchedule { .. } => StatusCode::BAD_REQUEST,
            SyncError::ImportInProgress => StatusCode::CONFLICT,
            SyncError::Archive(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SyncError::Store(e) => e.status_code(),
        }
    }
}

// --- Parse ---

// Registro como vem do ERP. Campos desconhecidos são ignorados.
#[derive(Debug, Deserialize)]
struct FeedRecord {
    #[serde(rename = "productID")]
    product_id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    #[serde(default)]
    stock: i32,
}

// Registro já validado, com o preço convertido
#[derive(Debug, Clone, PartialEq)]
pub struct FeedProduct {
    pub external_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
}

/// Converte "19.99 EUR", "19.99€" ou "19.99" em decimal.
/// Retorna `None` para texto não numérico ou valor que a coluna de preço não guarda
/// (negativo, mais de 2 casas decimais ou acima de `MAX_PRICE`).
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let number = raw
        .trim()
        .trim_end_matches(|c: char| c.is_alphabetic() || c == '€' || c == '$')
        .trim();
    let value = Decimal::from_str(number).ok()?;
    price_fits_column(&value).then_some(value)
}

pub fn parse_feed(payload: &[u8]) -> Result<Vec<FeedProduct>, SyncError> {
    let records: Vec<FeedRecord> =
        serde_json::from_slice(payload).map_err(|e| SyncError::Parse(e.to_string()))?;

    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            let external_id = record
                .product_id
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| SyncError::Parse(format!("registro {position} sem productID")))?;
            let name = record
                .name
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| SyncError::Parse(format!("produto {external_id} sem nome")))?;
            if record.stock < 0 {
                return Err(SyncError::Parse(format!("produto {external_id} com estoque negativo")));
            }
            // Preço ausente vira zero
            let price = match record.price {
                None => Decimal::ZERO,
                Some(raw) => parse_price(&raw).ok_or_else(|| SyncError::PriceFormat {
                    external_id: external_id.clone(),
                    raw,
                })?,
            };

            Ok(FeedProduct {
                external_id,
                name,
                description: record.description,
                price,
                stock: record.stock,
            })
        })
        .collect()
}

// --- Reconciliação ---

/// Upsert pelo ID externo e remoção dos produtos do ERP que sumiram do feed.
/// Produtos locais (sem ID externo) nunca são tocados.
pub async fn reconcile(store: &dyn ProductStore, feed: Vec<FeedProduct>) -> Result<SyncReport, AppError> {
    let mut report = SyncReport {
        received: feed.len(),
        ..Default::default()
    };
    let mut seen = HashSet::with_capacity(feed.len());

    for item in feed {
        let existing = store.find_by_external_id(&item.external_id).await?;
        let draft = ProductDraft {
            name: item.name,
            description: item.description,
            price: item.price,
            stock: item.stock,
            external_id: Some(item.external_id.clone()),
            // A imagem não vem do ERP; mantém a que já estava cadastrada
            image_url: existing.as_ref().and_then(|p| p.image_url.clone()),
        };

        match existing {
            Some(product) => {
                store.update(product.id, &draft).await?;
                report.updated += 1;
            }
            None => {
                store.insert(&draft).await?;
                report.created += 1;
            }
        }
        seen.insert(item.external_id);
    }

    for (id, external_id) in store.list_external_ids().await? {
        if !seen.contains(&external_id) && store.delete(id).await? {
            report.deleted += 1;
        }
    }

    Ok(report)
}

// --- Job ---

pub struct ErpSyncJob {
    products: Arc<dyn ProductStore>,
    http: reqwest::Client,
    archive_dir: Option<PathBuf>,
    // Uma execução por vez
    guard: Mutex<()>,
    last_run: RwLock<Option<LastRun>>,
}

impl ErpSyncJob {
    pub fn new(
        products: Arc<dyn ProductStore>,
        timeout: Duration,
        archive_dir: Option<PathBuf>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            products,
            http,
            archive_dir,
            guard: Mutex::new(()),
            last_run: RwLock::new(None),
        })
    }

    pub fn is_running(&self) -> bool {
        self.guard.try_lock().is_err()
    }

    pub async fn last_run(&self) -> Option<LastRun> {
        self.last_run.read().await.clone()
    }

    /// Executa uma importação completa. Falha com `ImportInProgress` se outra já estiver rodando.
    pub async fn run(&self, remote: &ErpRemote, trigger: SyncTrigger) -> Result<SyncReport, SyncError> {
        let _running = self.guard.try_lock().map_err(|_| SyncError::ImportInProgress)?;

        tracing::info!("🔄 Importação do ERP iniciada ({:?}) a partir de {}", trigger, remote.endpoint);
        let outcome = self.execute(remote).await;

        match &outcome {
            Ok(report) => tracing::info!(
                "✅ Importação concluída: {} recebidos, {} criados, {} atualizados, {} removidos",
                report.received,
                report.created,
                report.updated,
                report.deleted
            ),
            Err(e) => tracing::error!("🔥 Importação do ERP falhou: {}", e),
        }

        *self.last_run.write().await = Some(LastRun {
            finished_at: Utc::now(),
            trigger,
            report: outcome.as_ref().ok().cloned(),
            error: outcome.as_ref().err().map(|e| e.to_string()),
        });

        outcome
    }

    async fn execute(&self, remote: &ErpRemote) -> Result<SyncReport, SyncError> {
        let payload = self.download(remote).await?;
        self.archive(&payload).await?;
        // Tudo é validado antes da primeira escrita
        let feed = parse_feed(&payload)?;
        Ok(reconcile(self.products.as_ref(), feed).await?)
    }

    async fn download(&self, remote: &ErpRemote) -> Result<Vec<u8>, SyncError> {
        let response = self
            .http
            .get(&remote.endpoint)
            .basic_auth(&remote.username, Some(&remote.password))
            .send()
            .await
            .map_err(|e| SyncError::Download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Download(format!("o ERP respondeu {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SyncError::Download(e.to_string()))?;
        if body.is_empty() {
            return Err(SyncError::Download("o arquivo baixado está vazio".to_string()));
        }
        Ok(body.to_vec())
    }

    async fn archive(&self, payload: &[u8]) -> Result<(), SyncError> {
        let Some(dir) = &self.archive_dir else {
            return Ok(());
        };
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("products-{}.json", Utc::now().format("%Y%m%d-%H%M%S")));
        tokio::fs::write(&path, payload).await?;
        tracing::debug!("Feed arquivado em {}", path.display());
        Ok(())
    }
}

// --- Agendamento ---

/// Aceita cron de 6/7 campos (com segundos). Expressões clássicas de 5 campos
/// ganham um "0" de segundos na frente.
///
/// Dia da semana segue o cron clássico (0-7, 0 e 7 = domingo). O crate `cron`
/// numera 1-7 com domingo = 1, então o campo é traduzido antes do parse; a
/// expressão devolvida é a do usuário, só com os segundos acrescentados.
pub fn parse_schedule(expression: &str) -> Result<(String, Schedule), SyncError> {
    let invalid = |reason: String| SyncError::InvalidSchedule {
        expression: expression.to_string(),
        reason,
    };

    let trimmed = expression.trim();
    let normalized = if trimmed.split_whitespace().count() == 5 {
        format!("0 {trimmed}")
    } else {
        trimmed.to_string()
    };

    let mut fields: Vec<String> = normalized.split_whitespace().map(str::to_string).collect();
    if let Some(weekday) = fields.get_mut(5) {
        *weekday = translate_weekdays(weekday).map_err(invalid)?;
    }

    let schedule = Schedule::from_str(&fields.join(" ")).map_err(|e| invalid(e.to_string()))?;
    Ok((normalized, schedule))
}

// "1-5" -> "2,3,4,5,6"; "0" e "7" -> "1". Nomes (MON-FRI), "*" e "?" passam intactos.
fn translate_weekdays(field: &str) -> Result<String, String> {
    if field == "*" || field == "?" {
        return Ok(field.to_string());
    }

    let number = |s: &str| -> Option<u8> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    };

    let mut days = Vec::new();
    let mut named = Vec::new();
    for part in field.split(',') {
        let (base, step) = match part.split_once('/') {
            Some((base, step)) => {
                let step = number(step)
                    .filter(|s| *s > 0)
                    .ok_or_else(|| format!("passo inválido em '{part}'"))?;
                (base, Some(step))
            }
            None => (part, None),
        };

        let range = if base == "*" {
            Some((0, 6))
        } else if let Some((from, to)) = base.split_once('-') {
            number(from).zip(number(to))
        } else {
            // "N/passo" vai de N até o fim da semana
            number(base).map(|n| (n, if step.is_some() { 7 } else { n }))
        };

        let Some((from, to)) = range else {
            named.push(part.to_string());
            continue;
        };
        if to > 7 || from > to {
            return Err(format!("dia da semana fora de 0-7 em '{part}'"));
        }
        days.extend((from..=to).step_by(usize::from(step.unwrap_or(1))).map(|d| d % 7 + 1));
    }

    days.sort_unstable();
    days.dedup();
    named.extend(days.into_iter().map(|d| d.to_string()));
    Ok(named.join(","))
}

struct ActiveSchedule {
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct SchedulerState {
    active: Option<ActiveSchedule>,
    // Mantida mesmo depois do stop, para o status
    expression: Option<String>,
}

pub struct ImportScheduler {
    job: Arc<ErpSyncJob>,
    state: Mutex<SchedulerState>,
}

impl ImportScheduler {
    pub fn new(job: Arc<ErpSyncJob>) -> Self {
        Self {
            job,
            state: Mutex::new(SchedulerState::default()),
        }
    }

    /// Instala o agendamento, substituindo o anterior. Retorna a expressão normalizada.
    pub async fn start(&self, remote: ErpRemote, period: &str) -> Result<String, SyncError> {
        let (expression, schedule) = parse_schedule(period)?;

        let job = Arc::clone(&self.job);
        let handle = tokio::spawn(scheduled_loop(job, schedule, remote));

        let mut state = self.state.lock().await;
        if let Some(previous) = state.active.replace(ActiveSchedule { handle }) {
            previous.handle.abort();
        }
        state.expression = Some(expression.clone());

        tracing::info!("⏰ Importação do ERP agendada: {}", expression);
        Ok(expression)
    }

    /// Cancela disparos futuros. Uma execução já em andamento termina normalmente.
    pub async fn stop(&self) -> bool {
        let mut state = self.state.lock().await;
        match state.active.take() {
            Some(active) => {
                active.handle.abort();
                tracing::info!("⏹️ Agendamento da importação do ERP removido");
                true
            }
            None => false,
        }
    }

    pub async fn run_now(&self, remote: &ErpRemote) -> Result<SyncReport, SyncError> {
        self.job.run(remote, SyncTrigger::Manual).await
    }

    pub async fn status(&self) -> ImportStatus {
        let (scheduled, schedule) = {
            let state = self.state.lock().await;
            (state.active.is_some(), state.expression.clone())
        };
        ImportStatus {
            scheduled,
            schedule,
            running: self.job.is_running(),
            last_run: self.job.last_run().await,
        }
    }
}

async fn scheduled_loop(job: Arc<ErpSyncJob>, schedule: Schedule, remote: ErpRemote) {
    loop {
        let Some(next) = schedule.upcoming(Utc).next() else {
            tracing::info!("Agendamento sem próximas execuções, encerrando");
            return;
        };
        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tokio::time::sleep(wait).await;

        // Cada disparo roda em sua própria task: abortar o loop não interrompe um download em curso
        let job = Arc::clone(&job);
        let remote = remote.clone();
        tokio::spawn(async move {
            if let Err(SyncError::ImportInProgress) = job.run(&remote, SyncTrigger::Scheduled).await {
                tracing::warn!("Disparo agendado ignorado: importação anterior ainda em andamento");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use axum::{http::HeaderMap, routing::get, Router};
    use std::sync::Arc;
    use tokio::sync::Notify;

    const FEED_AUTH: &str = "Basic ZXJwOnNlY3JldA=="; // erp:secret

    fn draft(name: &str, external_id: Option<&str>) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: None,
            price: Decimal::new(500, 2),
            stock: 1,
            external_id: external_id.map(str::to_string),
            image_url: None,
        }
    }

    fn remote(endpoint: String) -> ErpRemote {
        ErpRemote {
            endpoint,
            username: "erp".to_string(),
            password: "secret".to_string(),
        }
    }

    fn job(store: Arc<MemoryStore>) -> ErpSyncJob {
        ErpSyncJob::new(store, Duration::from_secs(5), None).unwrap()
    }

    // Sobe um servidor local que serve o feed, exigindo basic auth
    async fn feed_server(body: &'static str, gate: Option<Arc<Notify>>) -> String {
        let app = Router::new().route(
            "/products.json",
            get(move |headers: HeaderMap| {
                let gate = gate.clone();
                async move {
                    if let Some(gate) = gate {
                        gate.notified().await;
                    }
                    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                        Some(FEED_AUTH) => (StatusCode::OK, body),
                        _ => (StatusCode::UNAUTHORIZED, ""),
                    }
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/products.json")
    }

    #[test]
    fn parses_prices_with_currency_suffix() {
        assert_eq!(parse_price("19.99 EUR"), Some(Decimal::new(1999, 2)));
        assert_eq!(parse_price("  7.50€ "), Some(Decimal::new(750, 2)));
        assert_eq!(parse_price("3"), Some(Decimal::from(3)));
        assert_eq!(parse_price("abc EUR"), None);
        assert_eq!(parse_price("-1.00 EUR"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn rejects_prices_the_column_cannot_hold() {
        assert_eq!(parse_price("19.990 EUR"), Some(Decimal::new(1999, 2)));
        assert_eq!(parse_price("9999999999.99 EUR"), Some(crate::models::catalog::MAX_PRICE));
        assert_eq!(parse_price("19.999 EUR"), None);
        assert_eq!(parse_price("12345678901.00 EUR"), None);

        // Um preço grande no meio do feed derruba o parse inteiro, antes de qualquer gravação
        let feed = br#"[
            {"productID": "A1", "name": "Mesa", "price": "10.00 EUR"},
            {"productID": "A2", "name": "Iate", "price": "12345678901.00 EUR"}
        ]"#;
        assert!(matches!(
            parse_feed(feed),
            Err(SyncError::PriceFormat { ref external_id, .. }) if external_id == "A2"
        ));
    }

    #[test]
    fn feed_parsing_validates_every_record() {
        let feed = br#"[
            {"ID": "x", "productID": "A1", "name": "Mesa", "description": "Pinho", "price": "120.00 EUR", "stock": 3},
            {"productID": "A2", "name": "Cadeira"}
        ]"#;
        let parsed = parse_feed(feed).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].price, Decimal::new(12000, 2));
        assert_eq!(parsed[1].price, Decimal::ZERO);
        assert_eq!(parsed[1].stock, 0);

        assert!(matches!(parse_feed(b"not json"), Err(SyncError::Parse(_))));
        assert!(matches!(parse_feed(br#"[{"name": "Sem id"}]"#), Err(SyncError::Parse(_))));
        assert!(matches!(
            parse_feed(br#"[{"productID": "A1", "name": "Mesa", "stock": -2}]"#),
            Err(SyncError::Parse(_))
        ));
        assert!(matches!(
            parse_feed(br#"[{"productID": "A1", "name": "Mesa", "price": "doze"}]"#),
            Err(SyncError::PriceFormat { .. })
        ));
    }

    fn weekdays(expression: &str) -> Vec<chrono::Weekday> {
        use chrono::{Datelike, TimeZone};
        let (_, schedule) = parse_schedule(expression).unwrap();
        // 2025-01-01 foi uma quarta-feira
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        schedule.after(&start).take(14).map(|at| at.weekday()).collect()
    }

    #[test]
    fn weekday_numbers_follow_classic_cron() {
        use chrono::Weekday::*;

        let working_days = weekdays("0 3 * * 1-5");
        assert!(working_days.iter().all(|d| ![Sat, Sun].contains(d)), "{working_days:?}");
        for day in [Mon, Tue, Wed, Thu, Fri] {
            assert!(working_days.contains(&day), "{day:?} ausente em {working_days:?}");
        }

        assert!(weekdays("0 3 * * 0").iter().all(|d| *d == Sun));
        assert!(weekdays("0 0 3 * * 7").iter().all(|d| *d == Sun));
        assert!(weekdays("0 0 3 * * 1").iter().all(|d| *d == Mon));
        assert!(weekdays("0 0 3 * * Mon-Fri").iter().all(|d| ![Sat, Sun].contains(d)));

        let weekend = weekdays("0 0 3 * * 6,0");
        assert!(weekend.iter().all(|d| [Sat, Sun].contains(d)));
        assert!(weekend.contains(&Sat) && weekend.contains(&Sun));

        // A expressão guardada é a do usuário
        let (normalized, _) = parse_schedule("0 3 * * 1-5").unwrap();
        assert_eq!(normalized, "0 0 3 * * 1-5");
        assert!(matches!(parse_schedule("0 3 * * 8"), Err(SyncError::InvalidSchedule { .. })));
        assert!(matches!(parse_schedule("0 3 * * 5-1"), Err(SyncError::InvalidSchedule { .. })));
    }

    #[test]
    fn translates_weekday_fields() {
        assert_eq!(translate_weekdays("1-5").unwrap(), "2,3,4,5,6");
        assert_eq!(translate_weekdays("0,7").unwrap(), "1");
        assert_eq!(translate_weekdays("*/2").unwrap(), "1,3,5,7");
        assert_eq!(translate_weekdays("1/3").unwrap(), "1,2,5");
        assert_eq!(translate_weekdays("Mon-Fri").unwrap(), "Mon-Fri");
        assert_eq!(translate_weekdays("?").unwrap(), "?");
        assert!(translate_weekdays("*/0").is_err());
    }

    #[tokio::test]
    async fn scheduled_firing_runs_the_import() {
        let url = feed_server(r#"[{"productID": "A1", "name": "Mesa", "price": "5.00"}]"#, None).await;
        let store = Arc::new(MemoryStore::new());
        let scheduler = ImportScheduler::new(Arc::new(job(store.clone())));

        // A cada segundo
        scheduler.start(remote(url), "* * * * * *").await.unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
        let last = loop {
            if let Some(last) = scheduler.status().await.last_run {
                break last;
            }
            assert!(tokio::time::Instant::now() < deadline, "nenhum disparo agendado em 10s");
            tokio::time::sleep(Duration::from_millis(50)).await;
        };
        scheduler.stop().await;

        assert_eq!(last.trigger, SyncTrigger::Scheduled);
        assert!(last.error.is_none(), "{:?}", last.error);
        assert!(store.find_by_external_id("A1").await.unwrap().is_some());
    }

    #[test]
    fn five_field_cron_gets_seconds_prefix() {
        let (normalized, _) = parse_schedule("*/5 * * * *").unwrap();
        assert_eq!(normalized, "0 */5 * * * *");
        let (normalized, _) = parse_schedule("0 0 3 * * *").unwrap();
        assert_eq!(normalized, "0 0 3 * * *");
        assert!(matches!(parse_schedule("toda hora"), Err(SyncError::InvalidSchedule { .. })));
    }

    #[tokio::test]
    async fn consecutive_feeds_update_instead_of_duplicating() {
        let store = Arc::new(MemoryStore::new());
        let first = parse_feed(br#"[{"productID": "A1", "name": "Mesa", "price": "10.00 EUR", "stock": 1}]"#).unwrap();
        let second = parse_feed(br#"[{"productID": "A1", "name": "Mesa nova", "price": "12.00 EUR", "stock": 4}]"#).unwrap();

        let report = reconcile(store.as_ref(), first).await.unwrap();
        assert_eq!(report.created, 1);
        let report = reconcile(store.as_ref(), second).await.unwrap();
        assert_eq!((report.created, report.updated), (0, 1));

        let products = ProductStore::list(store.as_ref()).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Mesa nova");
        assert_eq!(products[0].price, Decimal::new(1200, 2));
        assert_eq!(products[0].stock, 4);
    }

    #[tokio::test]
    async fn missing_erp_products_are_deleted_but_local_ones_survive() {
        let store = Arc::new(MemoryStore::new());
        store.insert(&draft("Local", None)).await.unwrap();
        store.insert(&draft("Antigo", Some("OLD"))).await.unwrap();

        let feed = parse_feed(br#"[{"productID": "NEW", "name": "Novo", "price": "1.00"}]"#).unwrap();
        let report = reconcile(store.as_ref(), feed).await.unwrap();
        assert_eq!(report.deleted, 1);

        let names: Vec<String> = ProductStore::list(store.as_ref())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Local".to_string(), "Novo".to_string()]);
    }

    #[tokio::test]
    async fn run_downloads_with_basic_auth_and_records_status() {
        let url = feed_server(
            r#"[{"productID": "A1", "name": "Mesa", "price": "19.99 EUR", "stock": 2}]"#,
            None,
        )
        .await;
        let store = Arc::new(MemoryStore::new());
        let job = job(store.clone());

        let report = job.run(&remote(url.clone()), SyncTrigger::Manual).await.unwrap();
        assert_eq!(report, SyncReport { received: 1, created: 1, updated: 0, deleted: 0 });
        let product = store.find_by_external_id("A1").await.unwrap().unwrap();
        assert_eq!(product.price, Decimal::new(1999, 2));

        let last = job.last_run().await.unwrap();
        assert_eq!(last.trigger, SyncTrigger::Manual);
        assert!(last.error.is_none());

        let mut wrong = remote(url);
        wrong.password = "errada".to_string();
        let err = job.run(&wrong, SyncTrigger::Manual).await.unwrap_err();
        assert!(matches!(err, SyncError::Download(_)));
        assert!(job.last_run().await.unwrap().error.is_some());
    }

    #[tokio::test]
    async fn bad_price_aborts_run_without_writes() {
        let url = feed_server(
            r#"[
                {"productID": "A1", "name": "Mesa", "price": "10.00 EUR"},
                {"productID": "A2", "name": "Cadeira", "price": "grátis"}
            ]"#,
            None,
        )
        .await;
        let store = Arc::new(MemoryStore::new());
        store.insert(&draft("Antigo", Some("OLD"))).await.unwrap();
        let job = job(store.clone());

        let err = job.run(&remote(url), SyncTrigger::Manual).await.unwrap_err();
        assert!(matches!(err, SyncError::PriceFormat { .. }));

        let products = ProductStore::list(store.as_ref()).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].external_id.as_deref(), Some("OLD"));
    }

    #[tokio::test]
    async fn second_run_is_rejected_while_one_is_in_flight() {
        let gate = Arc::new(Notify::new());
        let url = feed_server(r#"[{"productID": "A1", "name": "Mesa"}]"#, Some(gate.clone())).await;
        let store = Arc::new(MemoryStore::new());
        let job = Arc::new(job(store));

        let first = {
            let job = Arc::clone(&job);
            let remote = remote(url.clone());
            tokio::spawn(async move { job.run(&remote, SyncTrigger::Scheduled).await })
        };
        while !job.is_running() {
            tokio::task::yield_now().await;
        }

        let err = job.run(&remote(url), SyncTrigger::Manual).await.unwrap_err();
        assert!(matches!(err, SyncError::ImportInProgress));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        gate.notify_one();
        let report = first.await.unwrap().unwrap();
        assert_eq!(report.created, 1);
        assert!(!job.is_running());
    }

    #[tokio::test]
    async fn scheduler_start_stop_and_status() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = ImportScheduler::new(Arc::new(job(store)));
        let remote = remote("http://127.0.0.1:1/products.json".to_string());

        assert!(scheduler.start(remote.clone(), "não é cron").await.is_err());
        assert!(!scheduler.status().await.scheduled);

        let expression = scheduler.start(remote.clone(), "0 0 3 * *").await.unwrap();
        assert_eq!(expression, "0 0 0 3 * *");
        // Reinstalar substitui o anterior
        scheduler.start(remote, "0 0 4 * * *").await.unwrap();

        let status = scheduler.status().await;
        assert!(status.scheduled);
        assert_eq!(status.schedule.as_deref(), Some("0 0 4 * * *"));
        assert!(status.last_run.is_none());

        assert!(scheduler.stop().await);
        assert!(!scheduler.stop().await);
        let status = scheduler.status().await;
        assert!(!status.scheduled);
        assert_eq!(status.schedule.as_deref(), Some("0 0 4 * * *"));
    }
}
