//! HTTP interface.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Status, version and current snapshot size |
//! | `GET`  | `/search?inputString=...` | Substring search |
//! | `POST` | `/search` | Substring search, form field `inputString` |
//! | `GET`  | `/passage?urn=...` | Look up one passage by its id |
//! | `POST` | `/reload` | Fetch, parse and publish a new corpus |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `parse_failed`
//! (422, with `record` and `line` when known), `fetch_failed` (502).
//! Malformed query strings and form bodies are reported as `bad_request`.

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Form, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use cex_search_core::models::Passage;
use cex_search_core::query::{self, SearchResults};
use cex_search_core::store::CorpusStore;

use crate::config::Config;
use crate::fetch::source_from_config;
use crate::ingest::{IngestError, IngestReport, Ingestor};

/// Shared state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CorpusStore>,
    pub ingestor: Arc<Ingestor>,
}

impl AppState {
    pub fn new(ingestor: Ingestor) -> Self {
        Self {
            store: ingestor.store().clone(),
            ingestor: Arc::new(ingestor),
        }
    }
}

/// Starts the HTTP server.
///
/// When `server.load_on_start` is set the corpus is loaded before binding.
/// A failed initial load is logged and the server starts with an empty
/// corpus; `POST /reload` can be retried later.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let source = source_from_config(&config.source)?;
    let state = AppState::new(Ingestor::new(source, Arc::new(CorpusStore::new())));

    if config.server.load_on_start {
        if let Err(e) = state.ingestor.reload().await {
            warn!(error = %e, "initial corpus load failed; serving an empty corpus");
        }
    }

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(
        "listening on http://{} (source: {})",
        listener.local_addr()?,
        state.ingestor.source_description()
    );
    serve(listener, state).await
}

/// Serve `state` on an already-bound listener.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Routes and middleware for `state`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/search", get(handle_search_query).post(handle_search_form))
        .route("/passage", get(handle_passage))
        .route("/reload", post(handle_reload))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    location: Option<(usize, usize)>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
                record: self.location.map(|(record, _)| record),
                line: self.location.map(|(_, line)| line),
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
        location: None,
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
        location: None,
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match &err {
            IngestError::Fetch(_) => AppError {
                status: StatusCode::BAD_GATEWAY,
                code: "fetch_failed",
                message: err.to_string(),
                location: None,
            },
            IngestError::Parse(parse) => AppError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                code: "parse_failed",
                message: err.to_string(),
                location: parse.location(),
            },
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    generation: u64,
    works: usize,
    passages: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snap = state.store.current();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        generation: snap.generation,
        works: snap.corpus.work_count(),
        passages: snap.corpus.passage_count(),
    })
}

// ============ /search ============

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(rename = "inputString")]
    input_string: Option<String>,
}

async fn handle_search_query(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResults>, AppError> {
    let Query(params) = params.map_err(|e| bad_request(e.body_text()))?;
    run_search(&state, params)
}

async fn handle_search_form(
    State(state): State<AppState>,
    params: Result<Form<SearchParams>, FormRejection>,
) -> Result<Json<SearchResults>, AppError> {
    let Form(params) = params.map_err(|e| bad_request(e.body_text()))?;
    run_search(&state, params)
}

fn run_search(state: &AppState, params: SearchParams) -> Result<Json<SearchResults>, AppError> {
    let query = params.input_string.unwrap_or_default();
    // One snapshot for the whole query, whatever a concurrent reload does.
    let snap = state.store.current();
    let results = query::search(&snap.corpus, &query)
        .map_err(|e| bad_request(format!("inputString: {}", e)))?;
    Ok(Json(results))
}

// ============ GET /passage ============

#[derive(Debug, Deserialize)]
struct PassageParams {
    urn: Option<String>,
}

async fn handle_passage(
    State(state): State<AppState>,
    params: Result<Query<PassageParams>, QueryRejection>,
) -> Result<Json<Passage>, AppError> {
    let Query(params) = params.map_err(|e| bad_request(e.body_text()))?;
    let urn = params
        .urn
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| bad_request("urn must not be empty"))?;

    let urn = urn.trim();
    let snap = state.store.current();
    let passage = snap.corpus.find_passage(urn).cloned();
    passage
        .map(Json)
        .ok_or_else(|| not_found(format!("no passage {}", urn)))
}

// ============ POST /reload ============

async fn handle_reload(State(state): State<AppState>) -> Result<Json<IngestReport>, AppError> {
    let report = state.ingestor.reload().await?;
    Ok(Json(report))
}
