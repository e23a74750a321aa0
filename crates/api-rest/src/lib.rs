//! # API REST
//!
//! REST API implementation for SIDIA.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for request/response types and `sidia-core` for all diagnosis logic.

#![warn(rust_2018_idioms)]

pub mod error;

use api_shared::{
    DiagnosisReq, ErrorRes, HealthRes, HealthService, SaveHistoryReq, StrictDiagnosisRes,
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use sidia_core::{
    analyze_symptoms, diagnose_strict, CoreServices, DiagnosisResult, Disease, HistoryError,
    HistoryLog, HistoryService, NonEmptyText, SymptomList,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::{IntoParams, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state shared across REST API handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub services: CoreServices,
}

impl AppState {
    pub fn new(services: CoreServices) -> Self {
        Self { services }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        diagnose,
        diagnose_local,
        diagnose_strict_match,
        list_symptoms,
        list_diseases,
        list_history,
        save_history,
        clear_history,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        DiagnosisReq,
        StrictDiagnosisRes,
        SaveHistoryReq,
        DiagnosisResult,
        Disease,
        HistoryLog,
    ))
)]
pub struct ApiDoc;

/// Query string for `GET /api/history`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Case-insensitive search over patient name, disease name and date.
    pub q: Option<String>,
}

/// Builds the REST router with all SIDIA endpoints and the Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/diagnosis", post(diagnose))
        .route("/api/diagnosis/local", post(diagnose_local))
        .route("/api/diagnosis/strict", post(diagnose_strict_match))
        .route("/api/symptoms", get(list_symptoms))
        .route("/api/diseases", get(list_diseases))
        .route(
            "/api/history",
            get(list_history).post(save_history).delete(clear_history),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the router until the process stops.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- SIDIA REST API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn symptoms_from(
    payload: Result<Json<DiagnosisReq>, JsonRejection>,
) -> Result<SymptomList, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "rejected diagnosis body");
        ApiError::SymptomsRequired
    })?;
    SymptomList::new(req.symptoms).map_err(|_| ApiError::SymptomsRequired)
}

/// Runs a history operation on the blocking pool; the stores do file I/O under a mutex.
async fn with_history<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(HistoryService) -> Result<T, HistoryError> + Send + 'static,
    T: Send + 'static,
{
    let history = state.services.history.clone();
    Ok(tokio::task::spawn_blocking(move || op(history)).await??)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    let provider = state.services.provider.kind().to_string();
    Json(HealthService::check_health(&provider))
}

#[utoipa::path(
    post,
    path = "/api/diagnosis",
    request_body = DiagnosisReq,
    responses(
        (status = 200, description = "AI-ranked diagnosis", body = [DiagnosisResult]),
        (status = 400, description = "Symptoms are required", body = ErrorRes),
        (status = 500, description = "Failed to process diagnosis", body = ErrorRes)
    )
)]
/// Diagnose symptoms with the configured AI provider
///
/// Input is validated before any remote call is made. Provider failures of any kind are
/// reported as a generic 500; the detail is logged.
///
/// # Errors
/// Returns `400 Bad Request` if the body is not JSON or carries no usable symptoms, and
/// `500 Internal Server Error` if the provider call or its response parsing fails.
#[axum::debug_handler]
async fn diagnose(
    State(state): State<AppState>,
    payload: Result<Json<DiagnosisReq>, JsonRejection>,
) -> Result<Json<Vec<DiagnosisResult>>, ApiError> {
    let symptoms = symptoms_from(payload)?;
    let results = state.services.provider.request_diagnosis(&symptoms).await?;
    Ok(Json(results))
}

#[utoipa::path(
    post,
    path = "/api/diagnosis/local",
    request_body = DiagnosisReq,
    responses(
        (status = 200, description = "Catalog-ranked diagnosis", body = [DiagnosisResult]),
        (status = 400, description = "Symptoms are required", body = ErrorRes)
    )
)]
/// Rank catalog diseases by the fraction of their symptoms present in the input
#[axum::debug_handler]
async fn diagnose_local(
    State(state): State<AppState>,
    payload: Result<Json<DiagnosisReq>, JsonRejection>,
) -> Result<Json<Vec<DiagnosisResult>>, ApiError> {
    let symptoms = symptoms_from(payload)?.to_vec();
    Ok(Json(analyze_symptoms(state.services.catalog, &symptoms)))
}

#[utoipa::path(
    post,
    path = "/api/diagnosis/strict",
    request_body = DiagnosisReq,
    responses(
        (status = 200, description = "First disease fully covered by the input", body = StrictDiagnosisRes),
        (status = 400, description = "Symptoms are required", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn diagnose_strict_match(
    State(state): State<AppState>,
    payload: Result<Json<DiagnosisReq>, JsonRejection>,
) -> Result<Json<StrictDiagnosisRes>, ApiError> {
    let symptoms = symptoms_from(payload)?.to_vec();
    let disease = diagnose_strict(state.services.catalog, &symptoms).cloned();
    Ok(Json(StrictDiagnosisRes { disease }))
}

#[utoipa::path(
    get,
    path = "/api/symptoms",
    responses(
        (status = 200, description = "Sorted symptom vocabulary", body = [String])
    )
)]
#[axum::debug_handler]
async fn list_symptoms(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.services.catalog.all_symptoms())
}

#[utoipa::path(
    get,
    path = "/api/diseases",
    responses(
        (status = 200, description = "Disease catalog", body = [Disease])
    )
)]
#[axum::debug_handler]
async fn list_diseases(State(state): State<AppState>) -> Json<Vec<Disease>> {
    Json(state.services.catalog.diseases().to_vec())
}

#[utoipa::path(
    get,
    path = "/api/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History entries, newest first", body = [HistoryLog]),
        (status = 500, description = "Failed to access history", body = ErrorRes)
    )
)]
/// List saved diagnoses, or search them when `q` is given
#[axum::debug_handler]
async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryLog>>, ApiError> {
    let logs = with_history(&state, move |history| match query.q.as_deref() {
        Some(q) => history.search(q),
        None => history.list_all(),
    })
    .await?;
    Ok(Json(logs))
}

#[utoipa::path(
    post,
    path = "/api/history",
    request_body = SaveHistoryReq,
    responses(
        (status = 201, description = "History entry created", body = HistoryLog),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 500, description = "Failed to access history", body = ErrorRes)
    )
)]
/// Save a diagnosis result for a patient
///
/// # Errors
/// Returns `400 Bad Request` for a malformed body, a blank patient name or a result whose
/// counts are inconsistent, and `500 Internal Server Error` if the history store fails.
#[axum::debug_handler]
async fn save_history(
    State(state): State<AppState>,
    payload: Result<Json<SaveHistoryReq>, JsonRejection>,
) -> Result<(StatusCode, Json<HistoryLog>), ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let patient_name =
        NonEmptyText::new(&req.patient_name).map_err(|_| ApiError::PatientNameRequired)?;
    req.result
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let result = req.result;
    let log = with_history(&state, move |history| history.append(result, &patient_name)).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

#[utoipa::path(
    delete,
    path = "/api/history",
    responses(
        (status = 204, description = "History cleared"),
        (status = 500, description = "Failed to access history", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    with_history(&state, |history| history.clear()).await?;
    Ok(StatusCode::NO_CONTENT)
}
