//! API error type with JSON bodies of the form `{"error": "..."}`.
//!
//! Upstream detail is logged, never returned to the caller.

use api_shared::{
    ErrorRes, DIAGNOSIS_FAILED, HISTORY_FAILED, PATIENT_NAME_REQUIRED, SYMPTOMS_REQUIRED,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sidia_core::{HistoryError, ProviderError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("symptoms are required")]
    SymptomsRequired,
    #[error("patient name is required")]
    PatientNameRequired,
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("diagnosis failed: {0}")]
    Diagnosis(#[from] ProviderError),
    #[error("history failed: {0}")]
    History(#[from] HistoryError),
    #[error("history task failed: {0}")]
    HistoryTask(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::SymptomsRequired => (StatusCode::BAD_REQUEST, SYMPTOMS_REQUIRED.to_owned()),
            ApiError::PatientNameRequired => {
                (StatusCode::BAD_REQUEST, PATIENT_NAME_REQUIRED.to_owned())
            }
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            ApiError::Diagnosis(e) => {
                tracing::error!(error = %e, "AI diagnosis failed");
                (StatusCode::INTERNAL_SERVER_ERROR, DIAGNOSIS_FAILED.to_owned())
            }
            ApiError::History(HistoryError::InvalidResult(e)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::History(e) => {
                tracing::error!(error = %e, "history operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, HISTORY_FAILED.to_owned())
            }
            ApiError::HistoryTask(e) => {
                tracing::error!(error = %e, "history task did not complete");
                (StatusCode::INTERNAL_SERVER_ERROR, HISTORY_FAILED.to_owned())
            }
        };

        (status, Json(ErrorRes::new(message))).into_response()
    }
}
