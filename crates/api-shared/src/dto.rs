//! Request and response bodies for the SIDIA REST API.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use sidia_core::{DiagnosisResult, Disease};
use utoipa::ToSchema;

/// Error message returned when a diagnosis request carries no usable symptoms.
pub const SYMPTOMS_REQUIRED: &str = "Symptoms are required";

/// Error message returned when an AI diagnosis fails for any reason.
pub const DIAGNOSIS_FAILED: &str = "Failed to process diagnosis";

/// Error message returned when a history entry has a blank patient name.
pub const PATIENT_NAME_REQUIRED: &str = "Patient name is required";

/// Error message returned when the history store fails.
pub const HISTORY_FAILED: &str = "Failed to access history";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

impl ErrorRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Symptoms selected by the user. A missing field is treated as an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DiagnosisReq {
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// Result of a strict match: the first disease fully covered by the input, if any.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StrictDiagnosisRes {
    pub disease: Option<Disease>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveHistoryReq {
    pub patient_name: String,
    pub result: DiagnosisResult,
}
