//! AI diagnosis providers.
//!
//! Two interchangeable backends sit behind [`DiagnosisProvider`]: direct calls to Gemini and
//! a GPT forwarding service. Both produce free-form text that goes through
//! [`normalize::parse_diagnosis`], so callers only ever see typed results or a
//! [`ProviderError`].

mod gemini;
mod gpt;
pub mod normalize;
pub mod prompt;

pub use gemini::GeminiClient;
pub use gpt::GptClient;

use crate::config::{ProviderKind, ProviderSettings};
use crate::constants::PROVIDER_CONNECT_TIMEOUT_SECS;
use crate::disease::DiagnosisResult;
use sidia_types::SymptomList;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("provider request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider returned an empty response")]
    EmptyResponse,
    #[error("provider response is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("provider response has an unexpected shape: {0}")]
    MalformedResponse(String),
}

/// The configured diagnosis backend.
#[derive(Debug, Clone)]
pub enum DiagnosisProvider {
    Gemini(GeminiClient),
    Gpt(GptClient),
}

impl DiagnosisProvider {
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        match settings {
            ProviderSettings::Gemini(s) => Ok(Self::Gemini(GeminiClient::new(s.clone())?)),
            ProviderSettings::Gpt(s) => Ok(Self::Gpt(GptClient::new(s.clone())?)),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Gemini(_) => ProviderKind::Gemini,
            Self::Gpt(_) => ProviderKind::Gpt,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::Gemini(client) => client.model(),
            Self::Gpt(client) => client.model(),
        }
    }

    /// Asks the backend for a ranked diagnosis of `symptoms`.
    ///
    /// One request is made; there are no retries.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the call fails, the backend answers with a non-success
    /// status or empty text, or the text does not parse as a list of diagnosis results.
    pub async fn request_diagnosis(
        &self,
        symptoms: &SymptomList,
    ) -> Result<Vec<DiagnosisResult>, ProviderError> {
        let prompt = prompt::diagnosis_prompt(symptoms);
        tracing::info!(
            provider = %self.kind(),
            model = self.model(),
            symptoms = symptoms.len(),
            "requesting AI diagnosis"
        );

        let text = match self {
            Self::Gemini(client) => client.generate(&prompt).await?,
            Self::Gpt(client) => client.generate(&prompt).await?,
        };

        let results = normalize::parse_diagnosis(&text).inspect_err(|e| {
            tracing::warn!(provider = %self.kind(), error = %e, "unusable provider response");
        })?;
        tracing::debug!(results = results.len(), "AI diagnosis parsed");
        Ok(results)
    }
}

fn http_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(PROVIDER_CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(ProviderError::ClientBuild)
}
