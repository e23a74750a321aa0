//! # SIDIA Core
//!
//! Core logic for the SIDIA symptom-to-disease lookup service:
//! - the built-in disease catalog and the local strict/ranked matchers
//! - the AI diagnosis providers and the normalisation of their output
//! - the capped diagnosis history
//! - startup configuration
//!
//! **No API concerns**: HTTP servers and command-line handling belong in `api-rest` and
//! `sidia-cli`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod disease;
pub mod error;
pub mod history;
pub mod matcher;
pub mod provider;

pub use catalog::{Catalog, CatalogError};
pub use config::{ConfigError, CoreConfig, GeminiSettings, GptSettings, ProviderKind, ProviderSettings};
pub use constants::{DEFAULT_HISTORY_DIR, HISTORY_LIMIT};
pub use disease::{DiagnosisResult, Disease, ResultError};
pub use error::{CoreError, CoreResult};
pub use history::{HistoryError, HistoryLog, HistoryService, HistoryStore, JsonFileStore, MemoryStore};
pub use matcher::{analyze_symptoms, diagnose_strict};
pub use provider::{DiagnosisProvider, ProviderError};

pub use sidia_types::{NonEmptyText, SymptomList, TextError};

use std::sync::Arc;

/// Services built from a [`CoreConfig`] at startup.
#[derive(Clone, Debug)]
pub struct CoreServices {
    pub catalog: &'static Catalog,
    pub provider: Arc<DiagnosisProvider>,
    pub history: HistoryService,
}

impl CoreServices {
    /// Builds the provider client and opens the history store, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if the HTTP client cannot be built or the history directory cannot
    /// be created.
    pub fn initialise(cfg: &CoreConfig) -> CoreResult<Self> {
        let provider = DiagnosisProvider::from_settings(cfg.provider())?;
        let store = JsonFileStore::create(cfg.history_dir())?;

        tracing::info!(
            provider = %provider.kind(),
            model = provider.model(),
            history_dir = %cfg.history_dir().display(),
            "core services initialised"
        );

        Ok(Self {
            catalog: Catalog::builtin(),
            provider: Arc::new(provider),
            history: HistoryService::new(Arc::new(store)),
        })
    }
}
