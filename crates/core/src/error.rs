use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::history::HistoryError;
use crate::provider::ProviderError;
use sidia_types::TextError;

/// Any failure surfaced by the core crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    Validation(#[from] TextError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("history error: {0}")]
    History(#[from] HistoryError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
