//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables. [`CoreConfig::from_lookup`]
//! takes the lookup as a closure: binaries pass `std::env::var`, tests pass a map.

use crate::constants::{
    DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL, DEFAULT_GPT_MODEL, DEFAULT_GPT_SERVER_URL,
    DEFAULT_HISTORY_DIR,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingCredential(&'static str),
    #[error("unknown AI provider {0:?} (expected \"gemini\" or \"gpt\")")]
    UnknownProvider(String),
    #[error("invalid URL for {key}: {value}")]
    InvalidUrl { key: &'static str, value: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Which diagnosis backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Gemini,
    Gpt,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "gpt" => Ok(Self::Gpt),
            _ => Err(ConfigError::UnknownProvider(s.to_owned())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Gpt => write!(f, "gpt"),
        }
    }
}

/// Settings for direct calls to the Gemini API.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiSettings {
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` if `api_key` is blank, or
    /// `ConfigError::InvalidUrl` if `api_base` is not an absolute URL.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.into().trim().to_owned();
        if api_key.is_empty() {
            return Err(ConfigError::MissingCredential("GEMINI_API_KEY"));
        }
        let model = model.into().trim().to_owned();
        if model.is_empty() {
            return Err(ConfigError::InvalidInput("GEMINI_MODEL cannot be empty".into()));
        }
        let api_base = validate_url("GEMINI_API_BASE", api_base.into())?;

        Ok(Self {
            api_key,
            model,
            api_base: api_base.trim_end_matches('/').to_owned(),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Settings for the GPT forwarding service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GptSettings {
    server_url: String,
    proxy: Option<String>,
    model: String,
}

impl GptSettings {
    /// A blank `proxy` means a direct connection and is stored as `None`.
    pub fn new(
        server_url: impl Into<String>,
        proxy: Option<String>,
        model: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let server_url = validate_url("GPT_SERVER_URL", server_url.into())?;
        let proxy = proxy
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());
        let model = model.into().trim().to_owned();
        if model.is_empty() {
            return Err(ConfigError::InvalidInput("GPT_MODEL cannot be empty".into()));
        }

        Ok(Self {
            server_url,
            proxy,
            model,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Backend selection together with its settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSettings {
    Gemini(GeminiSettings),
    Gpt(GptSettings),
}

impl ProviderSettings {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Gemini(_) => ProviderKind::Gemini,
            Self::Gpt(_) => ProviderKind::Gpt,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    provider: ProviderSettings,
    history_dir: PathBuf,
}

impl CoreConfig {
    pub fn new(provider: ProviderSettings, history_dir: PathBuf) -> Result<Self, ConfigError> {
        if history_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidInput(
                "history directory cannot be empty".into(),
            ));
        }
        Ok(Self {
            provider,
            history_dir,
        })
    }

    /// Resolves the configuration from a key lookup.
    ///
    /// Blank values are treated as unset. The Gemini credential is only required when the
    /// Gemini backend is selected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown provider, a missing credential or an invalid URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let kind = get("AI_PROVIDER")
            .map(|v| v.parse::<ProviderKind>())
            .transpose()?
            .unwrap_or_default();

        let provider = match kind {
            ProviderKind::Gemini => ProviderSettings::Gemini(GeminiSettings::new(
                get("GEMINI_API_KEY").ok_or(ConfigError::MissingCredential("GEMINI_API_KEY"))?,
                get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
                get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.into()),
            )?),
            ProviderKind::Gpt => ProviderSettings::Gpt(GptSettings::new(
                get("GPT_SERVER_URL").unwrap_or_else(|| DEFAULT_GPT_SERVER_URL.into()),
                get("GPT_PROXY"),
                get("GPT_MODEL").unwrap_or_else(|| DEFAULT_GPT_MODEL.into()),
            )?),
        };

        let history_dir = get("SIDIA_HISTORY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_DIR));

        Self::new(provider, history_dir)
    }

    pub fn provider(&self) -> &ProviderSettings {
        &self.provider
    }

    pub fn history_dir(&self) -> &Path {
        &self.history_dir
    }
}

fn validate_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    match reqwest::Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidUrl {
            key,
            value: trimmed.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_gemini_and_requires_key() {
        let err = CoreConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingCredential("GEMINI_API_KEY"));

        let err = CoreConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingCredential("GEMINI_API_KEY"));
    }

    #[test]
    fn gemini_defaults_are_applied() {
        let cfg = CoreConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k-123")])).unwrap();

        let ProviderSettings::Gemini(settings) = cfg.provider() else {
            panic!("expected gemini settings");
        };
        assert_eq!(settings.api_key(), "k-123");
        assert_eq!(settings.model(), DEFAULT_GEMINI_MODEL);
        assert_eq!(settings.api_base(), DEFAULT_GEMINI_API_BASE);
        assert_eq!(cfg.history_dir(), Path::new(DEFAULT_HISTORY_DIR));
    }

    #[test]
    fn gpt_does_not_need_gemini_key() {
        let cfg = CoreConfig::from_lookup(lookup(&[
            ("AI_PROVIDER", "GPT"),
            ("GPT_PROXY", ""),
            ("SIDIA_HISTORY_DIR", "/tmp/sidia"),
        ]))
        .unwrap();

        let ProviderSettings::Gpt(settings) = cfg.provider() else {
            panic!("expected gpt settings");
        };
        assert_eq!(settings.server_url(), DEFAULT_GPT_SERVER_URL);
        assert_eq!(settings.proxy(), None);
        assert_eq!(settings.model(), DEFAULT_GPT_MODEL);
        assert_eq!(cfg.provider().kind(), ProviderKind::Gpt);
        assert_eq!(cfg.history_dir(), Path::new("/tmp/sidia"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[("AI_PROVIDER", "claude")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownProvider("claude".into()));
    }

    #[test]
    fn invalid_urls_are_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[
            ("AI_PROVIDER", "gpt"),
            ("GPT_SERVER_URL", "localhost:6969"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                key: "GPT_SERVER_URL",
                ..
            }
        ));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let settings = GeminiSettings::new("secret-key", "m", "https://example.test/").unwrap();
        let debug = format!("{:?}", settings);

        assert!(!debug.contains("secret-key"));
        assert_eq!(settings.api_base(), "https://example.test");
    }
}
