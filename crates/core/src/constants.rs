//! Constants used throughout the SIDIA core crate.
//!
//! Defaults for configuration values, storage keys and limits live here so that the
//! binaries and tests agree on them.

/// Maximum number of entries retained in the history log.
pub const HISTORY_LIMIT: usize = 50;

/// Key under which the history blob is stored.
pub const HISTORY_STORAGE_KEY: &str = "sidia_diagnosis_history";

/// Default directory for the history blob when no explicit directory is configured.
pub const DEFAULT_HISTORY_DIR: &str = "history_data";

/// Default Gemini model used for direct diagnosis.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

/// Default Gemini API root.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default endpoint of the GPT forwarding service.
pub const DEFAULT_GPT_SERVER_URL: &str = "http://localhost:6969/conversation";

/// Default model selector sent to the GPT forwarding service.
pub const DEFAULT_GPT_MODEL: &str = "gpt-4o-mini";

/// Connect timeout applied to provider HTTP clients, in seconds.
pub const PROVIDER_CONNECT_TIMEOUT_SECS: u64 = 10;
