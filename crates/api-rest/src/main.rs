//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `sidia-run` binary serves the
//! same router after loading `.env`.

use sidia_core::{CoreConfig, CoreServices};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the SIDIA REST API server
///
/// # Environment Variables
/// - `SIDIA_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `AI_PROVIDER`, `GEMINI_API_KEY`, `GPT_SERVER_URL`, ...: see `CoreConfig::from_lookup`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid (for example a missing Gemini credential),
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("sidia_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("SIDIA_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = CoreConfig::from_lookup(|key| std::env::var(key).ok())?;
    let services = CoreServices::initialise(&cfg)?;

    api_rest::serve(&addr, api_rest::AppState::new(services)).await
}
