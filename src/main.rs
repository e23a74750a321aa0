use sidia_core::{CoreConfig, CoreServices};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;

/// Main entry point for the SIDIA application
///
/// Loads `.env`, resolves the configuration once and serves the REST API
/// (diagnosis, catalog, history, Swagger UI).
///
/// # Environment Variables
/// - `SIDIA_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `AI_PROVIDER`: `gemini` (default) or `gpt`
/// - `GEMINI_API_KEY`: required when the provider is `gemini`
/// - `GEMINI_MODEL`, `GEMINI_API_BASE`: Gemini overrides
/// - `GPT_SERVER_URL`, `GPT_PROXY`, `GPT_MODEL`: GPT forwarding service settings
/// - `SIDIA_HISTORY_DIR`: directory for the history log (default: "history_data")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sidia_run=info".parse()?)
                .add_directive("sidia_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("SIDIA_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = match CoreConfig::from_lookup(|key| std::env::var(key).ok()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("++ Starting SIDIA REST on {}", rest_addr);

    let services = CoreServices::initialise(&cfg)?;
    api_rest::serve(&rest_addr, AppState::new(services)).await
}
