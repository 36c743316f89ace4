use std::sync::Arc;
use tracing::info;

use iqra_search::config::{Config, EnvSource, ProcessEnv};
use iqra_search::{server, AppState, USER_AGENT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let env: Arc<dyn EnvSource> = Arc::new(ProcessEnv);
    let config = Config::from_env(env.as_ref())?;

    info!("Starting iqra-search");
    info!("Verse API: {}", config.verse_api_base);

    // Provider calls carry no overall timeout; verse lookups set their own.
    let http_client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, env, http_client));
    // Not the configured URL: it may carry a Redis password
    info!("Response cache: {:?}", state.cache);
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("iqra-search listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
