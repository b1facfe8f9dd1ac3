//! Binary entrypoint for the Forge API server.
use anyhow::Context;
use forge_api::{run, AppState};
use forge_core::ExportConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Default listen address can be overridden with FORGE_ADDR
    let addr = std::env::var("FORGE_ADDR").unwrap_or_else(|_| "0.0.0.0:8787".to_string());

    let config = match std::env::var("FORGE_CONFIG") {
        Ok(path) => ExportConfig::load(&path).with_context(|| format!("loading {}", path))?,
        Err(_) => ExportConfig::default(),
    };

    let state = AppState::new(config).context("building export service")?;
    run(&addr, state).await.with_context(|| format!("serving on {}", addr))
}
