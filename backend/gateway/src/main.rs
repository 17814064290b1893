//! Leshan gateway — entry point.
//!
//! Hosts one app session per visitor on top of `leshan_core`, runs the
//! timers and AI calls its state transitions ask for, and exposes the whole
//! thing as a small Axum REST API.

mod api;
mod config;
mod errors;
mod gemini;
mod sessions;
mod tasks;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use gemini::GeminiClient;
use sessions::{SessionHub, SimulatedSettler, Timings};

const SWEEP_EVERY: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; AI screens will answer with fallbacks");
    }

    // HTTP client for outbound Gemini calls.
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    // ─── Session hub ──────────────────────────────────────
    let hub = SessionHub::new(
        Arc::new(GeminiClient::new(client, &config)),
        Arc::new(SimulatedSettler::new(config.settlement_delay())),
        Timings::from_config(&config),
    );
    hub.spawn_sweeper(SWEEP_EVERY);

    // ─── REST API ─────────────────────────────────────────
    let app = api::router(Arc::new(api::ApiState { hub }));

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
