use anyhow::Context;
use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use exam_relay::build_router;
use exam_relay::config::Args;
use exam_relay::provider::OpenAiProvider;
use exam_relay::rate_limit::{RateLimiter, rate_limit_sweeper};
use exam_relay::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("exam_relay=info,tower_http=info")),
        )
        .init();

    // parse cli arguments
    let args = Args::parse();

    if args.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set, exam requests will fail until it is");
    }

    let provider = OpenAiProvider::new(
        reqwest::Client::new(),
        &args.base_url,
        args.api_key.clone(),
        args.model.clone(),
        args.temperature,
    );
    let rate_limiter = Arc::new(RateLimiter::new(args.rate_windows()));

    // creating shared state
    let state = Arc::new(AppState::new(Arc::new(provider), Arc::clone(&rate_limiter)));

    // spawn the background sweeper
    tokio::spawn(rate_limit_sweeper(rate_limiter, args.sweep_every()));

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(port = args.port, "exam relay running on http://localhost:{}", args.port);
    info!(model = %args.model, base_url = %args.base_url, "forwarding to provider");
    for window in &args.rate_windows() {
        info!(key = "token or ip", "rate limit: {}", window.describe());
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
