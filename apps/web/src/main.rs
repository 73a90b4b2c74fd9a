mod catalog;
mod config;
mod errors;
mod form;
mod generation;
mod models;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod view;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::loader::FeedLoader;
use crate::config::Config;
use crate::form::FormSession;
use crate::generation::client::GenerationClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing endpoint or key stops startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Money Lines Generator v{}", env!("CARGO_PKG_VERSION"));
    info!("Backend: {}", config.supabase_url);

    // One HTTP client for both the feed and the generation endpoint
    let http = reqwest::Client::new();

    let loader = FeedLoader::new(http.clone(), config.csv_url.clone());
    let generator = GenerationClient::new(http, config.run_url.clone(), config.api_key.clone());
    info!("Generation endpoint: {}", config.run_url);

    let session = Arc::new(FormSession::new(Arc::new(generator)));

    // Initial feed load; a failure leaves the list empty and shows an alert
    session.apply_feed(loader.load().await).await;

    let state = AppState { session, loader };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
