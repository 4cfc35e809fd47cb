//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the SmartBridge REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging of the HTTP surface. The workspace's main
//! `smartbridge-run` binary serves the same router with `.env` support.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the SmartBridge REST API server
///
/// # Environment Variables
/// - `SMARTBRIDGE_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - see [`api_rest::app_state_from_env`] for the rest
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid, or
/// - the server address cannot be bound or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("SMARTBRIDGE_REST_ADDR")
        .unwrap_or_else(|_| api_rest::DEFAULT_REST_ADDR.into());

    let state = api_rest::app_state_from_env()?;

    tracing::info!("-- Starting SmartBridge REST API on {}", addr);
    api_rest::serve(&addr, state).await
}
