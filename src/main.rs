use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{DEFAULT_REST_ADDR, app_state_from_env, serve};

/// Main entry point for the SmartBridge application
///
/// Loads `.env`, resolves configuration once and serves the REST API (with Swagger UI at
/// `/swagger-ui`).
///
/// # Environment Variables
/// - `SMARTBRIDGE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_DATA_DIR`: Directory of patient context files (default: "patient_data")
/// - `GEMINI_API_KEY`: API key for the AI flow; voice commands fail without it
/// - `GEMINI_MODEL`, `GEMINI_BASE_URL`: optional AI flow overrides
/// - `SMARTBRIDGE_ICD10_PATH`: optional replacement for the bundled ICD-10 list
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server itself fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smartbridge=info".parse()?)
                .add_directive("smartbridge_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("SMARTBRIDGE_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let state = app_state_from_env()?;
    tracing::info!(
        "++ Patient data directory: {}",
        state.config().patient_data_dir().display()
    );
    tracing::info!("++ Starting SmartBridge REST on {}", rest_addr);

    serve(&rest_addr, state).await
}
