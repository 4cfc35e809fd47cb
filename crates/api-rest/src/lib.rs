//! # API REST
//!
//! REST API implementation for SmartBridge.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for wire types and `smartbridge-core` for the actual work.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    CodeDiagnosesReq, CodeDiagnosesRes, CodedDiagnosisDto, HealthRes, HealthService,
    Icd10EntryDto, Icd10LookupParams, Icd10LookupRes, Icd10SearchParams, Icd10SearchRes,
    ListPatientsRes, VoiceCommandReq, VoiceCommandRes,
};
use icd10::Icd10Catalogue;
use smartbridge_core::{
    config::{gemini_config_from_env_values, resolve_icd10_catalogue},
    constants::{DEFAULT_ICD10_SEARCH_LIMIT, MAX_ICD10_SEARCH_LIMIT},
    CoreConfig, FileContextStore, GeminiFlow, VoiceCommandFlow, VoiceCommandService,
};

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Application state for the REST API server
///
/// Shared by every request handler. Everything here is resolved once at startup.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    icd10: Arc<Icd10Catalogue>,
    store: Arc<FileContextStore>,
    voice: VoiceCommandService,
}

impl AppState {
    /// Build state around an explicit AI flow.
    pub fn new(
        cfg: Arc<CoreConfig>,
        icd10: Arc<Icd10Catalogue>,
        flow: Arc<dyn VoiceCommandFlow>,
    ) -> Self {
        let store = Arc::new(FileContextStore::new(cfg.patient_data_dir()));
        let voice = VoiceCommandService::new(store.clone(), flow);
        Self {
            cfg,
            icd10,
            store,
            voice,
        }
    }

    /// Build state that talks to Gemini with the configured settings.
    pub fn with_gemini(cfg: Arc<CoreConfig>, icd10: Arc<Icd10Catalogue>) -> Self {
        let flow = Arc::new(GeminiFlow::new(cfg.gemini().clone()));
        Self::new(cfg, icd10, flow)
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }
}

/// Resolve [`AppState`] from process environment variables.
///
/// # Environment Variables
/// - `PATIENT_DATA_DIR`: patient context directory (default: `patient_data`, must exist)
/// - `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_BASE_URL`: AI flow settings
/// - `SMARTBRIDGE_ICD10_PATH`: optional replacement for the bundled ICD-10 list
///
/// # Errors
/// Returns an error if:
/// - the patient data directory does not exist,
/// - the Gemini settings are invalid, or
/// - the ICD-10 override cannot be loaded.
pub fn app_state_from_env() -> anyhow::Result<AppState> {
    let patient_data_dir = std::env::var("PATIENT_DATA_DIR")
        .unwrap_or_else(|_| smartbridge_core::DEFAULT_PATIENT_DATA_DIR.into());
    let patient_data_path = Path::new(&patient_data_dir);
    if !patient_data_path.exists() {
        anyhow::bail!(
            "Patient data directory does not exist: {}",
            patient_data_path.display()
        );
    }

    let gemini = gemini_config_from_env_values(
        std::env::var("GEMINI_API_KEY").ok(),
        std::env::var("GEMINI_MODEL").ok(),
        std::env::var("GEMINI_BASE_URL").ok(),
    )?;
    if gemini.api_key().is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; voice commands will fail");
    }

    let icd10 = resolve_icd10_catalogue(
        std::env::var("SMARTBRIDGE_ICD10_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from),
    )?;
    tracing::info!("ICD-10 catalogue loaded with {} entries", icd10.len());

    let cfg = Arc::new(CoreConfig::new(patient_data_path.to_path_buf(), gemini)?);
    Ok(AppState::with_gemini(cfg, icd10))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        voice_command,
        icd10_lookup,
        icd10_search,
        icd10_code,
        list_patients,
    ),
    components(schemas(
        HealthRes,
        VoiceCommandReq,
        VoiceCommandRes,
        Icd10LookupRes,
        Icd10EntryDto,
        Icd10SearchRes,
        CodeDiagnosesReq,
        CodeDiagnosesRes,
        CodedDiagnosisDto,
        ListPatientsRes,
    ))
)]
pub struct ApiDoc;

/// Build the full REST router, Swagger UI included.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/voice-command", post(voice_command))
        .route("/icd10/lookup", get(icd10_lookup))
        .route("/icd10/search", get(icd10_search))
        .route("/icd10/code", post(icd10_code))
        .route("/patients", get(list_patients))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve the router until the server stops.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/voice-command",
    request_body = VoiceCommandReq,
    responses(
        (status = 200, description = "Voice command outcome; check `success`", body = VoiceCommandRes)
    )
)]
/// Interpret a transcribed voice command
///
/// Always answers 200. A blank transcript, an unreadable body, a context store failure or an AI
/// flow failure all come back as `success: false` with an `error` message.
#[axum::debug_handler]
async fn voice_command(
    State(state): State<AppState>,
    body: Result<Json<VoiceCommandReq>, JsonRejection>,
) -> Json<VoiceCommandRes> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::error!("Voice command body rejected: {}", rejection);
            return Json(VoiceCommandRes::failure(rejection.body_text()));
        }
    };

    match state
        .voice
        .handle(&req.transcript, req.patient_id.as_deref())
        .await
    {
        Ok(result) => Json(VoiceCommandRes {
            success: true,
            action: Some(result.action.to_string()),
            payload: Some(result.payload),
            llm_action: result.llm_action,
            error: None,
        }),
        Err(e) => {
            tracing::error!("Voice command error: {}", e);
            Json(VoiceCommandRes::failure(e.to_string()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/icd10/lookup",
    params(Icd10LookupParams),
    responses(
        (status = 200, description = "Best matching code, or null", body = Icd10LookupRes)
    )
)]
/// Resolve one diagnosis text (or code) to an ICD-10 code.
#[axum::debug_handler]
async fn icd10_lookup(
    State(state): State<AppState>,
    Query(params): Query<Icd10LookupParams>,
) -> Json<Icd10LookupRes> {
    let code = state
        .icd10
        .lookup(params.text.as_deref())
        .map(str::to_string);
    Json(Icd10LookupRes {
        text: params.text.unwrap_or_default(),
        code,
    })
}

#[utoipa::path(
    get,
    path = "/icd10/search",
    params(Icd10SearchParams),
    responses(
        (status = 200, description = "Matching catalogue entries in catalogue order", body = Icd10SearchRes)
    )
)]
/// Search the ICD-10 catalogue by code or description substring.
#[axum::debug_handler]
async fn icd10_search(
    State(state): State<AppState>,
    Query(params): Query<Icd10SearchParams>,
) -> Json<Icd10SearchRes> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_ICD10_SEARCH_LIMIT)
        .min(MAX_ICD10_SEARCH_LIMIT);
    let entries = state
        .icd10
        .search(params.q.as_deref().unwrap_or_default(), limit)
        .into_iter()
        .map(|e| Icd10EntryDto {
            code: e.code.clone(),
            description: e.description.clone(),
        })
        .collect();
    Json(Icd10SearchRes { entries })
}

#[utoipa::path(
    post,
    path = "/icd10/code",
    request_body = CodeDiagnosesReq,
    responses(
        (status = 200, description = "One result per diagnosis, in request order", body = CodeDiagnosesRes)
    )
)]
/// Code a batch of free-text diagnoses.
#[axum::debug_handler]
async fn icd10_code(
    State(state): State<AppState>,
    Json(req): Json<CodeDiagnosesReq>,
) -> Json<CodeDiagnosesRes> {
    let results = state
        .icd10
        .code_diagnoses(&req.diagnoses)
        .into_iter()
        .map(|d| CodedDiagnosisDto {
            text: d.text,
            code: d.code,
        })
        .collect();
    Json(CodeDiagnosesRes { results })
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "Ids of patients with a stored record", body = ListPatientsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List the ids of all patients in the patient data directory.
///
/// # Errors
/// Returns `500 Internal Server Error` if the directory cannot be read.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<ListPatientsRes>, (StatusCode, &'static str)> {
    match state.store.list_patients() {
        Ok(patients) => Ok(Json(ListPatientsRes { patients })),
        Err(e) => {
            tracing::error!("List patients error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}
